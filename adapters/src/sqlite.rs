//! SQLite-backed identity store.
//!
//! Accounts, role assignments and sessions live in three tables created by
//! [`SqliteIdentityStore::migrate`]. Roles and sessions are removed with their
//! account through `ON DELETE CASCADE`.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::{AdapterError, IdentityError};
use crate::models::{email_errors, normalize, Account, Role, RoleSet, SessionTicket};
use crate::password::PasswordHasher;
use crate::{new_session_token, IdentityStore};

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS accounts (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        user_name TEXT NOT NULL,
        normalized_user_name TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        normalized_email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS ux_accounts_normalized_email ON accounts (normalized_email)",
    "CREATE TABLE IF NOT EXISTS account_roles (
        account_id TEXT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        role TEXT NOT NULL,
        PRIMARY KEY (account_id, role)
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        account_id TEXT NOT NULL REFERENCES accounts (id) ON DELETE CASCADE,
        persistent INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_sessions_account ON sessions (account_id)",
];

const ACCOUNT_COLUMNS: &str = "id, user_name, email";

pub struct SqliteIdentityStore {
    pool: SqlitePool,
    hasher: PasswordHasher,
}

impl SqliteIdentityStore {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Creates the identity tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), AdapterError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("identity schema ready");
        Ok(())
    }

    fn parse_account(row: &SqliteRow) -> Account {
        Account {
            id: row.get("id"),
            user_name: row.get("user_name"),
            email: row.get("email"),
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, AdapterError> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn require(&self, id: &str) -> Result<(), AdapterError> {
        if self.exists(id).await? {
            Ok(())
        } else {
            Err(AdapterError::rejected(IdentityError::unknown_account(id)))
        }
    }

    async fn taken(&self, column: &str, value: &str, except_id: &str) -> Result<bool, AdapterError> {
        let query = format!("SELECT 1 FROM accounts WHERE {column} = ? AND id <> ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(normalize(value))
            .bind(except_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

/// Maps a unique-constraint race on insert or update to the matching rejection.
fn unique_violation(message: &str, email: &str) -> AdapterError {
    if message.contains("normalized_email") {
        AdapterError::rejected(IdentityError::duplicate_email(email))
    } else {
        AdapterError::rejected(IdentityError::duplicate_user_name(email))
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AdapterError> {
        let query = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE normalized_email = ? ORDER BY seq LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(normalize(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(Self::parse_account))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AdapterError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(Self::parse_account))
    }

    async fn create(&self, email: &str, password: &str) -> Result<Account, AdapterError> {
        let email = email.trim();
        let user_name_taken = self.taken("normalized_user_name", email, "").await?;
        let email_taken = self.taken("normalized_email", email, "").await?;
        let mut errors = email_errors(email, user_name_taken, email_taken);
        errors.extend(self.hasher.policy().validate(password));
        if !errors.is_empty() {
            return Err(AdapterError::Rejected(errors));
        }

        let password_hash = self.hasher.hash_blocking(password).await?;
        let account = Account::new(email);

        let result = sqlx::query(
            "INSERT INTO accounts
                (id, user_name, normalized_user_name, email, normalized_email, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.user_name)
        .bind(normalize(&account.user_name))
        .bind(&account.email)
        .bind(normalize(&account.email))
        .bind(&password_hash)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!("created account {}", account.id);
                Ok(account)
            }
            // Lost a race against a concurrent create of the same address.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(unique_violation(e.message(), email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, account: &Account) -> Result<(), AdapterError> {
        self.require(&account.id).await?;

        let email = account.email.trim();
        let errors = email_errors(email, false, self.taken("normalized_email", email, &account.id).await?);
        if !errors.is_empty() {
            return Err(AdapterError::Rejected(errors));
        }
        if self.taken("normalized_user_name", &account.user_name, &account.id).await? {
            return Err(AdapterError::rejected(IdentityError::duplicate_user_name(&account.user_name)));
        }

        sqlx::query(
            "UPDATE accounts
             SET user_name = ?, normalized_user_name = ?, email = ?, normalized_email = ?
             WHERE id = ?",
        )
        .bind(&account.user_name)
        .bind(normalize(&account.user_name))
        .bind(email)
        .bind(normalize(email))
        .bind(&account.id)
        .execute(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(e) if e.is_unique_violation() => unique_violation(e.message(), email),
            other => other.into(),
        })?;

        debug!("updated account {}", account.id);
        Ok(())
    }

    async fn delete(&self, account: &Account) -> Result<(), AdapterError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(&account.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AdapterError::rejected(IdentityError::unknown_account(&account.id)));
        }
        info!("deleted account {}", account.id);
        Ok(())
    }

    async fn get_roles(&self, account: &Account) -> Result<RoleSet, AdapterError> {
        self.require(&account.id).await?;

        let rows = sqlx::query("SELECT role FROM account_roles WHERE account_id = ?")
            .bind(&account.id)
            .fetch_all(&self.pool)
            .await?;

        let mut roles = RoleSet::new();
        for row in &rows {
            let name: String = row.get("role");
            match name.parse::<Role>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(_) => warn!("account {} has unrecognised role {name:?}", account.id),
            }
        }
        Ok(roles)
    }

    async fn add_to_role(&self, account: &Account, role: Role) -> Result<(), AdapterError> {
        self.require(&account.id).await?;

        let result = sqlx::query("INSERT OR IGNORE INTO account_roles (account_id, role) VALUES (?, ?)")
            .bind(&account.id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AdapterError::rejected(IdentityError::already_in_role(role)));
        }
        debug!("added account {} to role {role}", account.id);
        Ok(())
    }

    async fn remove_from_role(&self, account: &Account, role: Role) -> Result<(), AdapterError> {
        self.require(&account.id).await?;

        let result = sqlx::query("DELETE FROM account_roles WHERE account_id = ? AND role = ?")
            .bind(&account.id)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AdapterError::rejected(IdentityError::not_in_role(role)));
        }
        debug!("removed account {} from role {role}", account.id);
        Ok(())
    }

    async fn users_in_role(&self, role: Role) -> Result<Vec<Account>, AdapterError> {
        let rows = sqlx::query(
            "SELECT a.id, a.user_name, a.email
             FROM accounts a
             JOIN account_roles r ON r.account_id = a.id
             WHERE r.role = ?
             ORDER BY a.seq",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::parse_account).collect())
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<bool, AdapterError> {
        let row = sqlx::query("SELECT password_hash FROM accounts WHERE id = ?")
            .bind(&account.id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let hash: String = row.get("password_hash");
                self.hasher.verify_blocking(password, &hash).await
            }
            None => Ok(false),
        }
    }

    async fn sign_in(&self, account: &Account, persistent: bool) -> Result<SessionTicket, AdapterError> {
        self.require(&account.id).await?;

        let ticket = SessionTicket {
            token: new_session_token(),
            account_id: account.id.clone(),
            persistent,
        };
        sqlx::query("INSERT INTO sessions (token, account_id, persistent, created_at) VALUES (?, ?, ?, ?)")
            .bind(&ticket.token)
            .bind(&ticket.account_id)
            .bind(ticket.persistent)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?;

        debug!("signed in account {}", account.id);
        Ok(ticket)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AdapterError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<Account>, AdapterError> {
        let row = sqlx::query(
            "SELECT a.id, a.user_name, a.email
             FROM sessions s
             JOIN accounts a ON a.id = s.account_id
             WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(Self::parse_account))
    }

    async fn count(&self) -> Result<usize, AdapterError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM accounts")
            .fetch_one(&self.pool)
            .await?
            .get("n");
        Ok(count as usize)
    }
}
