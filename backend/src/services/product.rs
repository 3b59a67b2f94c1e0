//! Product catalogue service.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::database::{models::Product, queries};
use crate::errors::Result;

/// Submitted product form. Fields stay textual so a bad value becomes a form
/// error instead of a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<String>,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.to_string()),
            name: product.name.clone(),
            price: product.price.map(|p| p.to_string()),
        }
    }
}

impl ProductForm {
    /// Builds a product from the form, keeping the submitted id when there is
    /// one and generating a fresh id otherwise.
    pub fn to_product(&self) -> std::result::Result<Product, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("The Name field is required.".to_string());
        }

        let price = match self.price.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(price) => Some(price),
                Err(_) => {
                    errors.push("The field Price must be a number.".to_string());
                    None
                }
            },
        };

        let id = match self.id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push("The Id field is not a valid identifier.".to_string());
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut product = Product::new(name, price);
        if let Some(id) = id {
            product.id = id;
        }
        Ok(product)
    }
}

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn all_products(&self) -> Result<Vec<Product>> {
        Ok(queries::list_products(&self.pool).await?)
    }

    pub async fn get_product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(queries::find_product(&self.pool, id).await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&self, product: &Product) -> Result<()> {
        queries::insert_product(&self.pool, product).await?;
        info!("product added");
        Ok(())
    }

    /// Unknown ids are ignored.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn update_product(&self, product: &Product) -> Result<()> {
        match queries::update_product(&self.pool, product).await? {
            0 => debug!("update skipped: no such product"),
            _ => info!("product updated"),
        }
        Ok(())
    }

    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<()> {
        match queries::delete_product(&self.pool, id).await? {
            0 => debug!("delete skipped: no such product"),
            _ => info!("product deleted"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database;

    async fn service() -> ProductService {
        let pool = database::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        database::migrate(&pool).await.unwrap();
        ProductService::new(pool)
    }

    #[tokio::test]
    async fn add_then_get() {
        let products = service().await;
        let widget = Product::new("Widget", Some(250));
        products.add_product(&widget).await.unwrap();

        assert_eq!(products.get_product_by_id(widget.id).await.unwrap(), Some(widget.clone()));
        assert_eq!(products.all_products().await.unwrap(), vec![widget]);
        assert_eq!(products.get_product_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order() {
        let products = service().await;
        for name in ["b", "a", "c"] {
            products.add_product(&Product::new(name, None)).await.unwrap();
        }
        let names: Vec<String> = products.all_products().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn update_existing_and_unknown() {
        let products = service().await;
        let mut widget = Product::new("Widget", None);
        products.add_product(&widget).await.unwrap();

        widget.name = "Gadget".into();
        widget.price = Some(99);
        products.update_product(&widget).await.unwrap();
        assert_eq!(products.get_product_by_id(widget.id).await.unwrap(), Some(widget.clone()));

        let stranger = Product::new("Stranger", Some(1));
        products.update_product(&stranger).await.unwrap();
        assert_eq!(products.all_products().await.unwrap(), vec![widget]);
    }

    #[tokio::test]
    async fn delete_existing_and_unknown() {
        let products = service().await;
        let widget = Product::new("Widget", None);
        products.add_product(&widget).await.unwrap();

        products.delete_product(Uuid::new_v4()).await.unwrap();
        assert_eq!(products.all_products().await.unwrap().len(), 1);

        products.delete_product(widget.id).await.unwrap();
        assert!(products.all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_names_and_extreme_prices_survive_storage() {
        let products = service().await;
        let long = Product::new("x".repeat(10_000), Some(i64::MAX));
        let negative = Product::new("refund", Some(i64::MIN));
        products.add_product(&long).await.unwrap();
        products.add_product(&negative).await.unwrap();

        assert_eq!(products.get_product_by_id(long.id).await.unwrap(), Some(long));
        assert_eq!(products.get_product_by_id(negative.id).await.unwrap(), Some(negative));
    }

    #[test]
    fn form_requires_a_name() {
        let form = ProductForm {
            name: "   ".into(),
            ..Default::default()
        };
        assert_eq!(form.to_product().unwrap_err(), vec!["The Name field is required.".to_string()]);
    }

    #[test]
    fn form_parses_price_and_id() {
        let id = Uuid::new_v4();
        let form = ProductForm {
            id: Some(id.to_string()),
            name: " Lamp ".into(),
            price: Some("42".into()),
        };
        let product = form.to_product().unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, Some(42));

        let blank_price = ProductForm {
            name: "Lamp".into(),
            price: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank_price.to_product().unwrap().price, None);
    }

    #[test]
    fn form_collects_every_error() {
        let form = ProductForm {
            id: Some("not-a-uuid".into()),
            name: String::new(),
            price: Some("cheap".into()),
        };
        assert_eq!(form.to_product().unwrap_err().len(), 3);
    }
}
