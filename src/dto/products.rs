use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in cents, non-negative.
    pub price: i64,
    pub stock: i32,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkActiveRequest {
    pub product_ids: Vec<Uuid>,
    pub is_active: bool,
}
