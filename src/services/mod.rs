pub mod admin_service;
pub mod auth_service;
pub mod catalog_service;
pub mod order_service;
pub mod payment_service;
pub mod review_service;
