use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Invoice, Payment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub method: String,
    /// Defaults to "pending" when absent.
    pub status: Option<String>,
    /// Amount in cents.
    pub amount: i64,
    pub transaction_id: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    /// 44-character fiscal access key.
    pub access_key: String,
    pub number: i32,
    /// Defaults to "authorized" when absent.
    pub status: Option<String>,
    pub xml_file: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub authorized_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub items: Vec<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceList {
    pub items: Vec<Invoice>,
}
