use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order lifecycle states. Only the cancel transition is guarded; every
/// other transition is a direct assignment validated for membership only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    /// An order may be canceled only before it ships.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Boleto,
    Pix,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Boleto => "boleto",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "debit_card" => Some(PaymentMethod::DebitCard),
            "boleto" => Some(PaymentMethod::Boleto),
            "pix" => Some(PaymentMethod::Pix),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }
}

/// Methods accepted on a payment record; narrower than the order's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRecordMethod {
    CreditCard,
    Boleto,
    Pix,
}

impl PaymentRecordMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordMethod::CreditCard => "credit_card",
            PaymentRecordMethod::Boleto => "boleto",
            PaymentRecordMethod::Pix => "pix",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit_card" => Some(PaymentRecordMethod::CreditCard),
            "boleto" => Some(PaymentRecordMethod::Boleto),
            "pix" => Some(PaymentRecordMethod::Pix),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "approved" => Some(PaymentStatus::Approved),
            "rejected" => Some(PaymentStatus::Rejected),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Authorized,
    Canceled,
    Rejected,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Authorized => "authorized",
            InvoiceStatus::Canceled => "canceled",
            InvoiceStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "authorized" => Some(InvoiceStatus::Authorized),
            "canceled" => Some(InvoiceStatus::Canceled),
            "rejected" => Some(InvoiceStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Helpful,
    NotHelpful,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Helpful => "helpful",
            VoteType::NotHelpful => "not_helpful",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "helpful" => Some(VoteType::Helpful),
            "not_helpful" => Some(VoteType::NotHelpful),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    /// Price in cents.
    pub price: i64,
    pub stock: i32,
    pub is_active: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_date: NaiveDate,
    pub status: String,
    pub payment_method: String,
    /// Sum of the line items' subtotals, in cents.
    pub total: i64,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Price in cents at time of purchase, decoupled from the product's
    /// current price.
    pub unit_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    /// Saturates at `i64::MAX` rather than wrapping; the store's write
    /// path rejects items large enough to get near that.
    pub fn subtotal(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity as i64)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub method: String,
    pub status: String,
    pub amount: i64,
    pub transaction_id: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: Uuid,
    pub order_id: Uuid,
    pub access_key: String,
    pub number: i32,
    pub status: String,
    pub xml_file: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub authorized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub product_name: String,
    pub pros: String,
    pub cons: String,
    pub would_recommend: bool,
    pub status: String,
    pub is_featured: bool,
    pub helpful_count: i32,
    pub views_count: i32,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved.as_str()
    }

    /// Rating rendered as filled and empty stars, e.g. "★★★☆☆".
    pub fn star_display(&self) -> String {
        star_display(self.rating)
    }
}

pub fn star_display(rating: i32) -> String {
    let filled = rating.clamp(0, 5) as usize;
    let mut stars = String::with_capacity(5 * '★'.len_utf8());
    for _ in 0..filled {
        stars.push('★');
    }
    for _ in filled..5 {
        stars.push('☆');
    }
    stars
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewImage {
    pub id: Uuid,
    pub review_id: Uuid,
    pub image: String,
    pub caption: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewVote {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub vote_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub review_id: Uuid,
    pub responder_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_round_trips() {
        for tag in ["pending", "processing", "shipped", "delivered", "canceled"] {
            let status = OrderStatus::parse(tag).unwrap();
            assert_eq!(status.as_str(), tag);
        }
        assert!(OrderStatus::parse("paid").is_none());
        assert!(OrderStatus::parse("").is_none());
    }

    #[test]
    fn cancel_guard_only_covers_pending_and_processing() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Canceled.can_cancel());
    }

    #[test]
    fn subtotal_saturates_instead_of_wrapping() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 2,
            unit_price: i64::MAX,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(item.subtotal(), i64::MAX);
    }

    #[test]
    fn vote_type_membership() {
        assert_eq!(VoteType::parse("helpful"), Some(VoteType::Helpful));
        assert_eq!(VoteType::parse("not_helpful"), Some(VoteType::NotHelpful));
        assert!(VoteType::parse("upvote").is_none());
    }

    #[test]
    fn star_display_renders_filled_and_empty() {
        assert_eq!(star_display(3), "★★★☆☆");
        assert_eq!(star_display(5), "★★★★★");
        assert_eq!(star_display(1), "★☆☆☆☆");
    }
}
