pub mod audit_logs;
pub mod categories;
pub mod invoices;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod review_images;
pub mod review_responses;
pub mod review_votes;
pub mod reviews;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use invoices::Entity as Invoices;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use products::Entity as Products;
pub use review_images::Entity as ReviewImages;
pub use review_responses::Entity as ReviewResponses;
pub use review_votes::Entity as ReviewVotes;
pub use reviews::Entity as Reviews;
pub use users::Entity as Users;
