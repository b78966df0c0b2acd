pub mod invoice;
pub mod purchase_order;

pub use invoice::InvoiceStatus;
pub use purchase_order::{Currency, OrderStatus};
