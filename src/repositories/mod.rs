use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub mod invoice_repository;
pub mod purchase_order_repository;

pub use invoice_repository::InvoiceRepository;
pub use purchase_order_repository::PurchaseOrderRepository;

/// Repository trait for common database operations.
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

/// Shared handle held by every entity repository. Each call is one remote
/// round trip; there is no batching and no cross-call transaction.
#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
