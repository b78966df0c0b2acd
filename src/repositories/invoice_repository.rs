use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::invoice::{
    ActiveModel as InvoiceActiveModel, Column, Entity as Invoice, InvoiceStatus,
    Model as InvoiceModel,
};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, Repository};

/// Persistence gateway for invoices.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All invoices, newest created first.
    pub async fn find_all(&self) -> Result<Vec<InvoiceModel>, ServiceError> {
        let invoices = Invoice::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.base.get_db())
            .await?;

        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceModel>, ServiceError> {
        let invoice = Invoice::find_by_id(id).one(self.base.get_db()).await?;
        Ok(invoice)
    }

    /// Invoices in the given status, soonest due date first.
    pub async fn find_by_status(
        &self,
        status: InvoiceStatus,
    ) -> Result<Vec<InvoiceModel>, ServiceError> {
        let invoices = Invoice::find()
            .filter(Column::Status.eq(status))
            .order_by_asc(Column::DueDate)
            .all(self.base.get_db())
            .await?;

        Ok(invoices)
    }

    /// Invoices issued against the given purchase order, newest invoice
    /// date first.
    pub async fn find_by_order(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Vec<InvoiceModel>, ServiceError> {
        let invoices = Invoice::find()
            .filter(Column::PurchaseOrderId.eq(purchase_order_id))
            .order_by_desc(Column::InvoiceDate)
            .all(self.base.get_db())
            .await?;

        Ok(invoices)
    }

    /// Pending invoices whose due date is strictly before `today`, most
    /// overdue first.
    pub async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<InvoiceModel>, ServiceError> {
        let invoices = Invoice::find()
            .filter(Column::Status.eq(InvoiceStatus::Pending))
            .filter(Column::DueDate.lt(today))
            .order_by_asc(Column::DueDate)
            .all(self.base.get_db())
            .await?;

        Ok(invoices)
    }

    pub async fn insert(&self, invoice: InvoiceActiveModel) -> Result<InvoiceModel, ServiceError> {
        let invoice = invoice.insert(self.base.get_db()).await?;
        Ok(invoice)
    }

    pub async fn update(&self, invoice: InvoiceActiveModel) -> Result<InvoiceModel, ServiceError> {
        let invoice = invoice.update(self.base.get_db()).await?;
        Ok(invoice)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        Invoice::delete_by_id(id).exec(self.base.get_db()).await?;
        Ok(())
    }
}
