use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::purchase_order::{
    ActiveModel as OrderActiveModel, Column, Entity as PurchaseOrder, Model as OrderModel,
    OrderStatus,
};
use crate::errors::ServiceError;
use crate::repositories::{BaseRepository, Repository};

/// Persistence gateway for purchase orders.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    base: BaseRepository,
}

impl PurchaseOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All orders, newest created first.
    pub async fn find_all(&self) -> Result<Vec<OrderModel>, ServiceError> {
        let orders = PurchaseOrder::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.base.get_db())
            .await?;

        Ok(orders)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderModel>, ServiceError> {
        let order = PurchaseOrder::find_by_id(id)
            .one(self.base.get_db())
            .await?;

        Ok(order)
    }

    /// Orders in the given status, most recent order date first.
    pub async fn find_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        let orders = PurchaseOrder::find()
            .filter(Column::Status.eq(status))
            .order_by_desc(Column::OrderDate)
            .all(self.base.get_db())
            .await?;

        Ok(orders)
    }

    /// Orders whose supplier name contains the given fragment.
    pub async fn search_by_supplier(
        &self,
        fragment: &str,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        let orders = PurchaseOrder::find()
            .filter(Column::SupplierName.contains(fragment))
            .order_by_desc(Column::CreatedAt)
            .all(self.base.get_db())
            .await?;

        Ok(orders)
    }

    pub async fn insert(&self, order: OrderActiveModel) -> Result<OrderModel, ServiceError> {
        let order = order.insert(self.base.get_db()).await?;
        Ok(order)
    }

    pub async fn update(&self, order: OrderActiveModel) -> Result<OrderModel, ServiceError> {
        let order = order.update(self.base.get_db()).await?;
        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        PurchaseOrder::delete_by_id(id)
            .exec(self.base.get_db())
            .await?;

        Ok(())
    }
}
