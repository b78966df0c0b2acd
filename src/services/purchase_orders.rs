use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::purchase_order::{
    ActiveModel as OrderActiveModel, Currency, Model as OrderModel, OrderStatus,
};
use crate::errors::{validation_messages, ServiceError};
use crate::repositories::PurchaseOrderRepository;
use crate::services::{
    next_document_number, today, validate_total_amount, OperationResult, ORDER_NUMBER_PREFIX,
};

/// Payload for creating a purchase order. A blank order number is the
/// sentinel for "generate one"; unset date and currency fall back to today
/// and the organization's base currency.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderRequest {
    #[validate(length(max = 50, message = "order number must not exceed 50 characters"))]
    #[serde(default)]
    pub order_number: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "supplier name must be between 1 and 200 characters"
    ))]
    pub supplier_name: String,

    #[validate(email(message = "supplier email is not a valid address"))]
    pub supplier_email: Option<String>,

    #[validate(length(max = 20, message = "supplier phone must not exceed 20 characters"))]
    pub supplier_phone: Option<String>,

    #[validate(custom = "validate_total_amount")]
    pub total_amount: Decimal,

    pub currency: Option<Currency>,

    pub order_date: Option<NaiveDate>,

    pub expected_delivery_date: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    pub document_url: Option<String>,
}

/// Partial update: only present fields are applied. The order number is
/// immutable after creation and deliberately absent here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PurchaseOrderPatch {
    #[validate(length(
        min = 1,
        max = 200,
        message = "supplier name must be between 1 and 200 characters"
    ))]
    pub supplier_name: Option<String>,

    #[validate(email(message = "supplier email is not a valid address"))]
    pub supplier_email: Option<String>,

    #[validate(length(max = 20, message = "supplier phone must not exceed 20 characters"))]
    pub supplier_phone: Option<String>,

    #[validate(custom = "validate_total_amount")]
    pub total_amount: Option<Decimal>,

    pub currency: Option<Currency>,

    pub status: Option<OrderStatus>,

    pub order_date: Option<NaiveDate>,

    pub expected_delivery_date: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    pub document_url: Option<String>,
}

/// Sole entry point for mutating purchase orders. Structural validation,
/// uniqueness, date ordering, and transition legality are all enforced here
/// before anything reaches the persistence gateway.
#[derive(Clone)]
pub struct PurchaseOrderService {
    repo: PurchaseOrderRepository,
    base_currency: Currency,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DbPool>, base_currency: Currency) -> Self {
        Self {
            repo: PurchaseOrderRepository::new(db),
            base_currency,
        }
    }

    #[instrument(skip(self, request), fields(supplier = %request.supplier_name))]
    pub async fn create(
        &self,
        mut request: CreatePurchaseOrderRequest,
    ) -> OperationResult<OrderModel> {
        if request.order_number.trim().is_empty() {
            let existing = match self.repo.find_all().await {
                Ok(orders) => orders,
                Err(error) => {
                    error!(error = %error, "failed to load purchase orders for numbering");
                    return OperationResult::from_error(&error);
                }
            };
            request.order_number = next_document_number(
                ORDER_NUMBER_PREFIX,
                existing.iter().map(|order| order.order_number.as_str()),
                today(),
            );
        }

        if let Err(violations) = request.validate() {
            return OperationResult::rejected(validation_messages(&violations));
        }

        let order_date = request.order_date.unwrap_or_else(today);

        let rule_errors = match self.business_rule_errors(&request, order_date).await {
            Ok(errors) => errors,
            Err(error) => {
                error!(error = %error, "failed to check purchase order business rules");
                return OperationResult::from_error(&error);
            }
        };
        if !rule_errors.is_empty() {
            return OperationResult::rejected(rule_errors);
        }

        let now = Utc::now();
        let order = OrderActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(request.order_number.clone()),
            supplier_name: Set(request.supplier_name.clone()),
            supplier_email: Set(request.supplier_email.clone()),
            supplier_phone: Set(request.supplier_phone.clone()),
            total_amount: Set(request.total_amount),
            currency: Set(request.currency.unwrap_or(self.base_currency)),
            status: Set(OrderStatus::Pending),
            order_date: Set(order_date),
            expected_delivery_date: Set(request.expected_delivery_date),
            notes: Set(request.notes.clone()),
            document_url: Set(request.document_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match self.repo.insert(order).await {
            Ok(order) => {
                info!(order_id = %order.id, order_number = %order.order_number, "purchase order created");
                OperationResult::ok(order)
            }
            Err(error) => {
                error!(error = %error, "failed to persist purchase order");
                OperationResult::from_error(&error)
            }
        }
    }

    #[instrument(skip(self, patch), fields(order_id = %id))]
    pub async fn update(&self, id: Uuid, patch: PurchaseOrderPatch) -> OperationResult<OrderModel> {
        match self.try_update(id, patch).await {
            Ok(order) => {
                info!(order_id = %order.id, status = %order.status, "purchase order updated");
                OperationResult::ok(order)
            }
            Err(error) => {
                warn!(order_id = %id, error = %error, "purchase order update rejected");
                OperationResult::from_error(&error)
            }
        }
    }

    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete(&self, id: Uuid) -> OperationResult<()> {
        match self.try_delete(id).await {
            Ok(()) => {
                info!(order_id = %id, "purchase order deleted");
                OperationResult::completed()
            }
            Err(error) => {
                warn!(order_id = %id, error = %error, "purchase order delete rejected");
                OperationResult::from_error(&error)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<OrderModel>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// All orders, newest created first.
    pub async fn list(&self) -> Result<Vec<OrderModel>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn list_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        self.repo.find_by_status(status).await
    }

    pub async fn search_by_supplier(
        &self,
        fragment: &str,
    ) -> Result<Vec<OrderModel>, ServiceError> {
        self.repo.search_by_supplier(fragment).await
    }

    async fn try_update(
        &self,
        id: Uuid,
        patch: PurchaseOrderPatch,
    ) -> Result<OrderModel, ServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("purchase order {id} not found")))?;

        patch.validate()?;

        if let Some(next) = patch.status {
            if next != current.status && !current.status.can_transition_to(next) {
                return Err(ServiceError::InvalidTransition {
                    from: current.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        let effective_order_date = patch.order_date.unwrap_or(current.order_date);
        let effective_delivery = patch
            .expected_delivery_date
            .or(current.expected_delivery_date);
        if let Some(delivery) = effective_delivery {
            if delivery < effective_order_date {
                return Err(ServiceError::precondition_failed(
                    "expected delivery date must not precede the order date",
                ));
            }
        }

        let mut order: OrderActiveModel = current.into();
        if let Some(supplier_name) = patch.supplier_name {
            order.supplier_name = Set(supplier_name);
        }
        if let Some(supplier_email) = patch.supplier_email {
            order.supplier_email = Set(Some(supplier_email));
        }
        if let Some(supplier_phone) = patch.supplier_phone {
            order.supplier_phone = Set(Some(supplier_phone));
        }
        if let Some(total_amount) = patch.total_amount {
            order.total_amount = Set(total_amount);
        }
        if let Some(currency) = patch.currency {
            order.currency = Set(currency);
        }
        if let Some(status) = patch.status {
            order.status = Set(status);
        }
        if let Some(order_date) = patch.order_date {
            order.order_date = Set(order_date);
        }
        if let Some(expected_delivery_date) = patch.expected_delivery_date {
            order.expected_delivery_date = Set(Some(expected_delivery_date));
        }
        if let Some(notes) = patch.notes {
            order.notes = Set(Some(notes));
        }
        if let Some(document_url) = patch.document_url {
            order.document_url = Set(Some(document_url));
        }
        order.updated_at = Set(Utc::now());

        self.repo.update(order).await
    }

    async fn try_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("purchase order {id} not found")))?;

        if !current.status.is_deletable() {
            return Err(ServiceError::InvalidOperation(
                "only pending purchase orders can be deleted".to_string(),
            ));
        }

        self.repo.delete(id).await
    }

    async fn business_rule_errors(
        &self,
        request: &CreatePurchaseOrderRequest,
        order_date: NaiveDate,
    ) -> Result<Vec<String>, ServiceError> {
        let mut errors = Vec::new();

        let existing = self.repo.find_all().await?;
        if existing
            .iter()
            .any(|order| order.order_number == request.order_number)
        {
            errors.push(format!(
                "a purchase order with number '{}' already exists",
                request.order_number
            ));
        }

        if let Some(expected) = request.expected_delivery_date {
            if expected < order_date {
                errors.push("expected delivery date must not precede the order date".to_string());
            }
        }

        if request.total_amount < super::MIN_TOTAL_AMOUNT {
            errors.push("total amount must be greater than zero".to_string());
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_request() -> CreatePurchaseOrderRequest {
        CreatePurchaseOrderRequest {
            order_number: String::new(),
            supplier_name: "Acme".to_string(),
            supplier_email: None,
            supplier_phone: None,
            total_amount: dec!(100000),
            currency: None,
            order_date: None,
            expected_delivery_date: None,
            notes: None,
            document_url: None,
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn all_field_violations_are_collected() {
        let request = CreatePurchaseOrderRequest {
            supplier_name: String::new(),
            supplier_email: Some("not-an-email".to_string()),
            total_amount: dec!(0),
            notes: Some("x".repeat(1001)),
            ..valid_request()
        };

        let messages = validation_messages(&request.validate().unwrap_err());
        assert_eq!(messages.len(), 4);
        assert!(messages.contains(&"supplier name must be between 1 and 200 characters".to_string()));
        assert!(messages.contains(&"supplier email is not a valid address".to_string()));
        assert!(messages.contains(&"total amount must be greater than zero".to_string()));
        assert!(messages.contains(&"notes must not exceed 1000 characters".to_string()));
    }

    #[test]
    fn amount_above_the_limit_is_rejected() {
        let request = CreatePurchaseOrderRequest {
            total_amount: dec!(1000000000),
            ..valid_request()
        };

        let messages = validation_messages(&request.validate().unwrap_err());
        assert_eq!(
            messages,
            vec!["total amount exceeds the allowed limit".to_string()]
        );
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(PurchaseOrderPatch::default().validate().is_ok());
    }
}
