use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::invoice::{
    ActiveModel as InvoiceActiveModel, InvoiceStatus, Model as InvoiceModel,
};
use crate::entities::purchase_order::{Currency, OrderStatus};
use crate::errors::{validation_messages, ServiceError};
use crate::repositories::{InvoiceRepository, PurchaseOrderRepository};
use crate::services::{
    next_document_number, today, validate_total_amount, OperationResult, INVOICE_NUMBER_PREFIX,
};

/// Payload for creating an invoice against a sent purchase order. A blank
/// invoice number is the sentinel for "generate one".
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(max = 50, message = "invoice number must not exceed 50 characters"))]
    #[serde(default)]
    pub invoice_number: String,

    pub purchase_order_id: Uuid,

    #[validate(length(
        min = 1,
        max = 200,
        message = "seller name must be between 1 and 200 characters"
    ))]
    pub seller_name: String,

    #[validate(email(message = "seller email is not a valid address"))]
    pub seller_email: Option<String>,

    #[validate(length(max = 20, message = "seller phone must not exceed 20 characters"))]
    pub seller_phone: Option<String>,

    #[validate(custom = "validate_total_amount")]
    pub total_amount: Decimal,

    pub currency: Option<Currency>,

    pub invoice_date: Option<NaiveDate>,

    pub due_date: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    pub document_url: Option<String>,
}

/// Partial update: only present fields are applied. The invoice number and
/// the purchase-order reference are immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InvoicePatch {
    #[validate(length(
        min = 1,
        max = 200,
        message = "seller name must be between 1 and 200 characters"
    ))]
    pub seller_name: Option<String>,

    #[validate(email(message = "seller email is not a valid address"))]
    pub seller_email: Option<String>,

    #[validate(length(max = 20, message = "seller phone must not exceed 20 characters"))]
    pub seller_phone: Option<String>,

    #[validate(custom = "validate_total_amount")]
    pub total_amount: Option<Decimal>,

    pub currency: Option<Currency>,

    pub status: Option<InvoiceStatus>,

    pub invoice_date: Option<NaiveDate>,

    pub due_date: Option<NaiveDate>,

    pub payment_date: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    pub document_url: Option<String>,
}

/// Aggregates over pending and overdue invoices, computed by scanning the
/// fetched result sets in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub pending_count: u64,
    pub pending_amount: Decimal,
    pub overdue_count: u64,
    pub overdue_amount: Decimal,
}

/// Sole entry point for mutating invoices. Beyond the purchase-order rules,
/// an invoice can only be created against an order that has been sent, and
/// marking one paid without a payment date stamps today's date.
#[derive(Clone)]
pub struct InvoiceService {
    invoices: InvoiceRepository,
    orders: PurchaseOrderRepository,
    base_currency: Currency,
}

impl InvoiceService {
    pub fn new(db: Arc<DbPool>, base_currency: Currency) -> Self {
        Self {
            invoices: InvoiceRepository::new(db.clone()),
            orders: PurchaseOrderRepository::new(db),
            base_currency,
        }
    }

    #[instrument(skip(self, request), fields(purchase_order_id = %request.purchase_order_id))]
    pub async fn create(&self, mut request: CreateInvoiceRequest) -> OperationResult<InvoiceModel> {
        if request.invoice_number.trim().is_empty() {
            let existing = match self.invoices.find_all().await {
                Ok(invoices) => invoices,
                Err(error) => {
                    error!(error = %error, "failed to load invoices for numbering");
                    return OperationResult::from_error(&error);
                }
            };
            request.invoice_number = next_document_number(
                INVOICE_NUMBER_PREFIX,
                existing.iter().map(|invoice| invoice.invoice_number.as_str()),
                today(),
            );
        }

        if let Err(violations) = request.validate() {
            return OperationResult::rejected(validation_messages(&violations));
        }

        let invoice_date = request.invoice_date.unwrap_or_else(today);

        let rule_errors = match self.business_rule_errors(&request, invoice_date).await {
            Ok(errors) => errors,
            Err(error) => {
                error!(error = %error, "failed to check invoice business rules");
                return OperationResult::from_error(&error);
            }
        };
        if !rule_errors.is_empty() {
            return OperationResult::rejected(rule_errors);
        }

        let now = Utc::now();
        let invoice = InvoiceActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(request.invoice_number.clone()),
            purchase_order_id: Set(request.purchase_order_id),
            seller_name: Set(request.seller_name.clone()),
            seller_email: Set(request.seller_email.clone()),
            seller_phone: Set(request.seller_phone.clone()),
            total_amount: Set(request.total_amount),
            currency: Set(request.currency.unwrap_or(self.base_currency)),
            status: Set(InvoiceStatus::Pending),
            invoice_date: Set(invoice_date),
            due_date: Set(request.due_date),
            payment_date: Set(None),
            notes: Set(request.notes.clone()),
            document_url: Set(request.document_url.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match self.invoices.insert(invoice).await {
            Ok(invoice) => {
                info!(invoice_id = %invoice.id, invoice_number = %invoice.invoice_number, "invoice created");
                OperationResult::ok(invoice)
            }
            Err(error) => {
                error!(error = %error, "failed to persist invoice");
                OperationResult::from_error(&error)
            }
        }
    }

    #[instrument(skip(self, patch), fields(invoice_id = %id))]
    pub async fn update(&self, id: Uuid, patch: InvoicePatch) -> OperationResult<InvoiceModel> {
        match self.try_update(id, patch).await {
            Ok(invoice) => {
                info!(invoice_id = %invoice.id, status = %invoice.status, "invoice updated");
                OperationResult::ok(invoice)
            }
            Err(error) => {
                warn!(invoice_id = %id, error = %error, "invoice update rejected");
                OperationResult::from_error(&error)
            }
        }
    }

    /// Marks an invoice paid; without an explicit payment date, today's date
    /// is stamped by the update path.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payment_date: Option<NaiveDate>,
    ) -> OperationResult<InvoiceModel> {
        self.update(
            id,
            InvoicePatch {
                status: Some(InvoiceStatus::Paid),
                payment_date,
                ..InvoicePatch::default()
            },
        )
        .await
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete(&self, id: Uuid) -> OperationResult<()> {
        match self.try_delete(id).await {
            Ok(()) => {
                info!(invoice_id = %id, "invoice deleted");
                OperationResult::completed()
            }
            Err(error) => {
                warn!(invoice_id = %id, error = %error, "invoice delete rejected");
                OperationResult::from_error(&error)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<InvoiceModel>, ServiceError> {
        self.invoices.find_by_id(id).await
    }

    /// All invoices, newest created first.
    pub async fn list(&self) -> Result<Vec<InvoiceModel>, ServiceError> {
        self.invoices.find_all().await
    }

    pub async fn list_by_status(
        &self,
        status: InvoiceStatus,
    ) -> Result<Vec<InvoiceModel>, ServiceError> {
        self.invoices.find_by_status(status).await
    }

    pub async fn list_by_order(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Vec<InvoiceModel>, ServiceError> {
        self.invoices.find_by_order(purchase_order_id).await
    }

    /// Pending invoices whose due date has already passed.
    pub async fn list_overdue(&self) -> Result<Vec<InvoiceModel>, ServiceError> {
        self.invoices.find_overdue(today()).await
    }

    /// Count and summed amount over pending invoices, and separately over
    /// the overdue subset.
    pub async fn summary(&self) -> Result<InvoiceSummary, ServiceError> {
        let pending = self.invoices.find_by_status(InvoiceStatus::Pending).await?;
        let overdue = self.invoices.find_overdue(today()).await?;

        Ok(InvoiceSummary {
            pending_count: pending.len() as u64,
            pending_amount: pending.iter().map(|invoice| invoice.total_amount).sum(),
            overdue_count: overdue.len() as u64,
            overdue_amount: overdue.iter().map(|invoice| invoice.total_amount).sum(),
        })
    }

    async fn try_update(&self, id: Uuid, patch: InvoicePatch) -> Result<InvoiceModel, ServiceError> {
        let current = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("invoice {id} not found")))?;

        patch.validate()?;

        if let Some(next) = patch.status {
            if next != current.status && !current.status.can_transition_to(next) {
                return Err(ServiceError::InvalidTransition {
                    from: current.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        let effective_invoice_date = patch.invoice_date.unwrap_or(current.invoice_date);
        let effective_due = patch.due_date.or(current.due_date);
        if let Some(due) = effective_due {
            if due < effective_invoice_date {
                return Err(ServiceError::precondition_failed(
                    "due date must not precede the invoice date",
                ));
            }
        }

        let becomes_paid = patch.status == Some(InvoiceStatus::Paid);

        let mut invoice: InvoiceActiveModel = current.into();
        if let Some(seller_name) = patch.seller_name {
            invoice.seller_name = Set(seller_name);
        }
        if let Some(seller_email) = patch.seller_email {
            invoice.seller_email = Set(Some(seller_email));
        }
        if let Some(seller_phone) = patch.seller_phone {
            invoice.seller_phone = Set(Some(seller_phone));
        }
        if let Some(total_amount) = patch.total_amount {
            invoice.total_amount = Set(total_amount);
        }
        if let Some(currency) = patch.currency {
            invoice.currency = Set(currency);
        }
        if let Some(status) = patch.status {
            invoice.status = Set(status);
        }
        if let Some(invoice_date) = patch.invoice_date {
            invoice.invoice_date = Set(invoice_date);
        }
        if let Some(due_date) = patch.due_date {
            invoice.due_date = Set(Some(due_date));
        }
        if let Some(payment_date) = patch.payment_date {
            invoice.payment_date = Set(Some(payment_date));
        } else if becomes_paid {
            invoice.payment_date = Set(Some(today()));
        }
        if let Some(notes) = patch.notes {
            invoice.notes = Set(Some(notes));
        }
        if let Some(document_url) = patch.document_url {
            invoice.document_url = Set(Some(document_url));
        }
        invoice.updated_at = Set(Utc::now());

        self.invoices.update(invoice).await
    }

    async fn try_delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let current = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("invoice {id} not found")))?;

        if !current.status.is_deletable() {
            return Err(ServiceError::InvalidOperation(
                "paid invoices cannot be deleted".to_string(),
            ));
        }

        self.invoices.delete(id).await
    }

    async fn business_rule_errors(
        &self,
        request: &CreateInvoiceRequest,
        invoice_date: NaiveDate,
    ) -> Result<Vec<String>, ServiceError> {
        let mut errors = Vec::new();

        let existing = self.invoices.find_all().await?;
        if existing
            .iter()
            .any(|invoice| invoice.invoice_number == request.invoice_number)
        {
            errors.push(format!(
                "an invoice with number '{}' already exists",
                request.invoice_number
            ));
        }

        match self.orders.find_by_id(request.purchase_order_id).await? {
            None => {
                errors.push("the referenced purchase order does not exist".to_string());
            }
            Some(order) if order.status != OrderStatus::Sent => {
                errors.push(format!(
                    "invoices can only be created for sent purchase orders, order '{}' is '{}'",
                    order.order_number, order.status
                ));
            }
            Some(_) => {}
        }

        if let Some(due) = request.due_date {
            if due < invoice_date {
                errors.push("due date must not precede the invoice date".to_string());
            }
        }

        if request.total_amount < super::MIN_TOTAL_AMOUNT {
            errors.push("total amount must be greater than zero".to_string());
        }

        Ok(errors)
    }
}
