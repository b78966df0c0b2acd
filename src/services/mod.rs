use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use validator::ValidationError;

use crate::errors::ServiceError;

pub mod invoices;
pub mod purchase_orders;

pub use invoices::{CreateInvoiceRequest, InvoicePatch, InvoiceService, InvoiceSummary};
pub use purchase_orders::{CreatePurchaseOrderRequest, PurchaseOrderPatch, PurchaseOrderService};

pub(crate) const ORDER_NUMBER_PREFIX: &str = "OC";
pub(crate) const INVOICE_NUMBER_PREFIX: &str = "FAC";

pub(crate) const MIN_TOTAL_AMOUNT: Decimal = dec!(0.01);
pub(crate) const MAX_TOTAL_AMOUNT: Decimal = dec!(999999999.99);

/// Shared amount constraint for create and patch payloads.
pub(crate) fn validate_total_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < MIN_TOTAL_AMOUNT {
        let mut error = ValidationError::new("total_amount_positive");
        error.message = Some("total amount must be greater than zero".into());
        return Err(error);
    }
    if *value > MAX_TOTAL_AMOUNT {
        let mut error = ValidationError::new("total_amount_limit");
        error.message = Some("total amount exceeds the allowed limit".into());
        return Err(error);
    }
    Ok(())
}

/// Outcome envelope returned by every mutating service operation. Failures
/// of any kind land in `errors`; the services never return `Err` to their
/// callers.
#[derive(Debug, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> OperationResult<T> {
    /// Successful operation carrying the persisted record.
    pub fn ok(record: T) -> Self {
        Self {
            success: true,
            record: Some(record),
            errors: Vec::new(),
        }
    }

    /// Successful operation with nothing to return (deletes).
    pub fn completed() -> Self {
        Self {
            success: true,
            record: None,
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            record: None,
            errors,
        }
    }

    pub fn from_error(error: &ServiceError) -> Self {
        Self::rejected(error.messages())
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn into_record(self) -> Option<T> {
        self.record
    }
}

impl<T> From<Result<T, ServiceError>> for OperationResult<T> {
    fn from(result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(record) => Self::ok(record),
            Err(error) => Self::from_error(&error),
        }
    }
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Next document number for the month of `date`: `{PREFIX}-{YYYY}{MM}-{NNN}`
/// where NNN is the count of existing same-month numbers plus one.
///
/// Two concurrent creates in the same month can compute the same sequence;
/// there is no locking, and the uniqueness re-check at create time rejects
/// the second writer.
pub(crate) fn next_document_number<'a>(
    prefix: &str,
    existing: impl IntoIterator<Item = &'a str>,
    date: NaiveDate,
) -> String {
    let month_prefix = format!("{}-{:04}{:02}", prefix, date.year(), date.month());
    let in_month = existing
        .into_iter()
        .filter(|number| number.starts_with(&month_prefix))
        .count();

    format!("{}-{:03}", month_prefix, in_month + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn first_number_of_the_month() {
        assert_eq!(
            next_document_number(ORDER_NUMBER_PREFIX, std::iter::empty(), may_2025()),
            "OC-202505-001"
        );
    }

    #[test]
    fn sequence_counts_only_the_current_month() {
        let existing = ["OC-202505-001", "OC-202504-007", "FAC-202505-001"];
        assert_eq!(
            next_document_number(ORDER_NUMBER_PREFIX, existing, may_2025()),
            "OC-202505-002"
        );
    }

    #[test]
    fn sequence_is_zero_padded() {
        let existing: Vec<String> = (1..=11)
            .map(|n| format!("FAC-202505-{:03}", n))
            .collect();
        assert_eq!(
            next_document_number(
                INVOICE_NUMBER_PREFIX,
                existing.iter().map(String::as_str),
                may_2025()
            ),
            "FAC-202505-012"
        );
    }

    #[test]
    fn envelope_omits_empty_fields_when_serialized() {
        let ok = OperationResult::ok("record");
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "record": "record"}));

        let rejected = OperationResult::<String>::rejected(vec!["boom".to_string()]);
        let value = serde_json::to_value(&rejected).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "errors": ["boom"]})
        );
    }

    #[test]
    fn envelopes_can_be_built_from_results() {
        let ok: OperationResult<u8> = Ok(7).into();
        assert!(ok.is_success());

        let rejected: OperationResult<u8> = Err(ServiceError::conflict("duplicate")).into();
        assert!(!rejected.is_success());
        assert_eq!(rejected.errors, vec!["duplicate".to_string()]);
    }

    #[test]
    fn completed_envelope_has_no_record() {
        let done = OperationResult::<()>::completed();
        assert!(done.is_success());
        assert!(done.record().is_none());
    }
}
