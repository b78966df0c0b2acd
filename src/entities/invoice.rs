use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::purchase_order::Currency;

/// Lifecycle states of an invoice. `pagada` is terminal; a pending invoice
/// may be paid directly without passing through `enviada`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "pendiente")]
    #[serde(rename = "pendiente")]
    #[strum(serialize = "pendiente")]
    Pending,
    #[sea_orm(string_value = "enviada")]
    #[serde(rename = "enviada")]
    #[strum(serialize = "enviada")]
    Sent,
    #[sea_orm(string_value = "pagada")]
    #[serde(rename = "pagada")]
    #[strum(serialize = "pagada")]
    Paid,
}

impl InvoiceStatus {
    /// Whether the declared transition table allows moving to `next`.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Pending, InvoiceStatus::Sent)
                | (InvoiceStatus::Pending, InvoiceStatus::Paid)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
        )
    }

    pub fn is_terminal(self) -> bool {
        match self {
            InvoiceStatus::Pending | InvoiceStatus::Sent => false,
            InvoiceStatus::Paid => true,
        }
    }

    /// Paid invoices cannot be deleted.
    pub fn is_deletable(self) -> bool {
        self != InvoiceStatus::Paid
    }
}

/// The `facturas` table. Each invoice references exactly one purchase order,
/// which must have been sent before the invoice is created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facturas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique human-readable number, `FAC-YYYYMM-NNN`.
    #[sea_orm(column_name = "numero_factura")]
    pub invoice_number: String,

    #[sea_orm(column_name = "orden_compra_id")]
    pub purchase_order_id: Uuid,

    #[sea_orm(column_name = "nombre_vendedor")]
    pub seller_name: String,

    #[sea_orm(column_name = "email_vendedor")]
    pub seller_email: Option<String>,

    #[sea_orm(column_name = "telefono_vendedor")]
    pub seller_phone: Option<String>,

    #[sea_orm(column_name = "monto_total")]
    pub total_amount: Decimal,

    #[sea_orm(column_name = "moneda")]
    pub currency: Currency,

    #[sea_orm(column_name = "estado")]
    pub status: InvoiceStatus,

    #[sea_orm(column_name = "fecha_factura")]
    pub invoice_date: NaiveDate,

    /// Must not precede `invoice_date` when set.
    #[sea_orm(column_name = "fecha_vencimiento")]
    pub due_date: Option<NaiveDate>,

    /// Stamped automatically when the invoice is marked paid without an
    /// explicit payment date.
    #[sea_orm(column_name = "fecha_pago")]
    pub payment_date: Option<NaiveDate>,

    #[sea_orm(column_name = "notas")]
    pub notes: Option<String>,

    #[sea_orm(column_name = "url_documento")]
    pub document_url: Option<String>,

    #[sea_orm(column_name = "creado_en")]
    pub created_at: DateTime<Utc>,

    #[sea_orm(column_name = "actualizado_en")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id"
    )]
    PurchaseOrder,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(InvoiceStatus::Pending, InvoiceStatus::Sent => true; "pending to sent")]
    #[test_case(InvoiceStatus::Pending, InvoiceStatus::Paid => true; "pending paid directly")]
    #[test_case(InvoiceStatus::Sent, InvoiceStatus::Paid => true; "sent to paid")]
    #[test_case(InvoiceStatus::Sent, InvoiceStatus::Pending => false; "no reversal from sent")]
    #[test_case(InvoiceStatus::Paid, InvoiceStatus::Pending => false; "paid is terminal")]
    #[test_case(InvoiceStatus::Paid, InvoiceStatus::Sent => false; "paid never reopens")]
    #[test_case(InvoiceStatus::Paid, InvoiceStatus::Paid => false; "paid is not a transition")]
    fn transition_table(from: InvoiceStatus, to: InvoiceStatus) -> bool {
        from.can_transition_to(to)
    }

    #[test]
    fn paid_invoices_are_not_deletable() {
        assert!(InvoiceStatus::Pending.is_deletable());
        assert!(InvoiceStatus::Sent.is_deletable());
        assert!(!InvoiceStatus::Paid.is_deletable());
    }

    #[test]
    fn status_wire_values_are_spanish() {
        assert_eq!(InvoiceStatus::Paid.to_string(), "pagada");
        assert_eq!(
            serde_json::from_value::<InvoiceStatus>(serde_json::json!("enviada")).unwrap(),
            InvoiceStatus::Sent
        );
    }
}
