use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a purchase order. `enviada` and `cancelada` are
/// terminal; every order starts out `pendiente`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pendiente")]
    #[serde(rename = "pendiente")]
    #[strum(serialize = "pendiente")]
    Pending,
    #[sea_orm(string_value = "enviada")]
    #[serde(rename = "enviada")]
    #[strum(serialize = "enviada")]
    Sent,
    #[sea_orm(string_value = "cancelada")]
    #[serde(rename = "cancelada")]
    #[strum(serialize = "cancelada")]
    Cancelled,
}

impl OrderStatus {
    /// Whether the declared transition table allows moving to `next`.
    /// Re-asserting the current status is not a transition and returns false.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Sent)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        match self {
            OrderStatus::Pending => false,
            OrderStatus::Sent | OrderStatus::Cancelled => true,
        }
    }

    /// Orders are only deletable while still pending.
    pub fn is_deletable(self) -> bool {
        self == OrderStatus::Pending
    }
}

/// Currencies accepted by the organization. CLP is the base currency.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[sea_orm(string_value = "CLP")]
    Clp,
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
    #[sea_orm(string_value = "COP")]
    Cop,
}

/// The `ordenes_compra` table. Column names follow the legacy Spanish
/// schema; the attached document URL is opaque to this crate.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ordenes_compra")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique human-readable number, `OC-YYYYMM-NNN`.
    #[sea_orm(column_name = "numero_orden")]
    pub order_number: String,

    #[sea_orm(column_name = "nombre_proveedor")]
    pub supplier_name: String,

    #[sea_orm(column_name = "email_proveedor")]
    pub supplier_email: Option<String>,

    #[sea_orm(column_name = "telefono_proveedor")]
    pub supplier_phone: Option<String>,

    #[sea_orm(column_name = "monto_total")]
    pub total_amount: Decimal,

    #[sea_orm(column_name = "moneda")]
    pub currency: Currency,

    #[sea_orm(column_name = "estado")]
    pub status: OrderStatus,

    #[sea_orm(column_name = "fecha_orden")]
    pub order_date: NaiveDate,

    /// Must not precede `order_date` when set.
    #[sea_orm(column_name = "fecha_entrega_esperada")]
    pub expected_delivery_date: Option<NaiveDate>,

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
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(OrderStatus::Pending, OrderStatus::Sent => true; "pending to sent")]
    #[test_case(OrderStatus::Pending, OrderStatus::Cancelled => true; "pending to cancelled")]
    #[test_case(OrderStatus::Pending, OrderStatus::Pending => false; "pending is not a transition")]
    #[test_case(OrderStatus::Sent, OrderStatus::Cancelled => false; "sent is terminal")]
    #[test_case(OrderStatus::Sent, OrderStatus::Pending => false; "no reversal from sent")]
    #[test_case(OrderStatus::Cancelled, OrderStatus::Sent => false; "cancelled is terminal")]
    #[test_case(OrderStatus::Cancelled, OrderStatus::Pending => false; "no reversal from cancelled")]
    fn transition_table(from: OrderStatus, to: OrderStatus) -> bool {
        from.can_transition_to(to)
    }

    #[test]
    fn only_pending_orders_are_deletable() {
        assert!(OrderStatus::Pending.is_deletable());
        assert!(!OrderStatus::Sent.is_deletable());
        assert!(!OrderStatus::Cancelled.is_deletable());
    }

    #[test]
    fn statuses_serialize_with_spanish_wire_values() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Pending).unwrap(),
            serde_json::json!("pendiente")
        );
        assert_eq!(
            serde_json::to_value(OrderStatus::Cancelled).unwrap(),
            serde_json::json!("cancelada")
        );
        assert_eq!(OrderStatus::Sent.to_string(), "enviada");
    }

    #[test]
    fn currencies_use_iso_codes() {
        assert_eq!(Currency::Clp.to_string(), "CLP");
        assert_eq!(
            serde_json::from_value::<Currency>(serde_json::json!("EUR")).unwrap(),
            Currency::Eur
        );
    }
}
