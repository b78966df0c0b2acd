#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use uuid::Uuid;

use compras_api::config::AppConfig;
use compras_api::entities::purchase_order::{Model as OrderModel, OrderStatus};
use compras_api::services::{
    CreateInvoiceRequest, CreatePurchaseOrderRequest, PurchaseOrderPatch,
};
use compras_api::AppState;

/// Harness spinning up the services over a fresh SQLite database in a
/// per-test temporary directory, with the real migrations applied.
pub struct TestApp {
    pub state: AppState,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let db_path = data_dir.path().join("compras_test.db");

        let mut config = AppConfig::new(format!("sqlite://{}?mode=rwc", db_path.display()));
        config.auto_migrate = true;
        config.db_max_connections = 1;
        config.db_min_connections = 1;

        let state = AppState::from_config(config)
            .await
            .expect("failed to build test application state");

        Self {
            state,
            _data_dir: data_dir,
        }
    }

    /// Creates a pending order for the given supplier and amount.
    pub async fn pending_order(&self, supplier: &str, amount: Decimal) -> OrderModel {
        let result = self
            .state
            .purchase_orders
            .create(order_request(supplier, amount))
            .await;
        assert!(result.is_success(), "order creation failed: {:?}", result.errors);
        result.into_record().unwrap()
    }

    /// Creates an order and moves it to `enviada` so invoices can reference it.
    pub async fn sent_order(&self, supplier: &str, amount: Decimal) -> OrderModel {
        let order = self.pending_order(supplier, amount).await;
        let result = self
            .state
            .purchase_orders
            .update(
                order.id,
                PurchaseOrderPatch {
                    status: Some(OrderStatus::Sent),
                    ..PurchaseOrderPatch::default()
                },
            )
            .await;
        assert!(result.is_success(), "sending order failed: {:?}", result.errors);
        result.into_record().unwrap()
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn order_request(supplier: &str, amount: Decimal) -> CreatePurchaseOrderRequest {
    CreatePurchaseOrderRequest {
        order_number: String::new(),
        supplier_name: supplier.to_string(),
        supplier_email: None,
        supplier_phone: None,
        total_amount: amount,
        currency: None,
        order_date: None,
        expected_delivery_date: None,
        notes: None,
        document_url: None,
    }
}

pub fn invoice_request(purchase_order_id: Uuid, seller: &str) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        invoice_number: String::new(),
        purchase_order_id,
        seller_name: seller.to_string(),
        seller_email: None,
        seller_phone: None,
        total_amount: dec!(250000),
        currency: None,
        invoice_date: None,
        due_date: None,
        notes: None,
        document_url: None,
    }
}
