//! Purchase order and invoice management core.
//!
//! Business-rule services over a relational store: structural validation,
//! uniqueness and referential checks, status transition enforcement, and
//! monthly document numbering for órdenes de compra and facturas.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod extraction;
pub mod logging;
pub mod migrator;
pub mod repositories;
pub mod services;
pub mod storage;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::{InvoiceService, PurchaseOrderService};

/// Application state: one database handle, constructed at startup and shared
/// by every service.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub purchase_orders: PurchaseOrderService,
    pub invoices: InvoiceService,
}

impl AppState {
    /// Connects to the database (running migrations when configured) and
    /// wires up the services.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let db = Arc::new(db::establish_connection_from_app_config(&config).await?);

        if config.auto_migrate {
            db::run_migrations(&db).await?;
        }

        Ok(Self::with_connection(db, config))
    }

    /// Wires up services over an existing connection pool.
    pub fn with_connection(db: Arc<DbPool>, config: AppConfig) -> Self {
        let purchase_orders = PurchaseOrderService::new(db.clone(), config.base_currency);
        let invoices = InvoiceService::new(db.clone(), config.base_currency);

        Self {
            db,
            config,
            purchase_orders,
            invoices,
        }
    }
}
