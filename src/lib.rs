#![doc(test(attr(deny(warnings))))]

//! Finans tracks a family's revenues, expenses and installment debts.
//!
//! The workspace crates carry the model (`finans-domain`), the generation
//! engine and services (`finans-core`), JSON persistence
//! (`finans-storage-json`) and preferences (`finans-config`); this crate
//! wires them together behind [`FinansApp`].

pub mod app;
pub mod error;
pub mod utils;

pub use app::FinansApp;
pub use error::{AppError, AppResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finans tracing initialized.");
    });
}
