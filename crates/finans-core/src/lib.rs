//! finans-core
//!
//! Installment and recurrence generation plus the services that persist their
//! output through a [`FinanceRepository`]. Depends on finans-domain. No
//! terminal I/O, no direct file access.

pub mod debt_service;
pub mod error;
pub mod household_service;
pub mod installment;
pub mod recurrence;
pub mod repository;
pub mod summary_service;
pub mod transaction_service;

pub use debt_service::*;
pub use error::{CoreError, CoreResult};
pub use household_service::*;
pub use installment::*;
pub use recurrence::*;
pub use repository::*;
pub use summary_service::*;
pub use transaction_service::*;

#[cfg(test)]
mod tests;
