//! finans-domain
//!
//! Pure domain models (Member, Category, Revenue, Expense, Debt, Installment,
//! Household) plus calendar arithmetic. No I/O, no storage.

pub mod calendar;
pub mod category;
pub mod common;
pub mod debt;
pub mod household;
pub mod member;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use debt::*;
pub use household::*;
pub use member::*;
pub use transaction::*;
