use finans_domain::Frequency;
use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    #[error("Frequency {0} cannot drive an installment plan")]
    UnsupportedFrequency(Frequency),
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Debt not found: {0}")]
    DebtNotFound(Uuid),
    #[error("Installment not found: {0}")]
    InstallmentNotFound(Uuid),
    #[error("Revenue not found: {0}")]
    RevenueNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
