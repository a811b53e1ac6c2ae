//! Business logic for revenues and simple expenses.

use rust_decimal::Decimal;
use uuid::Uuid;

use finans_domain::{Expense, Revenue};

use crate::{expand_recurrence, CoreError, CoreResult, FinanceRepository, StatusChange};

/// Validated create/toggle/delete helpers for revenues and expenses.
pub struct TransactionService;

impl TransactionService {
    /// Expands `template` into `repetitions` revenues and stores them.
    pub fn add_revenue(
        repo: &dyn FinanceRepository,
        template: Revenue,
        repetitions: u32,
    ) -> CoreResult<Vec<Revenue>> {
        validate_entry(&template.description, template.value)?;
        let revenues = expand_recurrence(&template, repetitions)?;
        repo.insert_revenues(revenues.clone())?;
        tracing::info!(
            member_id = %template.member_id,
            count = revenues.len(),
            "added revenue"
        );
        Ok(revenues)
    }

    /// Expands `template` into `repetitions` expenses and stores them.
    pub fn add_expense(
        repo: &dyn FinanceRepository,
        template: Expense,
        repetitions: u32,
    ) -> CoreResult<Vec<Expense>> {
        validate_entry(&template.description, template.value)?;
        let expenses = expand_recurrence(&template, repetitions)?;
        repo.insert_expenses(expenses.clone())?;
        tracing::info!(
            member_id = %template.member_id,
            count = expenses.len(),
            "added expense"
        );
        Ok(expenses)
    }

    pub fn toggle_revenue_status(repo: &dyn FinanceRepository, id: Uuid) -> CoreResult<Revenue> {
        repo.update_revenue_status(id, StatusChange::Toggle)
    }

    pub fn toggle_expense_status(repo: &dyn FinanceRepository, id: Uuid) -> CoreResult<Expense> {
        repo.update_expense_status(id, StatusChange::Toggle)
    }

    /// Removes one revenue; sibling occurrences of the same recurrence stay.
    pub fn delete_revenue(repo: &dyn FinanceRepository, id: Uuid) -> CoreResult<Revenue> {
        let removed = repo.delete_revenue(id)?;
        tracing::info!(revenue_id = %id, "deleted revenue");
        Ok(removed)
    }

    /// Removes one expense; sibling occurrences of the same recurrence stay.
    pub fn delete_expense(repo: &dyn FinanceRepository, id: Uuid) -> CoreResult<Expense> {
        let removed = repo.delete_expense(id)?;
        tracing::info!(expense_id = %id, "deleted expense");
        Ok(removed)
    }
}

fn validate_entry(description: &str, value: Decimal) -> CoreResult<()> {
    if description.trim().is_empty() {
        tracing::warn!("rejected entry without description");
        return Err(CoreError::Validation("description is required".into()));
    }
    if value <= Decimal::ZERO {
        tracing::warn!(%value, "rejected non-positive entry value");
        return Err(CoreError::Validation(format!(
            "value must be positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRepository;
    use chrono::NaiveDate;
    use finans_domain::{Frequency, Member, PaymentStatus};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo_with_member() -> (MemoryRepository, Uuid) {
        let repo = MemoryRepository::new();
        let member = repo.add_member(Member::new("Lia")).unwrap();
        (repo, member)
    }

    #[test]
    fn deleting_one_occurrence_keeps_siblings() {
        let (repo, member) = repo_with_member();
        let template = Expense::new(member, "Internet", dec!(120.00), date(2024, 1, 5))
            .recurring(Frequency::Monthly);
        let created = TransactionService::add_expense(&repo, template, 3).unwrap();

        TransactionService::delete_expense(&repo, created[1].id).unwrap();
        let stored = repo.snapshot().unwrap().expenses;
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|exp| exp.id != created[1].id));
    }

    #[test]
    fn toggling_one_occurrence_leaves_others_pending() {
        let (repo, member) = repo_with_member();
        let template = Revenue::new(member, "Rent income", dec!(900.00), date(2024, 1, 1))
            .recurring(Frequency::Monthly);
        let created = TransactionService::add_revenue(&repo, template, 2).unwrap();

        let toggled = TransactionService::toggle_revenue_status(&repo, created[0].id).unwrap();
        assert_eq!(toggled.status, PaymentStatus::Paid);
        let other = repo.snapshot().unwrap().revenue(created[1].id).cloned().unwrap();
        assert_eq!(other.status, PaymentStatus::Pending);
    }

    #[test]
    fn rejects_blank_or_non_positive_entries() {
        let (repo, member) = repo_with_member();
        let blank = Revenue::new(member, "  ", dec!(10.00), date(2024, 1, 1));
        assert!(TransactionService::add_revenue(&repo, blank, 1).is_err());

        let negative = Expense::new(member, "Refund", dec!(-5.00), date(2024, 1, 1));
        assert!(TransactionService::add_expense(&repo, negative, 1).is_err());
        assert!(repo.snapshot().unwrap().expenses.is_empty());
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let repo = MemoryRepository::new();
        let missing = Uuid::new_v4();
        let err = TransactionService::toggle_expense_status(&repo, missing).unwrap_err();
        assert!(matches!(err, CoreError::ExpenseNotFound(id) if id == missing));
    }
}
