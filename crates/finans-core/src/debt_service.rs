//! Business logic for installment-based debts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use finans_domain::{Debt, DebtProgress, DebtStatus, Frequency, InstallmentUpdate, PaymentStatus};

use crate::{
    generate_installments, verify_installments, CoreError, CoreResult, FinanceRepository,
    InstallmentPlan, StatusChange,
};

/// User-supplied fields for a new debt.
#[derive(Debug, Clone)]
pub struct DebtDraft {
    pub member_id: Uuid,
    pub description: String,
    pub total_value: Decimal,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub installments_count: u32,
    pub category_id: Option<Uuid>,
}

impl DebtDraft {
    pub fn plan(&self) -> InstallmentPlan {
        InstallmentPlan::new(
            self.total_value,
            self.installments_count,
            self.start_date,
            self.frequency,
        )
    }
}

pub struct DebtService;

impl DebtService {
    /// Creates a debt and its full installment schedule in one insert.
    pub fn create(repo: &dyn FinanceRepository, draft: DebtDraft) -> CoreResult<Debt> {
        if draft.description.trim().is_empty() {
            tracing::warn!("rejected debt without description");
            return Err(CoreError::Validation("debt description is required".into()));
        }
        let plan = draft.plan();
        let id = Uuid::new_v4();
        let installments = generate_installments(id, &plan).map_err(|err| {
            tracing::warn!(error = %err, "rejected installment plan");
            err
        })?;
        let debt = Debt {
            id,
            member_id: draft.member_id,
            description: draft.description.trim().to_string(),
            total_value: plan.total_value,
            start_date: plan.start_date,
            frequency: plan.frequency,
            installments_count: plan.count,
            installment_value: plan.share(),
            status: DebtStatus::Active,
            category_id: draft.category_id,
        };
        repo.insert_debt(debt.clone(), installments)?;
        tracing::info!(
            debt_id = %debt.id,
            installments = debt.installments_count,
            total = %debt.total_value,
            "created debt"
        );
        Ok(debt)
    }

    /// Sets one installment's status and refreshes the debt's status.
    pub fn set_installment_status(
        repo: &dyn FinanceRepository,
        installment_id: Uuid,
        status: PaymentStatus,
    ) -> CoreResult<InstallmentUpdate> {
        Self::apply(repo, installment_id, StatusChange::Set(status))
    }

    /// Flips one installment between pending and paid.
    pub fn toggle_installment(
        repo: &dyn FinanceRepository,
        installment_id: Uuid,
    ) -> CoreResult<InstallmentUpdate> {
        Self::apply(repo, installment_id, StatusChange::Toggle)
    }

    fn apply(
        repo: &dyn FinanceRepository,
        installment_id: Uuid,
        change: StatusChange,
    ) -> CoreResult<InstallmentUpdate> {
        let update = repo.update_installment_status(installment_id, change)?;
        if update.debt_status_changed() {
            tracing::info!(
                debt_id = %update.installment.debt_id,
                from = %update.previous_debt_status,
                to = %update.debt_status,
                "debt status changed"
            );
        }
        Ok(update)
    }

    /// Deletes the debt with all of its installments, returning how many
    /// installments were removed.
    pub fn delete(repo: &dyn FinanceRepository, debt_id: Uuid) -> CoreResult<usize> {
        let (_, removed) = repo.delete_debt(debt_id)?;
        tracing::info!(%debt_id, installments = removed.len(), "deleted debt");
        Ok(removed.len())
    }

    pub fn progress(repo: &dyn FinanceRepository, debt_id: Uuid) -> CoreResult<DebtProgress> {
        if repo.debt(debt_id)?.is_none() {
            return Err(CoreError::DebtNotFound(debt_id));
        }
        let installments = repo.installments_for_debt(debt_id)?;
        Ok(DebtProgress::from_installments(debt_id, &installments))
    }

    /// Re-derives the schedule of a stored debt and compares it with what is
    /// persisted.
    pub fn verify(repo: &dyn FinanceRepository, debt_id: Uuid) -> CoreResult<()> {
        let debt = repo.debt(debt_id)?.ok_or(CoreError::DebtNotFound(debt_id))?;
        let installments = repo.installments_for_debt(debt_id)?;
        verify_installments(&debt, &installments)
    }
}
