//! Persistence seam for generated records.
//!
//! [`FinanceRepository`] is what services talk to. Backends usually implement
//! the smaller [`HouseholdAccess`] instead and receive the repository through
//! the blanket impl, which routes every operation through a single read or
//! write of the [`Household`] snapshot.

use std::sync::Mutex;

use uuid::Uuid;

use finans_domain::{
    Category, Debt, Expense, Household, Installment, InstallmentUpdate, Member, OwnedByMember,
    PaymentStatus, Revenue,
};

use crate::{CoreError, CoreResult};

/// How a status update applies to the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Set(PaymentStatus),
    Toggle,
}

impl StatusChange {
    pub fn apply(self, current: PaymentStatus) -> PaymentStatus {
        match self {
            StatusChange::Set(status) => status,
            StatusChange::Toggle => current.toggled(),
        }
    }
}

/// Storage operations required by the services.
///
/// `update_installment_status` must apply the installment change and the
/// recomputation of the parent debt's status as one atomic step with respect
/// to concurrent updates of sibling installments.
pub trait FinanceRepository: Send + Sync {
    fn add_member(&self, member: Member) -> CoreResult<Uuid>;
    fn add_category(&self, category: Category) -> CoreResult<Uuid>;
    fn insert_debt(&self, debt: Debt, installments: Vec<Installment>) -> CoreResult<()>;
    fn insert_revenues(&self, revenues: Vec<Revenue>) -> CoreResult<()>;
    fn insert_expenses(&self, expenses: Vec<Expense>) -> CoreResult<()>;
    fn debt(&self, id: Uuid) -> CoreResult<Option<Debt>>;
    fn installment(&self, id: Uuid) -> CoreResult<Option<Installment>>;
    fn installments_for_debt(&self, debt_id: Uuid) -> CoreResult<Vec<Installment>>;
    fn update_installment_status(
        &self,
        installment_id: Uuid,
        change: StatusChange,
    ) -> CoreResult<InstallmentUpdate>;
    fn update_revenue_status(&self, id: Uuid, change: StatusChange) -> CoreResult<Revenue>;
    fn update_expense_status(&self, id: Uuid, change: StatusChange) -> CoreResult<Expense>;
    /// Removes the debt and every installment it owns.
    fn delete_debt(&self, id: Uuid) -> CoreResult<(Debt, Vec<Installment>)>;
    fn delete_revenue(&self, id: Uuid) -> CoreResult<Revenue>;
    fn delete_expense(&self, id: Uuid) -> CoreResult<Expense>;
    fn snapshot(&self) -> CoreResult<Household>;
}

/// Exclusive access to a household snapshot.
///
/// `write` must run `apply` under the same exclusion as every other access
/// and must discard the change when `apply` fails.
pub trait HouseholdAccess: Send + Sync {
    fn read<R>(&self, view: impl FnOnce(&Household) -> R) -> CoreResult<R>;
    fn write<R>(&self, apply: impl FnOnce(&mut Household) -> CoreResult<R>) -> CoreResult<R>;
}

impl<T: HouseholdAccess> FinanceRepository for T {
    fn add_member(&self, member: Member) -> CoreResult<Uuid> {
        self.write(|household| Ok(household.add_member(member)))
    }

    fn add_category(&self, category: Category) -> CoreResult<Uuid> {
        self.write(|household| Ok(household.add_category(category)))
    }

    fn insert_debt(&self, debt: Debt, installments: Vec<Installment>) -> CoreResult<()> {
        self.write(|household| {
            ensure_owned(household, &debt, debt.category_id)?;
            household
                .add_debt(debt, installments)
                .map_err(|rejection| CoreError::Validation(rejection.to_string()))
        })
    }

    fn insert_revenues(&self, revenues: Vec<Revenue>) -> CoreResult<()> {
        self.write(|household| {
            for revenue in &revenues {
                ensure_owned(household, revenue, revenue.category_id)?;
            }
            household.add_revenues(revenues);
            Ok(())
        })
    }

    fn insert_expenses(&self, expenses: Vec<Expense>) -> CoreResult<()> {
        self.write(|household| {
            for expense in &expenses {
                ensure_owned(household, expense, expense.category_id)?;
            }
            household.add_expenses(expenses);
            Ok(())
        })
    }

    fn debt(&self, id: Uuid) -> CoreResult<Option<Debt>> {
        self.read(|household| household.debt(id).cloned())
    }

    fn installment(&self, id: Uuid) -> CoreResult<Option<Installment>> {
        self.read(|household| household.installment(id).cloned())
    }

    fn installments_for_debt(&self, debt_id: Uuid) -> CoreResult<Vec<Installment>> {
        self.read(|household| {
            household
                .installments_for_debt(debt_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    fn update_installment_status(
        &self,
        installment_id: Uuid,
        change: StatusChange,
    ) -> CoreResult<InstallmentUpdate> {
        self.write(|household| {
            let current = household
                .installment(installment_id)
                .ok_or(CoreError::InstallmentNotFound(installment_id))?
                .status;
            household
                .set_installment_status(installment_id, change.apply(current))
                .ok_or(CoreError::InstallmentNotFound(installment_id))
        })
    }

    fn update_revenue_status(&self, id: Uuid, change: StatusChange) -> CoreResult<Revenue> {
        self.write(|household| {
            let current = household
                .revenue(id)
                .ok_or(CoreError::RevenueNotFound(id))?
                .status;
            household
                .set_revenue_status(id, change.apply(current))
                .cloned()
                .ok_or(CoreError::RevenueNotFound(id))
        })
    }

    fn update_expense_status(&self, id: Uuid, change: StatusChange) -> CoreResult<Expense> {
        self.write(|household| {
            let current = household
                .expense(id)
                .ok_or(CoreError::ExpenseNotFound(id))?
                .status;
            household
                .set_expense_status(id, change.apply(current))
                .cloned()
                .ok_or(CoreError::ExpenseNotFound(id))
        })
    }

    fn delete_debt(&self, id: Uuid) -> CoreResult<(Debt, Vec<Installment>)> {
        self.write(|household| household.remove_debt(id).ok_or(CoreError::DebtNotFound(id)))
    }

    fn delete_revenue(&self, id: Uuid) -> CoreResult<Revenue> {
        self.write(|household| {
            household
                .remove_revenue(id)
                .ok_or(CoreError::RevenueNotFound(id))
        })
    }

    fn delete_expense(&self, id: Uuid) -> CoreResult<Expense> {
        self.write(|household| {
            household
                .remove_expense(id)
                .ok_or(CoreError::ExpenseNotFound(id))
        })
    }

    fn snapshot(&self) -> CoreResult<Household> {
        self.read(Household::clone)
    }
}

/// Records may only reference members and categories the household knows.
fn ensure_owned<T: OwnedByMember>(
    household: &Household,
    record: &T,
    category_id: Option<Uuid>,
) -> CoreResult<()> {
    let member_id = record.member_id();
    if household.member(member_id).is_none() {
        return Err(CoreError::MemberNotFound(member_id));
    }
    match category_id {
        Some(id) if household.category(id).is_none() => Err(CoreError::CategoryNotFound(id)),
        _ => Ok(()),
    }
}

/// In-process repository holding the household behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    household: Mutex<Household>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_household(household: Household) -> Self {
        Self {
            household: Mutex::new(household),
        }
    }
}

impl HouseholdAccess for MemoryRepository {
    fn read<R>(&self, view: impl FnOnce(&Household) -> R) -> CoreResult<R> {
        let guard = self
            .household
            .lock()
            .map_err(|_| CoreError::Storage("household lock poisoned".into()))?;
        Ok(view(&guard))
    }

    fn write<R>(&self, apply: impl FnOnce(&mut Household) -> CoreResult<R>) -> CoreResult<R> {
        let mut guard = self
            .household
            .lock()
            .map_err(|_| CoreError::Storage("household lock poisoned".into()))?;
        let mut staged = guard.clone();
        let result = apply(&mut staged)?;
        *guard = staged;
        Ok(result)
    }
}
