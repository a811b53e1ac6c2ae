//! The household snapshot: every member, category and financial record.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::Category, common::*, debt::*, member::Member, transaction::*};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub revenues: Vec<Revenue>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub installments: Vec<Installment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of changing one installment's status.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentUpdate {
    pub installment: Installment,
    pub previous_debt_status: DebtStatus,
    pub debt_status: DebtStatus,
}

impl InstallmentUpdate {
    pub fn debt_status_changed(&self) -> bool {
        self.previous_debt_status != self.debt_status
    }
}

/// Why a debt batch was refused by [`Household::add_debt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtRejection {
    DuplicateDebt(Uuid),
    DuplicateInstallment(Uuid),
    /// The installment belongs to another debt.
    ForeignInstallment(Uuid),
}

impl fmt::Display for DebtRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtRejection::DuplicateDebt(id) => write!(f, "debt {id} already exists"),
            DebtRejection::DuplicateInstallment(id) => {
                write!(f, "installment {id} already exists")
            }
            DebtRejection::ForeignInstallment(id) => {
                write!(f, "installment {id} does not belong to the debt")
            }
        }
    }
}

fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

impl Default for Household {
    fn default() -> Self {
        Self::new()
    }
}

impl Household {
    /// Creates an empty household seeded with the default categories.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            members: Vec::new(),
            categories: Category::defaults(),
            revenues: Vec::new(),
            expenses: Vec::new(),
            debts: Vec::new(),
            installments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn add_member(&mut self, member: Member) -> Uuid {
        let id = member.id;
        self.members.push(member);
        self.touch();
        id
    }

    pub fn member(&self, id: Uuid) -> Option<&Member> {
        find_by_id(&self.members, id)
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    /// Stores a debt together with its installments.
    ///
    /// The whole batch is refused, leaving the household untouched, when the
    /// debt or any installment id is already present or an installment points
    /// at another debt.
    pub fn add_debt(
        &mut self,
        debt: Debt,
        installments: Vec<Installment>,
    ) -> Result<(), DebtRejection> {
        if self.debt(debt.id).is_some() {
            return Err(DebtRejection::DuplicateDebt(debt.id));
        }
        let mut batch = HashSet::with_capacity(installments.len());
        for installment in &installments {
            if installment.debt_id != debt.id {
                return Err(DebtRejection::ForeignInstallment(installment.id));
            }
            if !batch.insert(installment.id) || self.installment(installment.id).is_some() {
                return Err(DebtRejection::DuplicateInstallment(installment.id));
            }
        }
        self.installments.extend(installments);
        self.debts.push(debt);
        self.touch();
        Ok(())
    }

    pub fn debt(&self, id: Uuid) -> Option<&Debt> {
        find_by_id(&self.debts, id)
    }

    pub fn installment(&self, id: Uuid) -> Option<&Installment> {
        find_by_id(&self.installments, id)
    }

    /// Every installment of `debt_id`, ordered by installment number.
    pub fn installments_for_debt(&self, debt_id: Uuid) -> Vec<&Installment> {
        let mut items: Vec<&Installment> = self
            .installments
            .iter()
            .filter(|inst| inst.debt_id == debt_id)
            .collect();
        items.sort_by_key(|inst| inst.installment_number);
        items
    }

    /// Sets an installment's status and recomputes its debt's status from the
    /// full current set of that debt's installments.
    pub fn set_installment_status(
        &mut self,
        installment_id: Uuid,
        status: PaymentStatus,
    ) -> Option<InstallmentUpdate> {
        let installment = self
            .installments
            .iter_mut()
            .find(|inst| inst.id == installment_id)?;
        installment.status = status;
        let installment = installment.clone();

        let derived = DebtStatus::derive(
            self.installments
                .iter()
                .filter(|inst| inst.debt_id == installment.debt_id),
        );
        let previous = match self
            .debts
            .iter_mut()
            .find(|debt| debt.id == installment.debt_id)
        {
            Some(debt) => std::mem::replace(&mut debt.status, derived),
            None => derived,
        };
        self.touch();
        Some(InstallmentUpdate {
            installment,
            previous_debt_status: previous,
            debt_status: derived,
        })
    }

    /// Removes a debt and all of its installments.
    pub fn remove_debt(&mut self, debt_id: Uuid) -> Option<(Debt, Vec<Installment>)> {
        let index = self.debts.iter().position(|debt| debt.id == debt_id)?;
        let debt = self.debts.remove(index);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.installments)
            .into_iter()
            .partition(|inst| inst.debt_id == debt_id);
        self.installments = kept;
        self.touch();
        Some((debt, removed))
    }

    pub fn add_revenues(&mut self, revenues: impl IntoIterator<Item = Revenue>) {
        self.revenues.extend(revenues);
        self.touch();
    }

    pub fn add_expenses(&mut self, expenses: impl IntoIterator<Item = Expense>) {
        self.expenses.extend(expenses);
        self.touch();
    }

    pub fn revenue(&self, id: Uuid) -> Option<&Revenue> {
        find_by_id(&self.revenues, id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        find_by_id(&self.expenses, id)
    }

    pub fn set_revenue_status(&mut self, id: Uuid, status: PaymentStatus) -> Option<&Revenue> {
        let index = self.revenues.iter().position(|rev| rev.id == id)?;
        self.revenues[index].status = status;
        self.touch();
        self.revenues.get(index)
    }

    pub fn set_expense_status(&mut self, id: Uuid, status: PaymentStatus) -> Option<&Expense> {
        let index = self.expenses.iter().position(|exp| exp.id == id)?;
        self.expenses[index].status = status;
        self.touch();
        self.expenses.get(index)
    }

    pub fn remove_revenue(&mut self, id: Uuid) -> Option<Revenue> {
        let index = self.revenues.iter().position(|rev| rev.id == id)?;
        self.touch();
        Some(self.revenues.remove(index))
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|exp| exp.id == id)?;
        self.touch();
        Some(self.expenses.remove(index))
    }
}
