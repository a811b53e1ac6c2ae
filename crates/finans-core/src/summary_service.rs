//! Monthly aggregates for one family member.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use finans_domain::{
    calendar::month_key, Expense, Household, Installment, OwnedByMember, PaymentStatus, Revenue,
};

use crate::{CoreError, CoreResult, FinanceRepository};

/// How many entries the recent-activity list keeps.
pub const RECENT_ENTRIES: usize = 10;

const INSTALLMENT_FALLBACK_LABEL: &str = "Installment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Revenue,
    Expense,
    Installment,
}

/// A revenue, expense or installment flattened for activity listings.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub description: String,
    pub value: Decimal,
    pub date: NaiveDate,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub member_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub total_revenue: Decimal,
    pub received_revenue: Decimal,
    /// Expenses plus installments falling due in the month.
    pub total_expense: Decimal,
    pub total_paid: Decimal,
    pub final_balance: Decimal,
    pub revenues: Vec<Revenue>,
    pub expenses: Vec<Expense>,
    pub installments: Vec<Installment>,
    /// Most recent entries first, at most [`RECENT_ENTRIES`].
    pub recent: Vec<SummaryEntry>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn monthly_for(
        repo: &dyn FinanceRepository,
        member_id: Uuid,
        year: i32,
        month: u32,
    ) -> CoreResult<MonthlySummary> {
        Self::monthly(&repo.snapshot()?, member_id, year, month)
    }

    /// Aggregates the member's revenues, expenses and debt installments dated
    /// in `year`/`month`.
    pub fn monthly(
        household: &Household,
        member_id: Uuid,
        year: i32,
        month: u32,
    ) -> CoreResult<MonthlySummary> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::Validation(format!("invalid month {month}")));
        }
        let key = (year, month);

        let mut revenues: Vec<Revenue> = household
            .revenues
            .iter()
            .filter(|rev| rev.member_id() == member_id && month_key(rev.date) == key)
            .cloned()
            .collect();
        revenues.sort_by_key(|rev| rev.date);

        let mut expenses: Vec<Expense> = household
            .expenses
            .iter()
            .filter(|exp| exp.member_id() == member_id && month_key(exp.due_date) == key)
            .cloned()
            .collect();
        expenses.sort_by_key(|exp| exp.due_date);

        let mut installments: Vec<Installment> = household
            .installments
            .iter()
            .filter(|inst| {
                month_key(inst.due_date) == key
                    && household
                        .debt(inst.debt_id)
                        .is_some_and(|debt| debt.member_id() == member_id)
            })
            .cloned()
            .collect();
        installments.sort_by_key(|inst| inst.due_date);

        let total_revenue: Decimal = revenues.iter().map(|rev| rev.value).sum();
        let received_revenue: Decimal = revenues
            .iter()
            .filter(|rev| rev.status.is_paid())
            .map(|rev| rev.value)
            .sum();
        let total_expense: Decimal = expenses.iter().map(|exp| exp.value).sum::<Decimal>()
            + installments.iter().map(|inst| inst.value).sum::<Decimal>();
        let total_paid: Decimal = expenses
            .iter()
            .filter(|exp| exp.status.is_paid())
            .map(|exp| exp.value)
            .sum::<Decimal>()
            + installments
                .iter()
                .filter(|inst| inst.status.is_paid())
                .map(|inst| inst.value)
                .sum::<Decimal>();

        let recent = recent_entries(household, &revenues, &expenses, &installments);

        Ok(MonthlySummary {
            member_id,
            year,
            month,
            total_revenue,
            received_revenue,
            total_expense,
            total_paid,
            final_balance: total_revenue - total_expense,
            revenues,
            expenses,
            installments,
            recent,
        })
    }
}

fn recent_entries(
    household: &Household,
    revenues: &[Revenue],
    expenses: &[Expense],
    installments: &[Installment],
) -> Vec<SummaryEntry> {
    let mut entries: Vec<SummaryEntry> = revenues
        .iter()
        .map(|rev| SummaryEntry {
            id: rev.id,
            kind: EntryKind::Revenue,
            description: rev.description.clone(),
            value: rev.value,
            date: rev.date,
            status: rev.status,
        })
        .chain(expenses.iter().map(|exp| SummaryEntry {
            id: exp.id,
            kind: EntryKind::Expense,
            description: exp.description.clone(),
            value: exp.value,
            date: exp.due_date,
            status: exp.status,
        }))
        .chain(installments.iter().map(|inst| SummaryEntry {
            id: inst.id,
            kind: EntryKind::Installment,
            description: match household.debt(inst.debt_id) {
                Some(debt) => format!(
                    "{} {}",
                    debt.description,
                    inst.position_label(debt.installments_count)
                ),
                None => INSTALLMENT_FALLBACK_LABEL.to_string(),
            },
            value: inst.value,
            date: inst.due_date,
            status: inst.status,
        }))
        .collect();
    // Stable sort keeps revenue, expense, installment order within a day.
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(RECENT_ENTRIES);
    entries
}
