//! Installment plans: a debt split into dated, valued installments.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A purchase or obligation repaid through a fixed number of installments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    pub id: Uuid,
    pub member_id: Uuid,
    pub description: String,
    pub total_value: Decimal,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    pub installments_count: u32,
    /// Nominal per-installment share; the last installment absorbs rounding.
    pub installment_value: Decimal,
    #[serde(default)]
    pub status: DebtStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

impl Identifiable for Debt {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByMember for Debt {
    fn member_id(&self) -> Uuid {
        self.member_id
    }
}

/// One dated, valued chunk of a [`Debt`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub installment_number: u32,
    pub value: Decimal,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl Installment {
    /// `"3/12"` style position label.
    pub fn position_label(&self, count: u32) -> String {
        format!("{}/{}", self.installment_number, count)
    }
}

impl Identifiable for Installment {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Aggregate state of a debt, derived from its installments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DebtStatus {
    #[default]
    Active,
    Finished,
}

impl DebtStatus {
    /// `Finished` iff the debt has installments and every one of them is paid.
    pub fn derive<'a, I>(installments: I) -> DebtStatus
    where
        I: IntoIterator<Item = &'a Installment>,
    {
        let mut seen = false;
        for installment in installments {
            seen = true;
            if !installment.status.is_paid() {
                return DebtStatus::Active;
            }
        }
        if seen {
            DebtStatus::Finished
        } else {
            DebtStatus::Active
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DebtStatus::Active => "Active",
            DebtStatus::Finished => "Finished",
        };
        f.write_str(label)
    }
}

/// Repayment progress of a single debt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtProgress {
    pub debt_id: Uuid,
    pub paid_installments: u32,
    pub total_installments: u32,
    pub paid_value: Decimal,
    pub remaining_value: Decimal,
    pub next_due: Option<NaiveDate>,
}

impl DebtProgress {
    pub fn from_installments(debt_id: Uuid, installments: &[Installment]) -> Self {
        let mut progress = DebtProgress {
            debt_id,
            paid_installments: 0,
            total_installments: 0,
            paid_value: Decimal::ZERO,
            remaining_value: Decimal::ZERO,
            next_due: None,
        };
        for installment in installments {
            progress.total_installments += 1;
            if installment.status.is_paid() {
                progress.paid_installments += 1;
                progress.paid_value += installment.value;
            } else {
                progress.remaining_value += installment.value;
                progress.next_due = Some(match progress.next_due {
                    Some(current) => current.min(installment.due_date),
                    None => installment.due_date,
                });
            }
        }
        progress
    }

    pub fn is_complete(&self) -> bool {
        self.total_installments > 0 && self.paid_installments == self.total_installments
    }
}
