//! Shared traits and enums for household finance records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar;

/// Number of decimal places money values are kept at.
pub const MONEY_SCALE: u32 = 2;

/// Exposes a stable identifier for stored entities.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Associates entities with an owning family member.
pub trait OwnedByMember {
    fn member_id(&self) -> Uuid;
}

/// Period unit governing date advancement for installments and recurrences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns `start` advanced by `periods` whole periods.
    ///
    /// Always measured from `start`, so month-end clamping never accumulates:
    /// Jan 31 advanced by 2 months is Mar 31 even though Feb clamps.
    /// `None` when the result leaves chrono's supported range.
    pub fn advance(self, start: NaiveDate, periods: u32) -> Option<NaiveDate> {
        let periods = i64::from(periods);
        match self {
            Frequency::Daily => calendar::add_days(start, periods),
            Frequency::Weekly => calendar::add_days(start, periods * 7),
            Frequency::Biweekly => calendar::add_days(start, periods * 15),
            Frequency::Monthly => calendar::add_months(start, i32::try_from(periods).ok()?),
            Frequency::Yearly => calendar::add_years(start, i32::try_from(periods).ok()?),
        }
    }

    /// Whether the frequency can drive an installment plan.
    pub fn supports_installments(self) -> bool {
        !matches!(self, Frequency::Daily)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "biweekly" => Some(Frequency::Biweekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Biweekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// Settlement state shared by revenues, expenses and installments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Pending => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Pending,
        }
    }

    pub fn is_paid(self) -> bool {
        self == PaymentStatus::Paid
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn advance_maps_each_frequency_to_its_period() {
        let start = date(2024, 1, 31);
        assert_eq!(Frequency::Daily.advance(start, 1), Some(date(2024, 2, 1)));
        assert_eq!(Frequency::Weekly.advance(start, 2), Some(date(2024, 2, 14)));
        assert_eq!(Frequency::Biweekly.advance(start, 1), Some(date(2024, 2, 15)));
        assert_eq!(Frequency::Monthly.advance(start, 1), Some(date(2024, 2, 29)));
        assert_eq!(Frequency::Yearly.advance(start, 1), Some(date(2025, 1, 31)));
    }

    #[test]
    fn monthly_advance_does_not_drift_after_clamping() {
        let start = date(2024, 1, 31);
        assert_eq!(Frequency::Monthly.advance(start, 2), Some(date(2024, 3, 31)));
        assert_eq!(Frequency::Monthly.advance(start, 3), Some(date(2024, 4, 30)));
    }

    #[test]
    fn zero_periods_is_the_anchor() {
        let start = date(2024, 6, 1);
        for frequency in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            assert_eq!(frequency.advance(start, 0), Some(start));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Frequency::parse(" Monthly "), Some(Frequency::Monthly));
        assert_eq!(Frequency::parse("BIWEEKLY"), Some(Frequency::Biweekly));
        assert_eq!(Frequency::parse("fortnightly"), None);
    }

    #[test]
    fn toggled_flips_status() {
        assert_eq!(PaymentStatus::Pending.toggled(), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::Paid.toggled(), PaymentStatus::Pending);
    }
}
