//! Splits a debt into dated, valued installments.
//!
//! Generation is a pure function of the debt id and its [`InstallmentPlan`]:
//! the same inputs always yield the same installments, identifiers included,
//! so a stored schedule can be re-derived and checked at any time.
//!
//! Rounding: every installment but the last carries `total / count` rounded
//! toward zero to cents; the last one carries whatever remains, so the values
//! always sum to exactly `total_value`.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use finans_domain::{Debt, Frequency, Installment, PaymentStatus, MONEY_SCALE};

use crate::{CoreError, CoreResult};

/// Upper bound on installments per debt.
pub const MAX_INSTALLMENTS: u32 = 1024;

/// The parameters that fully determine an installment schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentPlan {
    pub total_value: Decimal,
    pub count: u32,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
}

impl InstallmentPlan {
    pub fn new(
        total_value: Decimal,
        count: u32,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            total_value,
            count,
            start_date,
            frequency,
        }
    }

    /// Rebuilds the plan a stored debt was generated from.
    pub fn from_debt(debt: &Debt) -> Self {
        Self::new(
            debt.total_value,
            debt.installments_count,
            debt.start_date,
            debt.frequency,
        )
    }

    /// Rejects plans that would produce empty, zero-valued or negative
    /// installments, or use a frequency installments do not support.
    pub fn validate(&self) -> CoreResult<()> {
        if self.count == 0 {
            return Err(CoreError::InvalidSplit(
                "installment count must be at least 1".into(),
            ));
        }
        if self.count > MAX_INSTALLMENTS {
            return Err(CoreError::InvalidSplit(format!(
                "installment count {} exceeds the maximum of {}",
                self.count, MAX_INSTALLMENTS
            )));
        }
        if self.total_value <= Decimal::ZERO {
            return Err(CoreError::InvalidSplit(format!(
                "total value must be positive, got {}",
                self.total_value
            )));
        }
        if !self.frequency.supports_installments() {
            return Err(CoreError::UnsupportedFrequency(self.frequency));
        }
        if self.share().is_zero() {
            return Err(CoreError::InvalidSplit(format!(
                "{} is too small to split into {} installments",
                self.total_value, self.count
            )));
        }
        Ok(())
    }

    /// Nominal value of every installment except possibly the last.
    pub fn share(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        (self.total_value / Decimal::from(self.count))
            .round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero)
    }

    /// Value of the final installment: the total minus all earlier shares.
    pub fn last_value(&self) -> Decimal {
        let earlier = self.count.saturating_sub(1);
        self.total_value - self.share() * Decimal::from(earlier)
    }

    /// Due date of the 1-based `installment_number`.
    pub fn due_date(&self, installment_number: u32) -> CoreResult<NaiveDate> {
        let offset = installment_number.saturating_sub(1);
        self.frequency
            .advance(self.start_date, offset)
            .ok_or_else(|| {
                CoreError::DateOutOfRange(format!(
                    "{} advanced by {} {} periods",
                    self.start_date, offset, self.frequency
                ))
            })
    }
}

/// Deterministic identifier of installment `installment_number` of `debt_id`.
pub fn installment_id(debt_id: Uuid, installment_number: u32) -> Uuid {
    Uuid::new_v5(&debt_id, &installment_number.to_be_bytes())
}

/// Produces the full ordered installment schedule for a debt.
///
/// Fails without producing anything when the plan is invalid or a due date
/// falls outside the supported calendar range.
pub fn generate_installments(debt_id: Uuid, plan: &InstallmentPlan) -> CoreResult<Vec<Installment>> {
    plan.validate()?;
    let share = plan.share();
    let mut installments = Vec::with_capacity(plan.count as usize);
    for number in 1..=plan.count {
        let value = if number == plan.count {
            plan.last_value()
        } else {
            share
        };
        installments.push(Installment {
            id: installment_id(debt_id, number),
            debt_id,
            installment_number: number,
            value,
            due_date: plan.due_date(number)?,
            status: PaymentStatus::Pending,
        });
    }
    tracing::debug!(
        %debt_id,
        count = plan.count,
        frequency = %plan.frequency,
        %share,
        "generated installment schedule"
    );
    Ok(installments)
}

/// Checks a stored installment set against the schedule its debt implies.
///
/// Statuses are ignored; numbering, values, due dates and identifiers must
/// all match the regenerated schedule.
pub fn verify_installments(debt: &Debt, installments: &[Installment]) -> CoreResult<()> {
    let expected = generate_installments(debt.id, &InstallmentPlan::from_debt(debt))?;
    let mut actual: Vec<&Installment> = installments.iter().collect();
    actual.sort_by_key(|inst| inst.installment_number);

    if actual.len() != expected.len() {
        return Err(CoreError::Validation(format!(
            "debt {} has {} installments, expected {}",
            debt.id,
            actual.len(),
            expected.len()
        )));
    }
    for (stored, derived) in actual.iter().zip(expected.iter()) {
        let matches = stored.debt_id == derived.debt_id
            && stored.installment_number == derived.installment_number
            && stored.value == derived.value
            && stored.due_date == derived.due_date
            && stored.id == derived.id;
        if !matches {
            return Err(CoreError::Validation(format!(
                "installment {} of debt {} does not match its schedule",
                derived.installment_number, debt.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_from_month_end_clamps_then_recovers() {
        let plan = InstallmentPlan::new(dec!(1200.00), 12, date(2024, 1, 31), Frequency::Monthly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();

        assert_eq!(items.len(), 12);
        assert!(items.iter().all(|inst| inst.value == dec!(100.00)));
        assert_eq!(items[0].due_date, date(2024, 1, 31));
        assert_eq!(items[1].due_date, date(2024, 2, 29));
        assert_eq!(items[2].due_date, date(2024, 3, 31));
        assert_eq!(items[3].due_date, date(2024, 4, 30));
        assert_eq!(items[11].due_date, date(2024, 12, 31));
    }

    #[test]
    fn weekly_schedule_steps_seven_days() {
        let plan = InstallmentPlan::new(dec!(300.00), 3, date(2024, 6, 1), Frequency::Weekly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();
        let dates: Vec<_> = items.iter().map(|inst| inst.due_date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 6, 1), date(2024, 6, 8), date(2024, 6, 15)]
        );
        assert!(items.iter().all(|inst| inst.value == dec!(100.00)));
    }

    #[test]
    fn biweekly_schedule_steps_fifteen_days() {
        let plan = InstallmentPlan::new(dec!(90.00), 3, date(2024, 12, 20), Frequency::Biweekly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();
        assert_eq!(items[1].due_date, date(2025, 1, 4));
        assert_eq!(items[2].due_date, date(2025, 1, 19));
    }

    #[test]
    fn yearly_schedule_from_leap_day() {
        let plan = InstallmentPlan::new(dec!(500.00), 3, date(2024, 2, 29), Frequency::Yearly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();
        assert_eq!(items[1].due_date, date(2025, 2, 28));
        assert_eq!(items[2].due_date, date(2026, 2, 28));
    }

    #[test]
    fn remainder_goes_to_last_installment() {
        let plan = InstallmentPlan::new(dec!(100.00), 3, date(2024, 1, 1), Frequency::Monthly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();
        let values: Vec<_> = items.iter().map(|inst| inst.value).collect();
        assert_eq!(values, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(values.iter().copied().sum::<Decimal>(), dec!(100.00));
        assert_eq!(plan.share(), dec!(33.33));
    }

    #[test]
    fn single_installment_carries_whole_total() {
        let plan = InstallmentPlan::new(dec!(59.99), 1, date(2024, 5, 5), Frequency::Monthly);
        let items = generate_installments(Uuid::new_v4(), &plan).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, dec!(59.99));
        assert_eq!(items[0].due_date, date(2024, 5, 5));
    }

    #[test]
    fn ids_are_derived_from_debt_and_number() {
        let debt_id = Uuid::new_v4();
        let plan = InstallmentPlan::new(dec!(40.00), 4, date(2024, 1, 1), Frequency::Weekly);
        let first = generate_installments(debt_id, &plan).unwrap();
        let second = generate_installments(debt_id, &plan).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[2].id, installment_id(debt_id, 3));
        assert_ne!(first[0].id, first[1].id);
        assert_ne!(installment_id(Uuid::new_v4(), 1), first[0].id);
    }

    #[test]
    fn rejects_invalid_plans() {
        let start = date(2024, 1, 1);
        let cases = [
            InstallmentPlan::new(dec!(100), 0, start, Frequency::Monthly),
            InstallmentPlan::new(dec!(0), 2, start, Frequency::Monthly),
            InstallmentPlan::new(dec!(-10), 2, start, Frequency::Monthly),
            InstallmentPlan::new(dec!(0.05), 10, start, Frequency::Monthly),
            InstallmentPlan::new(dec!(100), MAX_INSTALLMENTS + 1, start, Frequency::Monthly),
        ];
        for plan in cases {
            let err = generate_installments(Uuid::new_v4(), &plan).expect_err("must reject");
            assert!(matches!(err, CoreError::InvalidSplit(_)), "unexpected: {err:?}");
        }
    }

    #[test]
    fn rejects_daily_frequency() {
        let plan = InstallmentPlan::new(dec!(100), 2, date(2024, 1, 1), Frequency::Daily);
        let err = generate_installments(Uuid::new_v4(), &plan).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFrequency(Frequency::Daily)));
    }

    #[test]
    fn out_of_range_dates_reject_whole_schedule() {
        let plan = InstallmentPlan::new(dec!(100), 2, NaiveDate::MAX, Frequency::Yearly);
        let err = generate_installments(Uuid::new_v4(), &plan).unwrap_err();
        assert!(matches!(err, CoreError::DateOutOfRange(_)));
    }

    #[test]
    fn verify_detects_tampered_values() {
        let debt_id = Uuid::new_v4();
        let plan = InstallmentPlan::new(dec!(100.00), 3, date(2024, 1, 1), Frequency::Monthly);
        let mut items = generate_installments(debt_id, &plan).unwrap();
        let debt = Debt {
            id: debt_id,
            member_id: Uuid::new_v4(),
            description: "Sofa".into(),
            total_value: plan.total_value,
            start_date: plan.start_date,
            frequency: plan.frequency,
            installments_count: plan.count,
            installment_value: plan.share(),
            status: Default::default(),
            category_id: None,
        };
        items.reverse();
        verify_installments(&debt, &items).expect("order does not matter");

        items[0].value = dec!(1.00);
        assert!(verify_installments(&debt, &items).is_err());
        assert!(verify_installments(&debt, &items[1..]).is_err());
    }
}
