use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    CoreError, DebtDraft, DebtService, EntryKind, FinanceRepository, HouseholdService,
    MemoryRepository, SummaryService, TransactionService,
};
use finans_domain::{CategoryKind, DebtStatus, Expense, Frequency, PaymentStatus, Revenue};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draft(member_id: Uuid, total: rust_decimal::Decimal, count: u32) -> DebtDraft {
    DebtDraft {
        member_id,
        description: "Refrigerator".into(),
        total_value: total,
        start_date: date(2024, 3, 10),
        frequency: Frequency::Monthly,
        installments_count: count,
        category_id: None,
    }
}

fn repo_with_member() -> (MemoryRepository, Uuid) {
    let repo = MemoryRepository::new();
    let member = HouseholdService::add_member(&repo, "Ana").unwrap().id;
    (repo, member)
}

#[test]
fn paying_last_installment_finishes_debt_and_reverting_reactivates() {
    let (repo, member) = repo_with_member();
    let debt = DebtService::create(&repo, draft(member, dec!(300.00), 3)).unwrap();
    let installments = repo.installments_for_debt(debt.id).unwrap();
    assert_eq!(installments.len(), 3);

    DebtService::set_installment_status(&repo, installments[0].id, PaymentStatus::Paid).unwrap();
    DebtService::set_installment_status(&repo, installments[1].id, PaymentStatus::Paid).unwrap();
    assert_eq!(repo.debt(debt.id).unwrap().unwrap().status, DebtStatus::Active);

    let last =
        DebtService::set_installment_status(&repo, installments[2].id, PaymentStatus::Paid).unwrap();
    assert!(last.debt_status_changed());
    assert_eq!(repo.debt(debt.id).unwrap().unwrap().status, DebtStatus::Finished);

    let reverted = DebtService::toggle_installment(&repo, installments[1].id).unwrap();
    assert_eq!(reverted.installment.status, PaymentStatus::Pending);
    assert_eq!(reverted.debt_status, DebtStatus::Active);
    assert_eq!(repo.debt(debt.id).unwrap().unwrap().status, DebtStatus::Active);
}

#[test]
fn debt_service_rejects_invalid_split_without_storing() {
    let (repo, member) = repo_with_member();
    let err = DebtService::create(&repo, draft(member, dec!(100.00), 0)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidSplit(_)));

    let mut daily = draft(member, dec!(100.00), 2);
    daily.frequency = Frequency::Daily;
    assert!(DebtService::create(&repo, daily).is_err());

    let snapshot = repo.snapshot().unwrap();
    assert!(snapshot.debts.is_empty());
    assert!(snapshot.installments.is_empty());
}

#[test]
fn records_for_unknown_members_are_not_stored() {
    let (repo, _) = repo_with_member();
    let stranger = Uuid::new_v4();

    let err = DebtService::create(&repo, draft(stranger, dec!(90.00), 3)).unwrap_err();
    assert!(matches!(err, CoreError::MemberNotFound(id) if id == stranger));

    let bonus = Revenue::new(stranger, "Bonus", dec!(500.00), date(2024, 3, 1))
        .recurring(Frequency::Monthly);
    let err = TransactionService::add_revenue(&repo, bonus, 3).unwrap_err();
    assert!(matches!(err, CoreError::MemberNotFound(_)));

    let snapshot = repo.snapshot().unwrap();
    assert!(snapshot.debts.is_empty());
    assert!(snapshot.installments.is_empty());
    assert!(snapshot.revenues.is_empty());
}

#[test]
fn debt_records_nominal_installment_value() {
    let (repo, member) = repo_with_member();
    let debt = DebtService::create(&repo, draft(member, dec!(1000.00), 3)).unwrap();
    assert_eq!(debt.installment_value, dec!(333.33));
    DebtService::verify(&repo, debt.id).expect("stored schedule matches");
}

#[test]
fn delete_removes_debt_and_installments() {
    let (repo, member) = repo_with_member();
    let kept = DebtService::create(&repo, draft(member, dec!(50.00), 2)).unwrap();
    let debt = DebtService::create(&repo, draft(member, dec!(120.00), 4)).unwrap();

    assert_eq!(DebtService::delete(&repo, debt.id).unwrap(), 4);
    assert!(repo.debt(debt.id).unwrap().is_none());
    assert!(repo.installments_for_debt(debt.id).unwrap().is_empty());
    assert_eq!(repo.installments_for_debt(kept.id).unwrap().len(), 2);

    let err = DebtService::delete(&repo, debt.id).unwrap_err();
    assert!(matches!(err, CoreError::DebtNotFound(_)));
}

#[test]
fn progress_tracks_paid_installments() {
    let (repo, member) = repo_with_member();
    let debt = DebtService::create(&repo, draft(member, dec!(100.00), 3)).unwrap();
    let first = repo.installments_for_debt(debt.id).unwrap()[0].id;
    DebtService::toggle_installment(&repo, first).unwrap();

    let progress = DebtService::progress(&repo, debt.id).unwrap();
    assert_eq!(progress.paid_installments, 1);
    assert_eq!(progress.paid_value, dec!(33.33));
    assert_eq!(progress.remaining_value, dec!(66.67));
    assert_eq!(progress.next_due, Some(date(2024, 4, 10)));
}

#[test]
fn household_service_validates_names() {
    let repo = MemoryRepository::new();
    let member = HouseholdService::add_member(&repo, "  Maria ").unwrap();
    assert_eq!(member.name, "Maria");
    assert!(HouseholdService::add_member(&repo, " ").is_err());
    HouseholdService::add_category(&repo, "Pets", CategoryKind::Expense).unwrap();

    let snapshot = repo.snapshot().unwrap();
    assert_eq!(snapshot.members.len(), 1);
    assert_eq!(snapshot.categories.len(), 5);
    assert_eq!(
        HouseholdService::member(&repo, member.id).unwrap().name,
        "Maria"
    );
}

#[test]
fn monthly_summary_combines_revenues_expenses_and_installments() {
    let repo = MemoryRepository::new();
    let member = HouseholdService::add_member(&repo, "Joao").unwrap().id;
    let other = HouseholdService::add_member(&repo, "Lia").unwrap().id;

    let salary = Revenue::new(member, "Salary", dec!(3000.00), date(2024, 3, 5))
        .recurring(Frequency::Monthly);
    let revenues = TransactionService::add_revenue(&repo, salary, 12).unwrap();
    TransactionService::toggle_revenue_status(&repo, revenues[0].id).unwrap();

    let rent = Expense::new(member, "Rent", dec!(1200.00), date(2024, 3, 1));
    let rent = TransactionService::add_expense(&repo, rent, 1).unwrap();
    TransactionService::toggle_expense_status(&repo, rent[0].id).unwrap();
    TransactionService::add_expense(
        &repo,
        Expense::new(other, "Gym", dec!(99.00), date(2024, 3, 2)),
        1,
    )
    .unwrap();

    let debt = DebtService::create(&repo, draft(member, dec!(300.00), 3)).unwrap();

    let summary = SummaryService::monthly_for(&repo, member, 2024, 3).unwrap();
    assert_eq!(summary.total_revenue, dec!(3000.00));
    assert_eq!(summary.received_revenue, dec!(3000.00));
    assert_eq!(summary.total_expense, dec!(1300.00));
    assert_eq!(summary.total_paid, dec!(1200.00));
    assert_eq!(summary.final_balance, dec!(1700.00));
    assert_eq!(summary.expenses.len(), 1);
    assert_eq!(summary.installments.len(), 1);

    let kinds: Vec<_> = summary.recent.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![EntryKind::Installment, EntryKind::Revenue, EntryKind::Expense]
    );
    assert_eq!(summary.recent[0].description, format!("{} 1/3", debt.description));

    let april = SummaryService::monthly_for(&repo, member, 2024, 4).unwrap();
    assert_eq!(april.received_revenue, dec!(0));
    assert_eq!(april.total_expense, dec!(100.00));
}

#[test]
fn monthly_summary_rejects_invalid_month() {
    let repo = MemoryRepository::new();
    assert!(SummaryService::monthly_for(&repo, Uuid::new_v4(), 2024, 13).is_err());
}

#[test]
fn recent_list_is_capped() {
    let (repo, member) = repo_with_member();
    let coffee = Expense::new(member, "Coffee", dec!(8.50), date(2024, 5, 1))
        .recurring(Frequency::Daily);
    TransactionService::add_expense(&repo, coffee, 31).unwrap();

    let summary = SummaryService::monthly_for(&repo, member, 2024, 5).unwrap();
    assert_eq!(summary.expenses.len(), 31);
    assert_eq!(summary.recent.len(), crate::RECENT_ENTRIES);
    assert_eq!(summary.recent[0].date, date(2024, 5, 31));
    assert_eq!(summary.total_expense, dec!(263.50));
}
