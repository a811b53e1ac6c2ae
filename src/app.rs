//! Application facade over configuration, storage and services.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use finans_config::{default_base_dir, Config, ConfigManager};
use finans_core::{
    DebtDraft, DebtService, FinanceRepository, HouseholdService, MonthlySummary, SummaryService,
    TransactionService,
};
use finans_domain::{
    Debt, DebtProgress, Expense, Frequency, InstallmentUpdate, Member, Revenue,
};
use finans_storage_json::{JsonRepository, StoragePaths};

use crate::{AppError, AppResult};

/// Coordinates the active configuration, the selected member and the
/// household repository.
pub struct FinansApp {
    base_dir: PathBuf,
    config: Config,
    config_manager: ConfigManager,
    repository: Box<dyn FinanceRepository>,
}

impl FinansApp {
    /// Opens the home resolved from `FINANS_HOME` or the platform data dir.
    pub fn open_default() -> AppResult<Self> {
        Self::open(&default_base_dir())
    }

    /// Opens the configuration under `base` and the JSON household it points at.
    pub fn open(base: &Path) -> AppResult<Self> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let data_dir = config.resolve_data_dir(base);
        let repository = JsonRepository::open(StoragePaths::in_dir(&data_dir))?;
        tracing::info!(
            base = %base.display(),
            data = %data_dir.display(),
            "opened finans home"
        );
        Ok(Self::with_repository(
            base.to_path_buf(),
            config_manager,
            config,
            Box::new(repository),
        ))
    }

    pub fn with_repository(
        base_dir: PathBuf,
        config_manager: ConfigManager,
        config: Config,
        repository: Box<dyn FinanceRepository>,
    ) -> Self {
        Self {
            base_dir,
            config,
            config_manager,
            repository,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &dyn FinanceRepository {
        self.repository.as_ref()
    }

    /// Applies `change` to a copy of the configuration and saves it; the
    /// active configuration only changes once the save succeeded.
    pub fn update_config(&mut self, change: impl FnOnce(&mut Config)) -> AppResult<()> {
        let mut next = self.config.clone();
        change(&mut next);
        self.config_manager.save(&next)?;
        self.config = next;
        Ok(())
    }

    /// Adds a member, selecting it when no member is selected yet.
    pub fn add_member(&mut self, name: &str) -> AppResult<Member> {
        let member = HouseholdService::add_member(self.repository(), name)?;
        if self.config.last_member_id.is_none() {
            let id = member.id;
            self.update_config(|cfg| cfg.last_member_id = Some(id))?;
        }
        Ok(member)
    }

    pub fn select_member(&mut self, member_id: Uuid) -> AppResult<Member> {
        let member = HouseholdService::member(self.repository(), member_id)?;
        self.update_config(|cfg| cfg.last_member_id = Some(member_id))?;
        tracing::info!(%member_id, "selected member");
        Ok(member)
    }

    pub fn current_member(&self) -> AppResult<Member> {
        let id = self
            .config
            .last_member_id
            .ok_or(AppError::NoMemberSelected)?;
        Ok(HouseholdService::member(self.repository(), id)?)
    }

    /// Stores a revenue, expanding recurring templates by the configured
    /// number of repetitions.
    pub fn add_revenue(&self, mut template: Revenue) -> AppResult<Vec<Revenue>> {
        let repetitions = self.prepare_recurrence(template.is_recurrent, &mut template.frequency);
        Ok(TransactionService::add_revenue(
            self.repository(),
            template,
            repetitions,
        )?)
    }

    pub fn add_expense(&self, mut template: Expense) -> AppResult<Vec<Expense>> {
        let repetitions = self.prepare_recurrence(template.is_recurrent, &mut template.frequency);
        Ok(TransactionService::add_expense(
            self.repository(),
            template,
            repetitions,
        )?)
    }

    pub fn create_debt(&self, draft: DebtDraft) -> AppResult<Debt> {
        Ok(DebtService::create(self.repository(), draft)?)
    }

    pub fn toggle_installment(&self, installment_id: Uuid) -> AppResult<InstallmentUpdate> {
        Ok(DebtService::toggle_installment(
            self.repository(),
            installment_id,
        )?)
    }

    pub fn debt_progress(&self, debt_id: Uuid) -> AppResult<DebtProgress> {
        Ok(DebtService::progress(self.repository(), debt_id)?)
    }

    pub fn delete_debt(&self, debt_id: Uuid) -> AppResult<usize> {
        Ok(DebtService::delete(self.repository(), debt_id)?)
    }

    /// Monthly summary for the selected member.
    pub fn monthly_summary(&self, year: i32, month: u32) -> AppResult<MonthlySummary> {
        let member = self.current_member()?;
        Ok(SummaryService::monthly_for(
            self.repository(),
            member.id,
            year,
            month,
        )?)
    }

    fn prepare_recurrence(
        &self,
        is_recurrent: bool,
        frequency: &mut Option<Frequency>,
    ) -> u32 {
        if !is_recurrent {
            return 1;
        }
        frequency.get_or_insert(self.config.default_recurrence_frequency);
        self.config.default_repetitions
    }
}
