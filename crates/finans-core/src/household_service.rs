//! Family members and categories.

use uuid::Uuid;

use finans_domain::{Category, CategoryKind, Member};

use crate::{CoreError, CoreResult, FinanceRepository};

pub struct HouseholdService;

impl HouseholdService {
    pub fn add_member(repo: &dyn FinanceRepository, name: &str) -> CoreResult<Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("member name is required".into()));
        }
        let member = Member::new(name);
        repo.add_member(member.clone())?;
        tracing::info!(member_id = %member.id, "added member");
        Ok(member)
    }

    pub fn add_category(
        repo: &dyn FinanceRepository,
        name: &str,
        kind: CategoryKind,
    ) -> CoreResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("category name is required".into()));
        }
        let category = Category::new(name, kind);
        repo.add_category(category.clone())?;
        Ok(category)
    }

    /// Looks up a member, failing when it does not exist.
    pub fn member(repo: &dyn FinanceRepository, id: Uuid) -> CoreResult<Member> {
        repo.snapshot()?
            .member(id)
            .cloned()
            .ok_or(CoreError::MemberNotFound(id))
    }
}
