//! "Show me different ones" interactions.
//!
//! Both operations rerun the composer's algorithms with the ids currently on
//! screen excluded, so a refresh never hands back something the user is
//! already looking at.

use crate::models::{Category, Constraints, PlanResult, Template};
use crate::services::composer::PlanComposer;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

impl<R: Rng> PlanComposer<R> {
    /// Replaces the plan for a single category. Other categories and their
    /// histories are left alone.
    pub fn refresh_category(
        &mut self,
        constraints: &Constraints,
        category: Category,
        current_ids: &[u64],
    ) -> Option<PlanResult> {
        let used_ids: HashSet<u64> = current_ids.iter().copied().collect();
        let plan = self.plan_for_category(&constraints.effective(), category, &used_ids);

        info!(
            category = %category,
            excluded = used_ids.len(),
            template_id = plan.as_ref().map(|p| p.template.id),
            "Refreshed category plan"
        );
        plan
    }

    /// Draws a new supplementary list, skipping `current_ids` and everything
    /// recently shown in any category.
    pub fn refresh_supplementary(
        &mut self,
        constraints: &Constraints,
        current_ids: &[u64],
    ) -> Vec<Arc<Template>> {
        let mut exclude: HashSet<u64> = current_ids.iter().copied().collect();
        exclude.extend(self.all_recent_ids());

        let list = self.supplementary_for(&constraints.effective(), &exclude);
        info!(
            excluded = exclude.len(),
            returned = list.len(),
            "Refreshed supplementary list"
        );
        list
    }
}
