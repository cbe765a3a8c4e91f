// ============================================
// Plan Composer (午餐方案生成)
// ============================================
//
// Builds one plan per category plus a supplementary list.
//
// Per-category fallback ladder:
// 1. Preferred: full match, excluding used ids and recently shown ids
// 2. RelaxedRecency: full match, excluding used ids only
// 3. RelaxedMatch: category only (plus raw budget for cheap)
//
// The first non-empty tier wins. A category with no candidate at any tier
// is omitted from the result.

use crate::catalog::TemplateCatalog;
use crate::models::{
    Category, Constraints, GenerateResult, MatchTier, PlanResult, Preference, Template,
};
use crate::services::filter::{self, SUPPLEMENTARY_TOLERANCE};
use crate::services::recency::RecencyStore;
use crate::services::remark::compose_remark;
use crate::services::selector::Selector;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default size of the supplementary list.
pub const SUPPLEMENTARY_LIMIT: usize = 10;

/// Category evaluation order for a preference.
pub fn category_order(preference: Preference) -> [Category; 3] {
    match preference {
        Preference::Light => [Category::Light, Category::Cheap, Category::Easy],
        Preference::Easy => [Category::Easy, Category::Cheap, Category::Light],
        Preference::Normal | Preference::Indulge => Category::ALL,
    }
}

pub struct PlanComposer<R: Rng = StdRng> {
    catalog: Arc<TemplateCatalog>,
    recency: Arc<dyn RecencyStore>,
    selector: Selector<R>,
    supplementary_limit: usize,
}

impl<R: Rng> PlanComposer<R> {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        recency: Arc<dyn RecencyStore>,
        selector: Selector<R>,
    ) -> Self {
        Self {
            catalog,
            recency,
            selector,
            supplementary_limit: SUPPLEMENTARY_LIMIT,
        }
    }

    pub fn with_supplementary_limit(mut self, limit: usize) -> Self {
        self.supplementary_limit = limit;
        self
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn recency(&self) -> &dyn RecencyStore {
        self.recency.as_ref()
    }

    /// Generates the full recommendation set for one request.
    pub fn generate(&mut self, constraints: &Constraints) -> GenerateResult {
        let effective = constraints.effective();
        let order = category_order(constraints.preference);

        let mut used_ids: HashSet<u64> = HashSet::new();
        let mut plans: Vec<PlanResult> = Vec::with_capacity(order.len());

        for category in order {
            match self.plan_for_category(&effective, category, &used_ids) {
                Some(plan) => {
                    used_ids.insert(plan.template.id);
                    plans.push(plan);
                }
                None => {
                    warn!(
                        category = %category,
                        scene = %effective.scene,
                        budget = effective.budget,
                        "No template available for category, omitting plan"
                    );
                }
            }
        }

        let mut exclude = used_ids;
        exclude.extend(self.all_recent_ids());
        let supplementary = self.supplementary_for(&effective, &exclude);

        info!(
            scene = %effective.scene,
            taste = %effective.taste,
            budget = effective.budget,
            preference = %constraints.preference,
            plans = plans.len(),
            supplementary = supplementary.len(),
            "Generated lunch plans"
        );

        GenerateResult {
            plans,
            supplementary,
        }
    }

    /// Runs the fallback ladder for one category and records the pick.
    ///
    /// `constraints` must already carry the effective budget.
    pub(crate) fn plan_for_category(
        &mut self,
        constraints: &Constraints,
        category: Category,
        used_ids: &HashSet<u64>,
    ) -> Option<PlanResult> {
        let (tier, candidates) = self.candidates_for(constraints, category, used_ids)?;

        let template = self.selector.pick_one(&candidates).cloned()?;
        self.recency.add(category, template.id);

        let remark_text = compose_remark(&mut self.selector, &template.remark_phrases);

        debug!(
            category = %category,
            template_id = template.id,
            tier = ?tier,
            candidates = candidates.len(),
            "Picked template"
        );

        Some(PlanResult {
            category,
            name: category.display_name(),
            description: category.description(),
            template,
            remark_text,
            tier,
        })
    }

    /// First non-empty tier for `category`, or `None` when every tier is empty.
    fn candidates_for(
        &self,
        constraints: &Constraints,
        category: Category,
        used_ids: &HashSet<u64>,
    ) -> Option<(MatchTier, Vec<Arc<Template>>)> {
        let templates = self.catalog.templates();
        let tolerance = filter::tolerance_for(Some(category));

        let mut exclude = used_ids.clone();
        exclude.extend(self.recency.get(category));
        let preferred =
            filter::filter_templates(templates, constraints, Some(category), &exclude, tolerance);
        if !preferred.is_empty() {
            return Some((MatchTier::Preferred, preferred));
        }

        debug!(category = %category, "Relaxing recency exclusion");
        let relaxed =
            filter::filter_templates(templates, constraints, Some(category), used_ids, tolerance);
        if !relaxed.is_empty() {
            return Some((MatchTier::RelaxedRecency, relaxed));
        }

        debug!(category = %category, "Relaxing scene and taste");
        let fallback = filter::filter_relaxed(templates, constraints, category, used_ids);
        if !fallback.is_empty() {
            return Some((MatchTier::RelaxedMatch, fallback));
        }

        None
    }

    /// Up to `supplementary_limit` templates of any category, none in `exclude`.
    pub(crate) fn supplementary_for(
        &mut self,
        constraints: &Constraints,
        exclude: &HashSet<u64>,
    ) -> Vec<Arc<Template>> {
        let candidates = filter::filter_templates(
            self.catalog.templates(),
            constraints,
            None,
            exclude,
            SUPPLEMENTARY_TOLERANCE,
        );
        self.selector
            .pick_many(&candidates, self.supplementary_limit)
    }

    /// Union of every category's recency record.
    pub(crate) fn all_recent_ids(&self) -> HashSet<u64> {
        Category::ALL
            .iter()
            .flat_map(|&category| self.recency.get(category))
            .collect()
    }

    /// Resets all three category histories.
    pub fn clear_recency(&self) {
        for category in Category::ALL {
            self.recency.clear(category);
        }
        info!("Cleared recency history");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Scene, SceneTag, Taste};
    use crate::services::recency::{InMemoryRecencyStore, MockRecencyStore};
    use mockall::predicate::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn template(id: u64, scene: SceneTag, category: Category, taste: Taste, budget: f64) -> Template {
        Template {
            id,
            scene,
            category,
            taste,
            budget_level: budget,
            title: format!("菜品{}", id),
            search_keywords: String::new(),
            remark_phrases: vec!["少油".into(), "少盐".into(), "不要葱".into()],
            price_range_text: String::new(),
            tags: vec!["测试".into()],
            avoid_tips: String::new(),
        }
    }

    fn catalog(templates: Vec<Template>) -> Arc<TemplateCatalog> {
        Arc::new(TemplateCatalog::new(templates).unwrap())
    }

    fn composer(
        catalog: Arc<TemplateCatalog>,
        recency: Arc<dyn RecencyStore>,
        seed: u64,
    ) -> PlanComposer<ChaCha8Rng> {
        PlanComposer::new(catalog, recency, Selector::new(ChaCha8Rng::seed_from_u64(seed)))
    }

    fn normal(budget: f64) -> Constraints {
        Constraints::new(Scene::Takeout, Taste::All, budget, Preference::Normal)
    }

    #[test]
    fn test_category_order() {
        assert_eq!(
            category_order(Preference::Normal),
            [Category::Cheap, Category::Light, Category::Easy]
        );
        assert_eq!(
            category_order(Preference::Light),
            [Category::Light, Category::Cheap, Category::Easy]
        );
        assert_eq!(
            category_order(Preference::Easy),
            [Category::Easy, Category::Cheap, Category::Light]
        );
        assert_eq!(category_order(Preference::Indulge), Category::ALL);
    }

    #[test]
    fn test_tier_one_skips_recent_ids() {
        let catalog = catalog(vec![
            template(1, SceneTag::Both, Category::Cheap, Taste::All, 10.0),
            template(2, SceneTag::Both, Category::Cheap, Taste::All, 10.0),
        ]);
        let recency = Arc::new(InMemoryRecencyStore::new());
        recency.add(Category::Cheap, 1);

        let mut composer = composer(catalog, recency.clone(), 5);
        let plan = composer
            .plan_for_category(&normal(20.0), Category::Cheap, &HashSet::new())
            .unwrap();

        assert_eq!(plan.template.id, 2);
        assert_eq!(plan.tier, MatchTier::Preferred);
        assert_eq!(recency.get(Category::Cheap), vec![2, 1]);
    }

    #[test]
    fn test_tier_two_relaxes_recency() {
        let catalog = catalog(vec![template(1, SceneTag::Both, Category::Light, Taste::All, 10.0)]);
        let recency = Arc::new(InMemoryRecencyStore::new());
        recency.add(Category::Light, 1);

        let mut composer = composer(catalog, recency, 5);
        let plan = composer
            .plan_for_category(&normal(20.0), Category::Light, &HashSet::new())
            .unwrap();

        assert_eq!(plan.template.id, 1);
        assert_eq!(plan.tier, MatchTier::RelaxedRecency);
    }

    #[test]
    fn test_tier_three_ignores_scene_taste_and_budget_for_non_cheap() {
        let catalog = catalog(vec![
            template(1, SceneTag::Dinein, Category::Easy, Taste::Spicy, 90.0),
            template(2, SceneTag::Dinein, Category::Cheap, Taste::Spicy, 90.0),
        ]);
        let recency: Arc<dyn RecencyStore> = Arc::new(InMemoryRecencyStore::new());
        let mut composer = composer(catalog, recency, 5);
        let c = Constraints::new(Scene::Takeout, Taste::Bland, 20.0, Preference::Normal);

        let easy = composer
            .plan_for_category(&c, Category::Easy, &HashSet::new())
            .unwrap();
        assert_eq!(easy.template.id, 1);
        assert_eq!(easy.tier, MatchTier::RelaxedMatch);

        // cheap keeps its raw budget ceiling even at the last tier
        assert!(composer
            .plan_for_category(&c, Category::Cheap, &HashSet::new())
            .is_none());
    }

    #[test]
    fn test_used_ids_are_never_reused() {
        let catalog = catalog(vec![template(1, SceneTag::Both, Category::Easy, Taste::All, 10.0)]);
        let recency: Arc<dyn RecencyStore> = Arc::new(InMemoryRecencyStore::new());
        let mut composer = composer(catalog, recency, 5);
        let used: HashSet<u64> = [1].into_iter().collect();

        assert!(composer
            .plan_for_category(&normal(20.0), Category::Easy, &used)
            .is_none());
    }

    #[test]
    fn test_generate_registers_each_pick_once() {
        let catalog = catalog(vec![
            template(1, SceneTag::Both, Category::Cheap, Taste::All, 10.0),
            template(2, SceneTag::Both, Category::Light, Taste::All, 10.0),
            template(3, SceneTag::Both, Category::Easy, Taste::All, 10.0),
            template(4, SceneTag::Both, Category::Easy, Taste::All, 10.0),
        ]);

        let mut mock = MockRecencyStore::new();
        mock.expect_get().returning(|_| Vec::new());
        mock.expect_add()
            .with(eq(Category::Cheap), eq(1))
            .times(1)
            .return_const(());
        mock.expect_add()
            .with(eq(Category::Light), eq(2))
            .times(1)
            .return_const(());
        mock.expect_add()
            .with(eq(Category::Easy), function(|id: &u64| *id == 3 || *id == 4))
            .times(1)
            .return_const(());

        let mut composer = composer(catalog, Arc::new(mock), 11);
        let result = composer.generate(&normal(20.0));

        assert_eq!(result.plans.len(), 3);
        let supplementary: Vec<u64> = result.supplementary.iter().map(|t| t.id).collect();
        assert_eq!(supplementary.len(), 1);
        assert!(!result.plan_ids().contains(&supplementary[0]));
    }

    #[test]
    fn test_supplementary_excludes_recent_of_all_categories() {
        let mut templates = Vec::new();
        for id in 1..=20 {
            let category = Category::ALL[(id % 3) as usize];
            templates.push(template(id, SceneTag::Both, category, Taste::All, 10.0));
        }
        let recency = Arc::new(InMemoryRecencyStore::new());
        recency.add(Category::Easy, 7);
        recency.add(Category::Light, 8);

        let mut composer = composer(catalog(templates), recency.clone(), 3);
        let result = composer.generate(&normal(20.0));

        assert_eq!(result.supplementary.len(), SUPPLEMENTARY_LIMIT);
        let recent = composer.all_recent_ids();
        for t in &result.supplementary {
            assert!(!recent.contains(&t.id), "template {} was shown recently", t.id);
            assert!(!result.plan_ids().contains(&t.id));
        }
    }

    #[test]
    fn test_custom_supplementary_limit() {
        let templates = (1..=12)
            .map(|id| template(id, SceneTag::Both, Category::Cheap, Taste::All, 10.0))
            .collect();
        let recency: Arc<dyn RecencyStore> = Arc::new(InMemoryRecencyStore::new());
        let mut composer = composer(catalog(templates), recency, 1).with_supplementary_limit(4);

        let result = composer.generate(&normal(20.0));
        assert_eq!(result.plans.len(), 1);
        assert_eq!(result.supplementary.len(), 4);
    }

    #[test]
    fn test_clear_recency_clears_every_category() {
        let mut mock = MockRecencyStore::new();
        for category in Category::ALL {
            mock.expect_clear()
                .with(eq(category))
                .times(1)
                .return_const(());
        }
        let catalog = catalog(vec![template(1, SceneTag::Both, Category::Cheap, Taste::All, 10.0)]);
        composer(catalog, Arc::new(mock), 0).clear_recency();
    }
}
