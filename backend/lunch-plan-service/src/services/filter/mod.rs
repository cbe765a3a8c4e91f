use crate::models::{Category, Constraints, Template};
use std::collections::HashSet;
use std::sync::Arc;

/// Budget tolerance for the supplementary list.
pub const SUPPLEMENTARY_TOLERANCE: f64 = 1.3;

/// Budget multiplier for a target category. `None` is the supplementary list.
pub fn tolerance_for(category: Option<Category>) -> f64 {
    match category {
        Some(Category::Cheap) => 1.0,
        Some(Category::Light) | Some(Category::Easy) => 1.2,
        None => SUPPLEMENTARY_TOLERANCE,
    }
}

/// Full match rule: scene, category, taste, budget and exclusion.
///
/// `constraints.budget` is used as-is; callers pass effective constraints.
pub fn matches(
    template: &Template,
    constraints: &Constraints,
    category: Option<Category>,
    exclude: &HashSet<u64>,
    tolerance: f64,
) -> bool {
    if exclude.contains(&template.id) {
        return false;
    }

    if !template.scene.matches(constraints.scene) {
        return false;
    }

    if let Some(category) = category {
        if template.category != category {
            return false;
        }
    }

    if !constraints.taste.accepts(template.taste) {
        return false;
    }

    template.budget_level <= constraints.budget * tolerance
}

/// Returns the templates passing [`matches`], in catalog order.
pub fn filter_templates(
    templates: &[Arc<Template>],
    constraints: &Constraints,
    category: Option<Category>,
    exclude: &HashSet<u64>,
    tolerance: f64,
) -> Vec<Arc<Template>> {
    templates
        .iter()
        .filter(|t| matches(t, constraints, category, exclude, tolerance))
        .cloned()
        .collect()
}

/// Last-resort rule: category only, plus the raw budget ceiling for cheap.
/// Scene and taste are ignored, and non-cheap categories ignore budget.
pub fn relaxed_matches(
    template: &Template,
    constraints: &Constraints,
    category: Category,
    exclude: &HashSet<u64>,
) -> bool {
    if exclude.contains(&template.id) || template.category != category {
        return false;
    }

    category != Category::Cheap || template.budget_level <= constraints.budget
}

pub fn filter_relaxed(
    templates: &[Arc<Template>],
    constraints: &Constraints,
    category: Category,
    exclude: &HashSet<u64>,
) -> Vec<Arc<Template>> {
    templates
        .iter()
        .filter(|t| relaxed_matches(t, constraints, category, exclude))
        .cloned()
        .collect()
}
