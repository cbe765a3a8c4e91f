use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Budget floor applied when the user asks to indulge.
pub const INDULGE_BUDGET_FLOOR: f64 = 35.0;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Recommendation bucket. Each one has its own display identity and budget tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cheap, // 省钱
    Light, // 清爽
    Easy,  // 省事
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Cheap, Category::Light, Category::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cheap => "cheap",
            Category::Light => "light",
            Category::Easy => "easy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Cheap => "省钱方案",
            Category::Light => "清爽方案",
            Category::Easy => "省事方案",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Cheap => "预算内最稳",
            Category::Light => "少油少酱少负担",
            Category::Easy => "闭眼点，省脑",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cheap" => Ok(Category::Cheap),
            "light" => Ok(Category::Light),
            "easy" => Ok(Category::Easy),
            other => Err(ParseEnumError::new("category", other)),
        }
    }
}

/// Dining context requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    Takeout,
    Dinein,
}

impl Scene {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scene::Takeout => "takeout",
            Scene::Dinein => "dinein",
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scene {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "takeout" => Ok(Scene::Takeout),
            "dinein" => Ok(Scene::Dinein),
            other => Err(ParseEnumError::new("scene", other)),
        }
    }
}

/// Scene a template is suitable for. `Both` matches either request scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneTag {
    Takeout,
    Dinein,
    Both,
}

impl SceneTag {
    pub fn matches(&self, scene: Scene) -> bool {
        match self {
            SceneTag::Both => true,
            SceneTag::Takeout => scene == Scene::Takeout,
            SceneTag::Dinein => scene == Scene::Dinein,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taste {
    All,
    Bland,
    Salty,
    MildSpicy,
    Spicy,
}

impl Taste {
    pub fn as_str(&self) -> &'static str {
        match self {
            Taste::All => "all",
            Taste::Bland => "bland",
            Taste::Salty => "salty",
            Taste::MildSpicy => "mild_spicy",
            Taste::Spicy => "spicy",
        }
    }

    /// `All` on either side is a wildcard.
    pub fn accepts(&self, template_taste: Taste) -> bool {
        *self == Taste::All || template_taste == Taste::All || *self == template_taste
    }
}

impl fmt::Display for Taste {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Taste {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Taste::All),
            "bland" => Ok(Taste::Bland),
            "salty" => Ok(Taste::Salty),
            "mild_spicy" => Ok(Taste::MildSpicy),
            "spicy" => Ok(Taste::Spicy),
            other => Err(ParseEnumError::new("taste", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Normal,
    Light,
    Easy,
    Indulge,
}

impl Preference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Normal => "normal",
            Preference::Light => "light",
            Preference::Easy => "easy",
            Preference::Indulge => "indulge",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Preference::Normal),
            "light" => Ok(Preference::Light),
            "easy" => Ok(Preference::Easy),
            "indulge" => Ok(Preference::Indulge),
            other => Err(ParseEnumError::new("preference", other)),
        }
    }
}

/// Menu template from the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub scene: SceneTag,
    #[serde(alias = "mode")]
    pub category: Category,
    pub taste: Taste,
    pub budget_level: f64,
    pub title: String,
    #[serde(default)]
    pub search_keywords: String,
    #[serde(default)]
    pub remark_phrases: Vec<String>,
    #[serde(default)]
    pub price_range_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub avoid_tips: String,
}

/// Caller input for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub scene: Scene,
    pub taste: Taste,
    pub budget: f64,
    #[serde(default)]
    pub preference: Preference,
}

impl Constraints {
    pub fn new(scene: Scene, taste: Taste, budget: f64, preference: Preference) -> Self {
        Self {
            scene,
            taste,
            budget,
            preference,
        }
    }

    /// Budget ceiling actually used for filtering.
    pub fn effective_budget(&self) -> f64 {
        match self.preference {
            Preference::Indulge => self.budget.max(INDULGE_BUDGET_FLOOR),
            _ => self.budget,
        }
    }

    /// Copy of these constraints with the indulge floor already applied.
    pub fn effective(&self) -> Self {
        Self {
            budget: self.effective_budget(),
            ..*self
        }
    }
}

/// Which rung of the fallback ladder produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Full match, recently shown templates excluded
    Preferred,
    /// Full match, recency ignored
    RelaxedRecency,
    /// Category (and budget for cheap) only
    RelaxedMatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub template: Arc<Template>,
    pub remark_text: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateResult {
    pub plans: Vec<PlanResult>,
    pub supplementary: Vec<Arc<Template>>,
}

impl GenerateResult {
    pub fn plan_ids(&self) -> Vec<u64> {
        self.plans.iter().map(|p| p.template.id).collect()
    }

    pub fn plan_for(&self, category: Category) -> Option<&PlanResult> {
        self.plans.iter().find(|p| p.category == category)
    }
}
