// ============================================
// Template Catalog
// ============================================
//
// Immutable list of menu templates, loaded once at startup and shared
// read-only by every request. Validation happens here so the engine can
// trust ids and budgets without re-checking them per call.

use crate::models::Template;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no templates")]
    Empty,

    #[error("Template id must be positive")]
    ZeroId,

    #[error("Duplicate template id: {0}")]
    DuplicateId(u64),

    #[error("Template {id} has invalid budget_level {budget_level}")]
    InvalidBudget { id: u64, budget_level: f64 },
}

/// Accepts both `[...]` and `{"templates": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { templates: Vec<Template> },
    Bare(Vec<Template>),
}

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Arc<Template>>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen: HashSet<u64> = HashSet::with_capacity(templates.len());
        for template in &templates {
            if template.id == 0 {
                return Err(CatalogError::ZeroId);
            }
            if !seen.insert(template.id) {
                return Err(CatalogError::DuplicateId(template.id));
            }
            if !template.budget_level.is_finite() || template.budget_level <= 0.0 {
                return Err(CatalogError::InvalidBudget {
                    id: template.id,
                    budget_level: template.budget_level,
                });
            }
        }

        Ok(Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let templates = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Wrapped { templates } => templates,
            CatalogDocument::Bare(templates) => templates,
        };
        Self::new(templates)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            templates = catalog.len(),
            "Loaded template catalog"
        );
        Ok(catalog)
    }

    pub fn templates(&self) -> &[Arc<Template>] {
        &self.templates
    }

    pub fn get(&self, id: u64) -> Option<&Arc<Template>> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
