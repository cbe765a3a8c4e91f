pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;

pub use catalog::TemplateCatalog;
pub use config::Config;
pub use engine::PlanEngine;
pub use error::{AppError, Result};
pub use models::{
    Category, Constraints, GenerateResult, MatchTier, PlanResult, Preference, Scene, Taste,
    Template,
};
pub use services::{dine_in_keywords, InMemoryRecencyStore, RecencyStore, RedisRecencyStore, Selector};
