//! Lunch plan CLI
//!
//! Usage:
//! ```bash
//! # Three plans plus a supplementary list
//! lunch-plan-service generate --scene takeout --taste all --budget 20
//!
//! # Swap the light plan for a different one
//! lunch-plan-service refresh-category light --scene dinein --taste bland --budget 25 --current 3,17,42
//!
//! # New supplementary list
//! lunch-plan-service refresh-more --scene takeout --taste spicy --budget 30 --current 1,2,3
//!
//! # Forget recently shown templates
//! lunch-plan-service clear-recency
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lunch_plan_service::{
    dine_in_keywords, Category, Config, Constraints, PlanEngine, Preference, Scene, Taste,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "lunch-plan-service",
    about = "Lunch plan recommendations from a template catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Catalog path override
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed for reproducible picks
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one plan per category plus a supplementary list
    Generate {
        #[command(flatten)]
        constraints: ConstraintArgs,
    },

    /// Replace the plan for a single category
    RefreshCategory {
        category: Category,

        #[command(flatten)]
        constraints: ConstraintArgs,

        /// Template ids currently shown
        #[arg(long, value_delimiter = ',')]
        current: Vec<u64>,
    },

    /// Draw a new supplementary list
    RefreshMore {
        #[command(flatten)]
        constraints: ConstraintArgs,

        /// Template ids currently shown
        #[arg(long, value_delimiter = ',')]
        current: Vec<u64>,
    },

    /// Reset recency history for every category
    ClearRecency,
}

#[derive(Args)]
struct ConstraintArgs {
    #[arg(long)]
    scene: Scene,

    #[arg(long, default_value = "all")]
    taste: Taste,

    #[arg(long)]
    budget: f64,

    #[arg(long, default_value = "normal")]
    preference: Preference,
}

impl ConstraintArgs {
    fn to_constraints(&self) -> Result<Constraints> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            anyhow::bail!("budget must be a positive number, got {}", self.budget);
        }
        Ok(Constraints::new(self.scene, self.taste, self.budget, self.preference))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries the JSON result, logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load config")?;
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("request", request_id = %request_id);
    let _guard = span.enter();

    let mut engine = PlanEngine::from_config(&config).with_context(|| {
        format!("Failed to initialise engine from {}", config.catalog_path.display())
    })?;

    let output = match cli.command {
        Command::Generate { constraints } => {
            let constraints = constraints.to_constraints()?;
            let result = engine.generate_plans(&constraints);
            let keywords = match constraints.scene {
                Scene::Dinein => dine_in_keywords(&result.plans),
                Scene::Takeout => Vec::new(),
            };
            json!({
                "plans": result.plans,
                "supplementary": result.supplementary,
                "keywords": keywords,
            })
        }
        Command::RefreshCategory {
            category,
            constraints,
            current,
        } => {
            let constraints = constraints.to_constraints()?;
            json!({ "plan": engine.refresh_category(&constraints, category, &current) })
        }
        Command::RefreshMore {
            constraints,
            current,
        } => {
            let constraints = constraints.to_constraints()?;
            json!({ "supplementary": engine.refresh_supplementary(&constraints, &current) })
        }
        Command::ClearRecency => {
            engine.clear_recency();
            json!({ "cleared": Category::ALL })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Done");
    Ok(())
}
