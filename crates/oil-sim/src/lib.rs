#![deny(warnings)]

//! Metric simulation for the essential-oil pharmacopoeia.
//!
//! This crate turns an oil profile into a year-by-year table:
//! - Piecewise-linear growth regimes per metric ([`regime`])
//! - Baselines derived from the profile ([`model`])
//! - Injectable multiplicative noise ([`noise`])
//! - Narrative trend bands applied as a pure per-row pass ([`overlay`])

pub mod model;
pub mod noise;
pub mod overlay;
pub mod regime;

use noise::{GaussianNoise, NoiseSource};
use oil_core::{
    validate_config, validate_profile, Oil, OilProfile, SeriesTable, SimConfig, ValidationError,
    YearRow,
};
use thiserror::Error;
use tracing::{debug, info};

pub use model::{all_models, model_for, Baseline, MetricModel};
pub use overlay::{overlay, TrendBand};

/// Errors produced while building a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// Configuration or profile failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Generates metric tables for one oil profile over a fixed year range.
#[derive(Clone, Debug)]
pub struct MetricSimulator {
    profile: OilProfile,
    config: SimConfig,
    models: Vec<MetricModel>,
}

impl MetricSimulator {
    pub fn new(profile: OilProfile, config: SimConfig) -> Result<Self, SimError> {
        validate_config(&config)?;
        validate_profile(&profile)?;
        Ok(Self {
            profile,
            config,
            models: all_models(),
        })
    }

    pub fn profile(&self) -> &OilProfile {
        &self.profile
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Raw per-metric series, before trend bands are applied.
    ///
    /// Noise is drawn metric by metric, each metric year by year.
    pub fn generate_raw(&self, noise: &mut dyn NoiseSource) -> Result<SeriesTable, SimError> {
        let mut rows: Vec<YearRow> = self.config.years().map(YearRow::empty).collect();
        for model in &self.models {
            debug!(metric = model.metric.column_name(), "generating series");
            for (index, row) in rows.iter_mut().enumerate() {
                let value = model.sample(&self.profile, index, row.year, noise);
                row.set(model.metric, value);
            }
        }
        Ok(SeriesTable::new(rows)?)
    }

    /// Finished table: raw series with every row passed through [`overlay`].
    pub fn generate(&self, noise: &mut dyn NoiseSource) -> Result<SeriesTable, SimError> {
        let table = self.generate_raw(noise)?.map_rows(overlay);
        info!(
            rows = table.len(),
            start = self.config.start_year,
            end = self.config.end_year,
            "table generated"
        );
        Ok(table)
    }

    /// Generates with Gaussian noise, seeded from the configuration if set.
    pub fn run(&self) -> Result<SeriesTable, SimError> {
        let mut noise = GaussianNoise::from_seed_option(self.config.seed);
        self.generate(&mut noise)
    }
}

/// Convenience wrapper: simulate `oil` under `config` with default noise.
pub fn simulate(oil: &Oil, config: &SimConfig) -> Result<SeriesTable, SimError> {
    info!(oil = %oil.name, default_profile = oil.uses_default_profile, "simulating");
    MetricSimulator::new(oil.profile.clone(), config.clone())?.run()
}
