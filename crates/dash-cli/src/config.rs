//! TOML configuration for the `dashboard` command.
//!
//! ```toml
//! [data]
//! state_indicators = "data/state_indicators.csv"
//! household_income = "data/household_income.csv"
//! age_income = "data/age_income.csv"
//! unemployment = "data/unemployment.csv"
//! employment = "data/employment.csv"
//! gsp = "data/gsp.csv"
//! geojson = "data/us-states.json"
//!
//! [animation]
//! interval_ms = 500
//! step = 1
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use dash_core::{AnimationConfig, SectionId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data: DataPaths,
    pub animation: AnimationSettings,
}

/// One CSV per section; a section without a path is reported as failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataPaths {
    pub state_indicators: Option<PathBuf>,
    pub household_income: Option<PathBuf>,
    pub age_income: Option<PathBuf>,
    pub unemployment: Option<PathBuf>,
    pub employment: Option<PathBuf>,
    pub gsp: Option<PathBuf>,
    /// US states feature collection shared by both maps.
    pub geojson: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationSettings {
    pub interval_ms: u64,
    pub step: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            step: 1.0,
        }
    }
}

impl DashboardConfig {
    /// Reads and validates the config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.data.resolve_against(base);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.animation.step.is_finite() && self.animation.step > 0.0) {
            bail!(
                "animation.step must be a positive number, got {}",
                self.animation.step
            );
        }
        if self.animation.interval_ms == 0 {
            bail!("animation.interval_ms must be at least 1");
        }
        Ok(())
    }

    pub fn animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            interval: Duration::from_millis(self.animation.interval_ms),
            step: self.animation.step,
        }
    }

    pub fn csv_path(&self, section: SectionId) -> Option<&Path> {
        let path = match section {
            SectionId::Indicators => &self.data.state_indicators,
            SectionId::Household => &self.data.household_income,
            SectionId::Age => &self.data.age_income,
            SectionId::Unemployment => &self.data.unemployment,
            SectionId::Employment => &self.data.employment,
            SectionId::Gsp => &self.data.gsp,
        };
        path.as_deref()
    }

    pub fn geojson_path(&self) -> Option<&Path> {
        self.data.geojson.as_deref()
    }
}

impl DataPaths {
    fn resolve_against(&mut self, base: &Path) {
        for path in [
            &mut self.state_indicators,
            &mut self.household_income,
            &mut self.age_income,
            &mut self.unemployment,
            &mut self.employment,
            &mut self.gsp,
            &mut self.geojson,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
