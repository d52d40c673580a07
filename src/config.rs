//! Immutable configuration for the detector reduction and the cycle controller.
//!
//! All values have defaults matching the reference YOLOv3/COCO setup, so an
//! empty TOML document is a valid configuration:
//!
//! ```toml
//! [detector]
//! conf_threshold = 0.5
//! nms_threshold = 0.4
//! target_class_id = 32   # "sports ball" in coco.names
//! selection = "prefer_last_iterated"
//!
//! [cycle]
//! cycle_length = 10
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tracker::TemplateTrackerConfig;

/// COCO class index of "sports ball".
pub const SPORTS_BALL_CLASS_ID: usize = 32;

/// How to pick the target when several target-class boxes survive NMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// The last target-class box in suppression output order wins.
    ///
    /// Suppression output is ordered by descending confidence, so this picks
    /// the *least* confident surviving match. Fine for scenes with a single
    /// instance of the class.
    #[default]
    PreferLastIterated,
    /// The most confident surviving target-class box wins.
    PreferHighestConfidence,
}

/// Thresholds and network geometry used by the detection reducer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Validated but not applied: rows are filtered on class score alone.
    pub objectness_threshold: f32,
    pub conf_threshold: f32,
    pub nms_threshold: f32,
    /// Width of the network input blob.
    pub inp_width: u32,
    /// Height of the network input blob.
    pub inp_height: u32,
    pub target_class_id: usize,
    pub selection: SelectionPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            objectness_threshold: 0.5,
            conf_threshold: 0.5,
            nms_threshold: 0.4,
            inp_width: 416,
            inp_height: 416,
            target_class_id: SPORTS_BALL_CLASS_ID,
            selection: SelectionPolicy::default(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("objectness_threshold", self.objectness_threshold),
            ("conf_threshold", self.conf_threshold),
            ("nms_threshold", self.nms_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.inp_width == 0 || self.inp_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "network input size must be non-zero, got {}x{}",
                self.inp_width, self.inp_height
            )));
        }

        Ok(())
    }
}

/// Cadence of the detect/track cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Frames per cycle: one DETECT frame followed by `cycle_length - 1`
    /// TRACK frames.
    pub cycle_length: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self { cycle_length: 10 }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cycle_length == 0 {
            return Err(Error::InvalidConfig(
                "cycle_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete configuration surface of the crate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub cycle: CycleConfig,
    pub tracker: TemplateTrackerConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.cycle.validate()?;
        self.tracker.validate()
    }
}
