//! Tunable parameters of the extraction pipeline.
//!
//! Every stage reads its constants from here. The defaults are a 300 pixel working resolution, an alpha cutoff of 128,
//! 15 unit color buckets, five colors, and a diversity threshold that starts at 40 and relaxes in steps of 5 down to 20.
//!
//! With the `serde` feature the configuration can be loaded from JSON. Missing fields fall back to their defaults, so
//! a file only needs to name what it changes:
//!
//! ```
//! # #[cfg(feature = "serde")]
//! # {
//! let config = palettegen::ExtractionConfig::from_json_str(r#"{ "colorCount": 8 }"#).unwrap();
//! assert_eq!(config.color_count, 8);
//! assert_eq!(config.bucket_size, 15);
//! # }
//! ```

use crate::{
    error::{Error, Result},
    selector::MAX_DISTANCE,
};
use image::imageops::FilterType;

pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;
pub const DEFAULT_BUCKET_SIZE: u8 = 15;

const MAX_RELAX_PASSES: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ExtractionConfig {
    /// Upper bound for both sides of the working buffer. Larger images are shrunk to fit, smaller ones are left alone.
    pub max_dimension: u32,

    /// Resampling filter used when shrinking.
    pub filter: ResampleFilter,

    /// Pixels with an alpha below this value are ignored entirely.
    pub alpha_threshold: u8,

    /// Width of a color bucket along each channel.
    pub bucket_size: u8,

    /// Number of colors to select.
    pub color_count: usize,

    pub scoring: ScoringConfig,

    pub selection: SelectionConfig,
}

/// Constants of the bucket scoring formula.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ScoringConfig {
    /// Buckets more saturated than this get `saturation_boost` applied to their visual impact.
    pub saturation_threshold: f64,
    pub saturation_boost: f64,

    /// Buckets more colorful than this get `colorfulness_boost` applied to their visual impact.
    pub colorfulness_threshold: f64,
    pub colorfulness_boost: f64,

    /// Multiplier applied to the square root of a bucket's frequency share.
    pub frequency_weight: f64,
}

/// Constants of the diversity constrained selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SelectionConfig {
    /// Minimum perceptual distance between selected colors in the first pass.
    pub min_distance: f64,

    /// Amount the distance requirement is lowered by between passes.
    pub relax_step: f64,

    /// Relaxation stops once the requirement is no longer above this value.
    pub distance_floor: f64,
}

/// The resampling filters of [`image::imageops::FilterType`] in a serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ExtractionConfig {
    /// Check that the configuration describes a pipeline that terminates and produces non-negative scores.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(Error::invalid_config("max_dimension", self.max_dimension));
        }

        if self.bucket_size == 0 {
            return Err(Error::invalid_config("bucket_size", self.bucket_size));
        }

        self.scoring.validate()?;
        self.selection.validate()
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    #[cfg(feature = "serde")]
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<()> {
        let factors = [
            ("saturation_boost", self.saturation_boost),
            ("colorfulness_boost", self.colorfulness_boost),
            ("frequency_weight", self.frequency_weight),
        ];

        for (parameter, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(parameter, value));
            }
        }

        if self.saturation_threshold.is_nan() {
            return Err(Error::invalid_config("saturation_threshold", self.saturation_threshold));
        }

        if self.colorfulness_threshold.is_nan() {
            return Err(Error::invalid_config("colorfulness_threshold", self.colorfulness_threshold));
        }

        Ok(())
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<()> {
        if !self.min_distance.is_finite() {
            return Err(Error::invalid_config("min_distance", self.min_distance));
        }

        if !self.distance_floor.is_finite() {
            return Err(Error::invalid_config("distance_floor", self.distance_floor));
        }

        // a non-positive step would never reach the floor
        if !self.relax_step.is_finite() || self.relax_step <= 0.0 {
            return Err(Error::invalid_config("relax_step", self.relax_step));
        }

        // the step has to be able to move the threshold at all
        if self.min_distance - self.relax_step == self.min_distance {
            return Err(Error::invalid_config("relax_step", self.relax_step));
        }

        // thresholds above the distance bound and below zero are never scanned more than once
        let start = self.min_distance.min(MAX_DISTANCE);
        let end = self.distance_floor.max(0.0);
        if (start - end) / self.relax_step > MAX_RELAX_PASSES {
            return Err(Error::invalid_config("relax_step", self.relax_step));
        }

        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_dimension: crate::DEFAULT_MAX_DIMENSION,
            filter: ResampleFilter::default(),
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            bucket_size: DEFAULT_BUCKET_SIZE,
            color_count: crate::DEFAULT_COLOR_COUNT,
            scoring: ScoringConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            saturation_threshold: 0.3,
            saturation_boost: 1.3,
            colorfulness_threshold: 0.2,
            colorfulness_boost: 1.2,
            frequency_weight: 2.0,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_distance: 40.0,
            relax_step: 5.0,
            distance_floor: 20.0,
        }
    }
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
