/// A quantized color cell aggregating every opaque pixel that rounds to the same RGB triple.
///
/// Buckets come out of [`crate::ColorQuantizer`] carrying only their key and frequency. The derived metrics are
/// filled in by [`crate::ScoringEngine`]; until then they are all zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ColorBucket {
    pub(crate) red: u8,
    pub(crate) green: u8,
    pub(crate) blue: u8,
    pub(crate) frequency: u32,
    pub(crate) saturation: f64,
    pub(crate) brightness: f64,
    pub(crate) colorfulness: f64,
    pub(crate) visual_impact: f64,
    pub(crate) frequency_score: f64,
    pub(crate) final_score: f64,
}

impl ColorBucket {
    pub fn new((red, green, blue): (u8, u8, u8), frequency: u32) -> Self {
        Self {
            red,
            green,
            blue,
            frequency,
            saturation: 0.0,
            brightness: 0.0,
            colorfulness: 0.0,
            visual_impact: 0.0,
            frequency_score: 0.0,
            final_score: 0.0,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// Number of opaque pixels that were mapped to this bucket.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Luma-weighted brightness in `[0, 1]`. Not part of the composite score.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn colorfulness(&self) -> f64 {
        self.colorfulness
    }

    pub fn visual_impact(&self) -> f64 {
        self.visual_impact
    }

    /// Share of the opaque pixels covered by this bucket.
    pub fn frequency_score(&self) -> f64 {
        self.frequency_score
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }
}
