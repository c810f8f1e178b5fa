use crate::bucket::ColorBucket;
use std::fmt;

/// A single color of a generated [`crate::Palette`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u8,
    green: u8,
    blue: u8,
    population: u32,
    score: f64,
}

impl Swatch {
    pub fn new((red, green, blue): (u8, u8, u8), population: u32, score: f64) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
            score,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn hsl(self) -> (f32, f32, f32) {
        crate::rgb_to_hsl(self.rgb())
    }

    pub fn population(self) -> u32 {
        self.population
    }

    pub fn score(self) -> f64 {
        self.score
    }

    /// The color as `#rrggbb` with lowercase digits.
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// The color as a CSS `rgb(r, g, b)` string.
    pub fn rgb_string(self) -> String {
        format!("rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

impl From<&ColorBucket> for Swatch {
    fn from(bucket: &ColorBucket) -> Self {
        Swatch::new(bucket.rgb(), bucket.frequency(), bucket.final_score())
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}
