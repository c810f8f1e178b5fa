use crate::{bucket::ColorBucket, config::ScoringConfig, quantizer::Histogram};

/// Computes the perceptual metrics and composite score of color buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every bucket of the histogram, releasing the buckets as scored candidates.
    pub fn score(&self, histogram: Histogram) -> Vec<ColorBucket> {
        let opaque_pixels = histogram.opaque_pixels();
        let mut buckets = histogram.into_buckets();

        for bucket in &mut buckets {
            self.score_bucket(bucket, opaque_pixels);
        }

        buckets
    }

    /// Fill in the derived fields of a single bucket. `opaque_pixels` is the total the bucket's frequency is relative
    /// to.
    pub fn score_bucket(&self, bucket: &mut ColorBucket, opaque_pixels: u32) {
        let rgb = bucket.rgb();

        bucket.saturation = saturation(rgb);
        bucket.brightness = brightness(rgb);
        bucket.colorfulness = colorfulness(rgb);

        bucket.frequency_score = if opaque_pixels > 0 {
            bucket.frequency as f64 / opaque_pixels as f64
        } else {
            0.0
        };

        let mut visual_impact = 1.0;

        if bucket.saturation > self.config.saturation_threshold {
            visual_impact *= self.config.saturation_boost;
        }

        if bucket.colorfulness > self.config.colorfulness_threshold {
            visual_impact *= self.config.colorfulness_boost;
        }

        // the square root flattens large uniform areas so a smaller vibrant region can still compete with them
        let balanced_frequency_score = bucket.frequency_score.sqrt() * self.config.frequency_weight;

        bucket.visual_impact = visual_impact;
        bucket.final_score = balanced_frequency_score * visual_impact;
    }
}

/// HSV saturation, `(max - min) / max` over the normalized channels. Zero for black.
pub fn saturation((r, g, b): (u8, u8, u8)) -> f64 {
    let max = r.max(g).max(b) as f64 / 255.0;
    let min = r.min(g).min(b) as f64 / 255.0;

    if max == 0.0 {
        0.0
    } else {
        (max - min) / max
    }
}

/// Luma-weighted brightness in `[0, 1]`.
pub fn brightness((r, g, b): (u8, u8, u8)) -> f64 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
}

/// Standard deviation of the three channels around their mean, normalized by 255. Zero for any shade of gray.
pub fn colorfulness((r, g, b): (u8, u8, u8)) -> f64 {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let mean = (r + g + b) / 3.0;
    let variance = ((r - mean).powi(2) + (g - mean).powi(2) + (b - mean).powi(2)) / 3.0;

    variance.sqrt() / 255.0
}
