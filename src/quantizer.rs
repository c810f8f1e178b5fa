use crate::bucket::ColorBucket;
use image::RgbaImage;
use std::collections::HashMap;

type Counts = HashMap<(u8, u8, u8), u32>;

/// Aggregates opaque pixels into fixed-size color buckets.
#[derive(Debug, Clone, Copy)]
pub struct ColorQuantizer {
    bucket_size: u8,
    alpha_threshold: u8,
}

/// The frozen result of a quantization pass.
#[derive(Debug, Clone)]
pub struct Histogram {
    buckets: Vec<ColorBucket>,
    opaque_pixels: u32,
}

impl ColorQuantizer {
    pub fn new(bucket_size: u8, alpha_threshold: u8) -> Self {
        Self {
            bucket_size,
            alpha_threshold,
        }
    }

    /// Count every pixel at or above the alpha threshold into the bucket its quantized color belongs to.
    pub fn quantize(&self, buffer: &RgbaImage) -> Histogram {
        let counts = self.count(buffer);

        let mut buckets = counts
            .into_iter()
            .map(|(rgb, frequency)| ColorBucket::new(rgb, frequency))
            .collect::<Vec<_>>();

        // hash map iteration order is random, so fix the order by key
        buckets.sort_by_key(|bucket| bucket.rgb());

        let opaque_pixels = buckets.iter().map(|bucket| bucket.frequency()).sum();
        log::debug!("quantized {} opaque pixels into {} buckets", opaque_pixels, buckets.len());

        Histogram { buckets, opaque_pixels }
    }

    pub fn quantize_rgb(&self, (r, g, b): (u8, u8, u8)) -> (u8, u8, u8) {
        (
            quantize_channel(r, self.bucket_size),
            quantize_channel(g, self.bucket_size),
            quantize_channel(b, self.bucket_size),
        )
    }

    #[cfg(not(feature = "rayon"))]
    fn count(&self, buffer: &RgbaImage) -> Counts {
        self.count_pixels(buffer.as_raw())
    }

    #[cfg(feature = "rayon")]
    fn count(&self, buffer: &RgbaImage) -> Counts {
        use rayon::prelude::*;

        let row_len = buffer.width() as usize * 4;
        if row_len == 0 {
            return Counts::new();
        }

        // each row gets its own map, the maps are summed afterwards so the result doesn't depend on scheduling
        buffer
            .as_raw()
            .par_chunks(row_len)
            .map(|row| self.count_pixels(row))
            .reduce(Counts::new, |mut lhs, rhs| {
                for (rgb, count) in rhs {
                    *lhs.entry(rgb).or_insert(0) += count;
                }

                lhs
            })
    }

    fn count_pixels(&self, samples: &[u8]) -> Counts {
        let mut counts = Counts::new();

        for pixel in samples.chunks_exact(4) {
            if pixel[3] < self.alpha_threshold {
                continue;
            }

            let rgb = self.quantize_rgb((pixel[0], pixel[1], pixel[2]));
            *counts.entry(rgb).or_insert(0) += 1;
        }

        counts
    }
}

impl Histogram {
    pub fn buckets(&self) -> &[ColorBucket] {
        &self.buckets
    }

    pub fn into_buckets(self) -> Vec<ColorBucket> {
        self.buckets
    }

    /// Number of pixels that passed the alpha threshold. Equal to the sum of all bucket frequencies.
    pub fn opaque_pixels(&self) -> u32 {
        self.opaque_pixels
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Round a channel value to the nearest multiple of `bucket_size`, saturating at 255.
pub fn quantize_channel(value: u8, bucket_size: u8) -> u8 {
    if bucket_size <= 1 {
        return value;
    }

    let size = bucket_size as f64;
    let quantized = (value as f64 / size).round() * size;

    quantized.min(u8::MAX as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn quantizer() -> ColorQuantizer {
        ColorQuantizer::new(15, 128)
    }

    #[test]
    fn channels_round_to_nearest_multiple() {
        assert_eq!(quantize_channel(0, 15), 0);
        assert_eq!(quantize_channel(7, 15), 0);
        assert_eq!(quantize_channel(8, 15), 15);
        assert_eq!(quantize_channel(10, 15), 15);
        assert_eq!(quantize_channel(250, 15), 255);
        assert_eq!(quantize_channel(255, 15), 255);
    }

    #[test]
    fn channels_saturate_when_bucket_size_does_not_divide_255() {
        assert_eq!(quantize_channel(254, 20), 255);
        assert_eq!(quantize_channel(249, 20), 240);
    }

    #[test]
    fn every_channel_has_eighteen_levels() {
        let mut levels = (0..=255).map(|v| quantize_channel(v, 15)).collect::<Vec<_>>();
        levels.dedup();

        assert_eq!(levels, (0..=17).map(|i| i * 15).collect::<Vec<u8>>());
    }

    #[test]
    fn dark_gray_pixel_lands_in_first_gray_bucket() {
        let buffer = RgbaImage::from_pixel(1, 1, Rgba([10, 10, 10, 255]));
        let histogram = quantizer().quantize(&buffer);

        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram.buckets()[0].rgb(), (15, 15, 15));
    }

    #[test]
    fn transparent_pixels_are_excluded() {
        let mut buffer = RgbaImage::from_pixel(10, 10, Rgba([200, 0, 0, 127]));
        for x in 0..10 {
            buffer.put_pixel(x, 0, Rgba([0, 0, 200, 128]));
        }

        let histogram = quantizer().quantize(&buffer);

        assert_eq!(histogram.opaque_pixels(), 10);
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram.buckets()[0].rgb(), (0, 0, 195));
    }

    #[test]
    fn frequencies_sum_to_opaque_pixel_count() {
        let buffer = RgbaImage::from_fn(40, 30, |x, y| {
            let alpha = if x % 3 == 0 { 0 } else { 255 };
            Rgba([(x * 6) as u8, (y * 8) as u8, 90, alpha])
        });
        let histogram = quantizer().quantize(&buffer);

        let total: u32 = histogram.buckets().iter().map(|bucket| bucket.frequency()).sum();
        let opaque = buffer.pixels().filter(|p| p[3] >= 128).count() as u32;

        assert_eq!(total, opaque);
        assert_eq!(histogram.opaque_pixels(), opaque);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn row_parallel_count_matches_sequential_count() {
        let buffer = RgbaImage::from_fn(37, 53, |x, y| {
            let alpha = ((x * 7 + y * 13) % 256) as u8;
            Rgba([(x * 7) as u8, (y * 5) as u8, (x * y) as u8, alpha])
        });
        let quantizer = quantizer();

        assert_eq!(quantizer.count(&buffer), quantizer.count_pixels(buffer.as_raw()));
    }

    #[test]
    fn buckets_are_sorted_by_key() {
        let buffer = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 0, 255]));
        let histogram = quantizer().quantize(&buffer);

        assert!(histogram.buckets().windows(2).all(|w| w[0].rgb() < w[1].rgb()));
    }

    #[test]
    fn empty_buffer_gives_empty_histogram() {
        let histogram = quantizer().quantize(&RgbaImage::new(0, 0));

        assert!(histogram.is_empty());
        assert_eq!(histogram.opaque_pixels(), 0);
    }
}
