// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract a small, ranked and perceptually diverse color palette from an image.
//!
//! Extraction runs in four stages:
//!
//! 1. the image is shrunk so neither side exceeds 300 pixels ([`PixelSampler`]),
//! 2. opaque pixels are counted into 15 unit color buckets ([`ColorQuantizer`]),
//! 3. every bucket is scored by how much of the image it covers, boosted when it is saturated or colorful
//!    ([`ScoringEngine`]),
//! 4. the best scoring buckets are picked greedily, skipping those too close to an already picked color and relaxing
//!    that distance when not enough colors survive ([`DiversitySelector`]).
//!
//! ```
//! use palettegen::{image::{Rgba, RgbaImage}, Palette};
//!
//! let image = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
//! let palette = Palette::from_image(image).generate().unwrap();
//!
//! assert_eq!(palette.hex_colors(), vec!["#ff0000"]);
//! ```

mod bucket;
mod config;
mod error;
mod filter;
mod quantizer;
mod sampler;
mod scoring;
mod selector;
mod swatch;

#[cfg(feature = "serde")]
pub mod export;

pub const DEFAULT_COLOR_COUNT: usize = 5;
pub const DEFAULT_MAX_DIMENSION: u32 = 300;

pub use crate::{
    bucket::ColorBucket,
    config::{ExtractionConfig, ResampleFilter, ScoringConfig, SelectionConfig},
    error::{Error, Result},
    filter::{ExtremeLightnessFilter, Filter},
    quantizer::{quantize_channel, ColorQuantizer, Histogram},
    sampler::PixelSampler,
    scoring::{brightness, colorfulness, saturation, ScoringEngine},
    selector::{color_distance, rank, DiversitySelector},
    swatch::Swatch,
};
pub use image;
pub use palette;

use image::{math::Rect, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use palette::IntoColor;
use std::path::Path;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
    candidates: Vec<ColorBucket>,
    opaque_pixels: u32,
}

pub struct PaletteBuilder<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    image: ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>,
    config: ExtractionConfig,
    region: Option<Rect>,
    filters: Vec<Box<dyn Filter>>,
}

impl Palette {
    pub fn from_image<P>(image: ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>) -> PaletteBuilder<P>
    where
        P: image::Pixel<Subpixel = u8> + 'static,
    {
        PaletteBuilder::from_image(image)
    }

    /// Start building a palette from a raw RGBA8 buffer of the given dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<PaletteBuilder<Rgba<u8>>> {
        let actual = pixels.len();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|samples| samples.checked_mul(4))
            .unwrap_or(usize::MAX);

        if actual != expected {
            return Err(Error::BufferSize {
                width,
                height,
                expected,
                actual,
            });
        }

        let image = RgbaImage::from_raw(width, height, pixels).ok_or(Error::BufferSize {
            width,
            height,
            expected,
            actual,
        })?;

        Ok(PaletteBuilder::from_image(image))
    }

    /// Start building a palette from an image file, decoding it with the `image` crate.
    pub fn from_path<Q>(path: Q) -> Result<PaletteBuilder<Rgba<u8>>>
    where
        Q: AsRef<Path>,
    {
        let image = image::open(path)?;
        Ok(PaletteBuilder::from_image(image.into_rgba8()))
    }

    /// The selected colors, best first.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Every scored bucket the colors were selected from, in ranking order.
    pub fn candidates(&self) -> &[ColorBucket] {
        &self.candidates
    }

    /// Number of pixels in the working buffer that passed the alpha threshold.
    pub fn opaque_pixels(&self) -> u32 {
        self.opaque_pixels
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Swatch> {
        self.swatches.iter()
    }

    pub fn dominant_swatch(&self) -> Option<Swatch> {
        self.swatches.first().copied()
    }

    pub fn most_prominent_color(&self) -> Option<(u8, u8, u8)> {
        self.swatches
            .iter()
            .max_by_key(|swatch| swatch.population())
            .map(|swatch| swatch.rgb())
    }

    pub fn hex_colors(&self) -> Vec<String> {
        self.swatches.iter().map(|swatch| swatch.hex()).collect()
    }

    pub fn rgb_strings(&self) -> Vec<String> {
        self.swatches.iter().map(|swatch| swatch.rgb_string()).collect()
    }

    fn generate(buffer: &RgbaImage, config: &ExtractionConfig, filters: &[Box<dyn Filter>]) -> Palette {
        let histogram = ColorQuantizer::new(config.bucket_size, config.alpha_threshold).quantize(buffer);
        let opaque_pixels = histogram.opaque_pixels();

        let mut candidates = ScoringEngine::new(config.scoring).score(histogram);

        if !filters.is_empty() {
            let before = candidates.len();
            candidates.retain(|bucket| is_allowed(filters, bucket.rgb()));
            log::debug!("filters removed {} of {} buckets", before - candidates.len(), before);
        }

        let selected = DiversitySelector::new(config.selection).select(&mut candidates, config.color_count);
        let swatches = selected.iter().map(Swatch::from).collect();

        Self {
            swatches,
            candidates,
            opaque_pixels,
        }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = std::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P> PaletteBuilder<P>
where
    P: image::Pixel<Subpixel = u8> + 'static,
{
    pub fn from_image(image: ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>) -> Self {
        Self {
            image,
            config: ExtractionConfig::default(),
            region: None,
            filters: Vec::new(),
        }
    }

    /// Replace the whole extraction configuration.
    pub fn config(self, config: ExtractionConfig) -> Self {
        Self { config, ..self }
    }

    pub fn color_count(mut self, color_count: usize) -> Self {
        self.config.color_count = color_count;
        self
    }

    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.config.max_dimension = max_dimension;
        self
    }

    pub fn resample_filter(mut self, filter: ResampleFilter) -> Self {
        self.config.filter = filter;
        self
    }

    pub fn bucket_size(mut self, bucket_size: u8) -> Self {
        self.config.bucket_size = bucket_size;
        self
    }

    pub fn alpha_threshold(mut self, alpha_threshold: u8) -> Self {
        self.config.alpha_threshold = alpha_threshold;
        self
    }

    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn selection(mut self, selection: SelectionConfig) -> Self {
        self.config.selection = selection;
        self
    }

    /// Only extract colors from the given part of the image. The region is in source image coordinates.
    pub fn region(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            region: Some(Rect { x, y, width, height }),
            ..self
        }
    }

    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn clear_region(self) -> Self {
        Self { region: None, ..self }
    }

    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    pub fn generate(self) -> Result<Palette> {
        self.config.validate()?;

        let sampler = PixelSampler::new(self.config.max_dimension, self.config.filter.into());
        let buffer = match self.region {
            Some(region) => {
                self.check_region(region)?;

                // crop first so the region gets the full working resolution
                let view = self.image.view(region.x, region.y, region.width, region.height);
                sampler.sample(&*view)
            }
            None => sampler.sample(&self.image),
        };

        log::debug!(
            "sampled {}x{} image down to {}x{}",
            self.image.width(),
            self.image.height(),
            buffer.width(),
            buffer.height()
        );

        Ok(Palette::generate(&buffer, &self.config, &self.filters))
    }

    fn check_region(&self, region: Rect) -> Result<()> {
        let (image_width, image_height) = self.image.dimensions();
        let fits = region.x as u64 + region.width as u64 <= image_width as u64
            && region.y as u64 + region.height as u64 <= image_height as u64;

        if fits {
            Ok(())
        } else {
            Err(Error::InvalidRegion {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                image_width,
                image_height,
            })
        }
    }
}

fn is_allowed(filters: &[Box<dyn Filter>], rgb: (u8, u8, u8)) -> bool {
    let hsl = rgb_to_hsl(rgb);
    filters.iter().all(|filter| filter.is_allowed(rgb, hsl))
}

fn rgb_to_hsl(rgb: (u8, u8, u8)) -> (f32, f32, f32) {
    let raw = palette::Srgb::from_components(rgb);
    let raw_float: palette::Srgb<f32> = raw.into_format();
    let hsl: palette::Hsl = raw_float.into_color();
    let (h, s, l) = hsl.into_components();

    (h.to_positive_degrees(), s, l)
}
