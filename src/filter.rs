const BLACK_MAX_LIGHTNESS: f32 = 0.05;
const WHITE_MIN_LIGHTNESS: f32 = 0.95;

/// A trait used to implement filters for the color selection process.
///
/// Filters remove scored color buckets before the diverse colors are selected from them. A removed bucket still
/// counts towards the total the other buckets' frequencies are measured against. No filters are installed by default.
///
/// See [`crate::PaletteBuilder::add_filter`] on how to add filters to the selection process.
pub trait Filter {
    /// Return whether a given color should be allowed or not. The same color is given in both sRGB
    /// and HSL for convenience.
    fn is_allowed(&self, rgb: (u8, u8, u8), hsl: (f32, f32, f32)) -> bool;
}

/// A filter that disallows colors very close to black and colors very close to white.
#[derive(Debug, Clone, Copy)]
pub struct ExtremeLightnessFilter {
    black_max_lightness: f32,
    white_min_lightness: f32,
}

impl ExtremeLightnessFilter {
    pub fn new(black_max_lightness: f32, white_min_lightness: f32) -> Self {
        Self {
            black_max_lightness,
            white_min_lightness,
        }
    }
}

impl Default for ExtremeLightnessFilter {
    fn default() -> Self {
        Self::new(BLACK_MAX_LIGHTNESS, WHITE_MIN_LIGHTNESS)
    }
}

impl Filter for ExtremeLightnessFilter {
    fn is_allowed(&self, _: (u8, u8, u8), (_, _, l): (f32, f32, f32)) -> bool {
        l > self.black_max_lightness && l < self.white_min_lightness
    }
}

impl<F> Filter for F
where
    F: Fn((u8, u8, u8), (f32, f32, f32)) -> bool,
{
    fn is_allowed(&self, rgb: (u8, u8, u8), hsl: (f32, f32, f32)) -> bool {
        self(rgb, hsl)
    }
}
