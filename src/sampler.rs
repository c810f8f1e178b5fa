use image::{imageops::FilterType, GenericImageView, Pixel, RgbaImage};

/// Shrinks images to a bounded working resolution.
#[derive(Debug, Clone, Copy)]
pub struct PixelSampler {
    max_dimension: u32,
    filter: FilterType,
}

impl PixelSampler {
    pub fn new(max_dimension: u32, filter: FilterType) -> Self {
        Self { max_dimension, filter }
    }

    /// The working resolution for an image of the given size.
    ///
    /// Both sides are scaled by `min(max / width, max / height)` and floored, preserving the aspect ratio. Images that
    /// already fit are never upscaled.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (0, 0);
        }

        let max = self.max_dimension as f64;
        let scale = (max / width as f64).min(max / height as f64);

        if scale >= 1.0 {
            (width, height)
        } else {
            (
                (width as f64 * scale).floor() as u32,
                (height as f64 * scale).floor() as u32,
            )
        }
    }

    /// Produce an RGBA8 working buffer from the given image. Pixel types without an alpha channel come out fully
    /// opaque.
    pub fn sample<I>(&self, image: &I) -> RgbaImage
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8> + 'static,
    {
        let (width, height) = image.dimensions();
        let (target_width, target_height) = self.target_dimensions(width, height);

        if target_width == 0 || target_height == 0 {
            // a very thin image may floor to nothing on its short side
            return RgbaImage::new(0, 0);
        }

        if (target_width, target_height) == (width, height) {
            to_rgba8(image)
        } else {
            let resized = image::imageops::resize(image, target_width, target_height, self.filter);
            to_rgba8(&resized)
        }
    }
}

fn to_rgba8<I>(image: &I) -> RgbaImage
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    RgbaImage::from_fn(width, height, |x, y| image.get_pixel(x, y).to_rgba())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    fn sampler() -> PixelSampler {
        PixelSampler::new(300, FilterType::Triangle)
    }

    #[test]
    fn large_images_shrink_preserving_aspect_ratio() {
        assert_eq!(sampler().target_dimensions(600, 300), (300, 150));
        assert_eq!(sampler().target_dimensions(300, 1200), (75, 300));
        assert_eq!(sampler().target_dimensions(1000, 10), (300, 3));
    }

    #[test]
    fn small_images_keep_native_resolution() {
        assert_eq!(sampler().target_dimensions(120, 80), (120, 80));
        assert_eq!(sampler().target_dimensions(300, 300), (300, 300));
    }

    #[test]
    fn degenerate_images_sample_to_nothing() {
        assert_eq!(sampler().target_dimensions(0, 50), (0, 0));
        assert_eq!(sampler().target_dimensions(10_000, 1), (300, 0));

        let buffer = sampler().sample(&RgbaImage::new(10_000, 1));
        assert_eq!(buffer.dimensions(), (0, 0));
    }

    #[test]
    fn sampled_buffer_is_bounded() {
        let image = RgbaImage::from_pixel(640, 480, Rgba([20, 40, 60, 255]));
        let buffer = PixelSampler::new(300, FilterType::Nearest).sample(&image);

        assert_eq!(buffer.dimensions(), (300, 225));
        assert!(buffer.pixels().all(|p| *p == Rgba([20, 40, 60, 255])));
    }

    #[test]
    fn rgb_images_become_opaque() {
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let buffer = sampler().sample(&image);

        assert_eq!(buffer.dimensions(), (4, 4));
        assert!(buffer.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }
}
