use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The image could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A raw pixel buffer does not hold exactly `width * height` RGBA8 pixels.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} RGBA8 image")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("region at ({x}, {y}) of size {width}x{height} does not fit in a {image_width}x{image_height} image")]
    InvalidRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("invalid configuration: {parameter} = {value}")]
    InvalidConfig { parameter: &'static str, value: String },

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidConfig {
            parameter,
            value: value.to_string(),
        }
    }
}
