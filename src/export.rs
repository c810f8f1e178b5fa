//! The JSON document a palette is exported as.
//!
//! ```json
//! {
//!   "colors": [
//!     { "id": 1, "hex": "#ff0000", "rgb": "rgb(255, 0, 0)", "name": "Color 1" }
//!   ],
//!   "extractedAt": "2024-05-01T12:00:00.000Z",
//!   "totalColors": 1
//! }
//! ```

use crate::{error::Result, Palette};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteExport {
    pub colors: Vec<ExportedColor>,
    /// When the export was made, not when the colors were extracted.
    pub extracted_at: String,
    pub total_colors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedColor {
    /// 1-based position in the palette.
    pub id: usize,
    pub hex: String,
    pub rgb: String,
    pub name: String,
}

impl PaletteExport {
    pub fn new(palette: &Palette, exported_at: DateTime<Utc>) -> Self {
        let colors = palette
            .swatches()
            .iter()
            .enumerate()
            .map(|(index, swatch)| ExportedColor {
                id: index + 1,
                hex: swatch.hex(),
                rgb: swatch.rgb_string(),
                name: format!("Color {}", index + 1),
            })
            .collect::<Vec<_>>();

        Self {
            total_colors: colors.len(),
            colors,
            extracted_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Export the palette stamped with the current time.
    pub fn now(palette: &Palette) -> Self {
        Self::new(palette, Utc::now())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
