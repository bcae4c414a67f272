//! Editor configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```
//! use folio::config::EditorConfig;
//!
//! let config = EditorConfig::from_json(r#"{"transition": {"animated_phase_ms": 250}}"#).unwrap();
//! assert_eq!(config.transition.animated_phase_ms, 250);
//! assert_eq!(config.transition.fallback_phase_ms, 350);
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::export::{IMAGE_FILENAME_PREFIX, MARKDOWN_FILENAME, PageFrame, TEXT_FILENAME};

/// Page-turn timing and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Length of each phase when an animation backend drives the turn.
    pub animated_phase_ms: u64,
    /// Length of each phase on the CSS-class path.
    pub fallback_phase_ms: u64,
    /// Rotation of a fully turned page, in degrees.
    pub rotation_deg: f32,
    /// Opacity of a fully turned page.
    pub min_opacity: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            animated_phase_ms: 400,
            fallback_phase_ms: 350,
            rotation_deg: 90.0,
            min_opacity: 0.5,
        }
    }
}

/// Export filenames and rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub text_filename: String,
    pub markdown_filename: String,
    pub image_prefix: String,
    /// `<title>` of the print document.
    pub print_title: String,
    /// Device pixel ratio handed to the rasterizer.
    pub raster_scale: f32,
    pub frame: PageFrame,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            text_filename: TEXT_FILENAME.to_string(),
            markdown_filename: MARKDOWN_FILENAME.to_string(),
            image_prefix: IMAGE_FILENAME_PREFIX.to_string(),
            print_title: "Notebook Export".to_string(),
            raster_scale: 2.0,
            frame: PageFrame::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub transition: TransitionConfig,
    pub export: ExportConfig,
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
