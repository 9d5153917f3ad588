//! Viewer configuration.
//!
//! Settings come from a TOML file (all sections and fields optional) and are
//! then overridden by command-line flags:
//!
//! ```toml
//! [view]
//! initial_scale = 4.0
//! pan_step = 16
//! zoom_step = 0.25
//! invert_palette = false
//! row_cache_rows = 8
//!
//! [input]
//! repeat_interval_ms = 0
//! script = "right*4,zoom-out,exit"
//!
//! [geometry]
//! columns = 4
//!
//! [output]
//! snapshot = "frame.png"
//! ```

use crate::args::Args;
use crate::error::ViewerError;
use rle_codec::{geometry::max_columns, ContextOptions, Palette, ROW_CACHE_CAPACITY};
use rle_display::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Complete viewer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Pan/zoom behavior and rendering.
    #[serde(default)]
    pub view: ViewConfig,
    /// Input pacing and scripted keys.
    #[serde(default)]
    pub input: InputConfig,
    /// Tile layout override.
    #[serde(default)]
    pub geometry: GeometryConfig,
    /// Snapshot output.
    #[serde(default)]
    pub output: OutputConfig,
}

/// View configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Scale at startup, clamped to what the image allows.
    #[serde(default = "default_initial_scale")]
    pub initial_scale: f64,
    /// Pan distance per key poll, in device pixels.
    #[serde(default = "default_pan_step")]
    pub pan_step: u32,
    /// Scale change per zoom key poll.
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Swap dark and light palette entries.
    #[serde(default)]
    pub invert_palette: bool,
    /// Rows kept in the row offset cache.
    #[serde(default = "default_row_cache_rows")]
    pub row_cache_rows: usize,
}

fn default_initial_scale() -> f64 {
    4.0
}

fn default_pan_step() -> u32 {
    16
}

fn default_zoom_step() -> f64 {
    0.25
}

fn default_row_cache_rows() -> usize {
    ROW_CACHE_CAPACITY
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            initial_scale: default_initial_scale(),
            pan_step: default_pan_step(),
            zoom_step: default_zoom_step(),
            invert_palette: false,
            row_cache_rows: default_row_cache_rows(),
        }
    }
}

/// Input configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Minimum time between repeats of a held chord (0 = every poll).
    #[serde(default)]
    pub repeat_interval_ms: u64,
    /// Key script replayed when no device keypad is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Geometry configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Fixed tile-column count; inferred when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// PNG file receiving the last rendered frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

impl ViewerConfig {
    /// Default config file location for this platform.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rleviewer")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content).map_err(|e| {
            ViewerError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Build the effective configuration for `args`.
    ///
    /// An explicit `--config` file must exist; the platform default is used
    /// only if present. Flags override file values, and the result is
    /// validated.
    pub fn resolve(args: &Args) -> Result<Self, ViewerError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Override file values with command-line flags.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(cols) = args.cols {
            self.geometry.columns = Some(cols);
        }
        if let Some(scale) = args.scale {
            self.view.initial_scale = scale;
        }
        if let Some(script) = &args.script {
            self.input.script = Some(script.clone());
        }
        if let Some(snapshot) = &args.snapshot {
            self.output.snapshot = Some(snapshot.clone());
        }
        self.view.invert_palette = args.invert || self.view.invert_palette;
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ViewerError> {
        let view = &self.view;
        if !view.initial_scale.is_finite() || view.initial_scale <= 0.0 {
            return Err(ViewerError::Config(format!(
                "initial_scale must be a positive number, got {}",
                view.initial_scale
            )));
        }
        if !view.zoom_step.is_finite() || view.zoom_step <= 0.0 {
            return Err(ViewerError::Config(format!(
                "zoom_step must be a positive number, got {}",
                view.zoom_step
            )));
        }
        if view.pan_step == 0 {
            return Err(ViewerError::Config("pan_step cannot be zero".to_string()));
        }
        if view.row_cache_rows == 0 {
            return Err(ViewerError::Config(
                "row_cache_rows cannot be zero".to_string(),
            ));
        }
        if let Some(cols) = self.geometry.columns {
            let max = max_columns();
            if cols == 0 || cols > max {
                return Err(ViewerError::Config(format!(
                    "columns must be between 1 and {}, got {}",
                    max, cols
                )));
            }
        }
        Ok(())
    }

    /// Viewport settings.
    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            initial_scale: self.view.initial_scale,
            pan_step: self.view.pan_step,
            zoom_step: self.view.zoom_step,
        }
    }

    /// Decoder settings.
    pub fn context_options(&self) -> ContextOptions {
        let palette = if self.view.invert_palette {
            Palette::GRAYSCALE.inverted()
        } else {
            Palette::GRAYSCALE
        };
        ContextOptions {
            columns: self.geometry.columns,
            palette,
            row_cache_capacity: self.view.row_cache_rows,
            ..ContextOptions::default()
        }
    }
}
