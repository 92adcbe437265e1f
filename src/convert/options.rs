// src/convert/options.rs

//! Per-job conversion options.
//!
//! Options usually arrive as a loosely typed JSON object from the print job.
//! Parsing is forgiving: an optional field that is missing, of the wrong
//! type or malformed is treated as absent and its default applies. Numbers
//! written as strings are accepted. Only a field that names something the
//! codec cannot do (an unknown quantization) is an error.

use crate::encode::escpos::{DEFAULT_DOT_DENSITY, parse_dot_density};
use crate::encode::evolis::{DEFAULT_PRECISION, Overlay, OverlayRect};
use crate::image::quantize::{DEFAULT_THRESHOLD, Quantization};
use crate::utils::error::{CodecError, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Options for converting one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    /// Target language name or alias.
    pub language: Option<String>,
    pub quantization: Quantization,
    pub threshold: i32,
    /// `ESC *` density; negative values select legacy mode.
    pub dot_density: i32,
    pub legacy_mode: bool,
    /// ESC/POS encoder name, `None` for the default.
    pub image_encoding: Option<String>,
    /// EPL/CPCL position in dots.
    pub x: u32,
    pub y: u32,
    /// PGL logo name.
    pub logo_id: String,
    /// PGL: use IGP resolution instead of native dots.
    pub igp_dots: bool,
    /// Evolis color precision.
    pub precision: i64,
    /// Evolis clear overlay.
    pub overlay: Overlay,
    /// Wrap the image in the language's label start/end commands.
    pub frame: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            language: None,
            quantization: Quantization::default(),
            threshold: DEFAULT_THRESHOLD,
            dot_density: DEFAULT_DOT_DENSITY,
            legacy_mode: false,
            image_encoding: None,
            x: 0,
            y: 0,
            logo_id: String::new(),
            igp_dots: false,
            precision: DEFAULT_PRECISION as i64,
            overlay: Overlay::None,
            frame: false,
        }
    }
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options targeting `language` with everything else defaulted.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self::new().with_language(language)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_dot_density(mut self, dot_density: i32) -> Self {
        self.dot_density = dot_density;
        self
    }

    pub fn with_legacy_mode(mut self, legacy_mode: bool) -> Self {
        self.legacy_mode = legacy_mode;
        self
    }

    pub fn with_image_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.image_encoding = Some(encoding.into());
        self
    }

    pub fn with_position(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_logo(mut self, logo_id: impl Into<String>, igp_dots: bool) -> Self {
        self.logo_id = logo_id.into();
        self.igp_dots = igp_dots;
        self
    }

    pub fn with_precision(mut self, precision: i64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_frame(mut self, frame: bool) -> Self {
        self.frame = frame;
        self
    }

    /// `ESC *` density and legacy flag after folding in the sign convention.
    pub fn effective_dot_density(&self) -> (u8, bool) {
        let legacy = self.legacy_mode || self.dot_density < 0;
        match u8::try_from(self.dot_density.unsigned_abs()) {
            Ok(density) => (density, legacy),
            Err(_) => (DEFAULT_DOT_DENSITY as u8, legacy),
        }
    }

    /// Parses a JSON options object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidArg(format!("image options: {}", e)))?;
        Self::from_json(&value)
    }

    /// Reads options from a JSON value. Anything other than an object yields
    /// the defaults.
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut opts = Self::default();
        let Some(obj) = value.as_object() else {
            return Ok(opts);
        };

        if let Some(language) = opt_str(obj, "language") {
            opts.language = Some(language.to_string());
        }
        if let Some(name) = opt_str(obj, "quantization") {
            opts.quantization = Quantization::parse(name)?;
        }
        if let Some(threshold) = opt_i64(obj, "threshold").and_then(|t| i32::try_from(t).ok()) {
            opts.threshold = threshold;
        }
        if let Some(density) = opt_dot_density(obj) {
            opts.dot_density = density;
        }
        if let Some(legacy) = opt_bool(obj, "legacyMode") {
            opts.legacy_mode = legacy;
        }
        if let Some(encoding) = opt_str(obj, "imageEncoding") {
            opts.image_encoding = Some(encoding.to_string());
        }
        opts.x = opt_position(obj, "x");
        opts.y = opt_position(obj, "y");
        if let Some(logo_id) = opt_str(obj, "logoId") {
            opts.logo_id = logo_id.to_string();
        }
        if let Some(igp_dots) = opt_bool(obj, "igpDots") {
            opts.igp_dots = igp_dots;
        }
        if let Some(precision) = opt_i64(obj, "precision") {
            opts.precision = precision;
        }
        if let Some(overlay) = obj.get("overlay") {
            opts.overlay = parse_overlay(overlay);
        }
        if let Some(frame) = opt_bool(obj, "frame") {
            opts.frame = frame;
        }
        Ok(opts)
    }
}

fn opt_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_i64(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(as_i64)
}

fn opt_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Offsets cannot be negative; out-of-range values count as absent.
fn opt_position(obj: &Map<String, Value>, key: &str) -> u32 {
    opt_i64(obj, key)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn opt_dot_density(obj: &Map<String, Value>) -> Option<i32> {
    let density = match obj.get("dotDensity")? {
        Value::String(s) => parse_dot_density(s)?,
        other => i32::try_from(as_i64(other)?).ok()?,
    };
    (density.unsigned_abs() <= u8::MAX as u32).then_some(density)
}

fn parse_overlay(value: &Value) -> Overlay {
    match value {
        Value::Bool(true) => Overlay::Full,
        Value::Array(blocks) => Overlay::Rects(
            blocks
                .iter()
                .filter_map(|block| {
                    let coords: Vec<i64> = block.as_array()?.iter().filter_map(as_i64).collect();
                    match coords.as_slice() {
                        &[x1, y1, x2, y2] => Some(OverlayRect::new(x1, y1, x2, y2)),
                        _ => None,
                    }
                })
                .collect(),
        ),
        Value::String(path) if !path.trim().is_empty() => {
            Overlay::Mask(PathBuf::from(path.trim()))
        }
        _ => Overlay::None,
    }
}
