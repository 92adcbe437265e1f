//! Quantization policies: deciding whether a pixel counts as ink.
//!
//! A policy is a pure `(pixel, threshold) -> bool` function plus the kind it
//! implements. The three built-in policies are unit structs living in
//! statics, so they need no initialization and can be shared across threads.
//! [`Quantization::Dither`] has no built-in policy; an external dithering
//! algorithm plugs in by implementing [`InkPolicy`].

use crate::image::raster::Pixel;
use crate::utils::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Threshold used when the options bag does not carry one.
pub const DEFAULT_THRESHOLD: i32 = 127;

/// The kinds of black & white quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quantization {
    /// Only exact, fully opaque black is ink.
    Black,
    /// Pixels more opaque than the threshold are ink; color is ignored.
    Alpha,
    /// Pixels darker than the threshold are ink, unless too transparent.
    Luma,
    /// Reserved for an external dithering algorithm.
    Dither,
}

impl Quantization {
    pub const ALL: [Quantization; 4] = [
        Quantization::Black,
        Quantization::Alpha,
        Quantization::Luma,
        Quantization::Dither,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quantization::Black => "BLACK",
            Quantization::Alpha => "ALPHA",
            Quantization::Luma => "LUMA",
            Quantization::Dither => "DITHER",
        }
    }

    /// Case-insensitive lookup; unknown names fail with `UnsupportedPolicy`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|q| q.name().eq_ignore_ascii_case(input))
            .ok_or_else(|| CodecError::UnsupportedPolicy(input.to_string()))
    }

    /// Returns the built-in policy for this kind.
    ///
    /// `Dither` has none and fails here, at configuration time, rather than
    /// once per pixel.
    pub fn policy(self) -> Result<&'static dyn InkPolicy> {
        match self {
            Quantization::Black => Ok(&BLACK_POLICY),
            Quantization::Alpha => Ok(&ALPHA_POLICY),
            Quantization::Luma => Ok(&LUMA_POLICY),
            Quantization::Dither => Err(CodecError::UnsupportedPolicy(self.name().to_string())),
        }
    }
}

impl Default for Quantization {
    fn default() -> Self {
        Quantization::Luma
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantization {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Decides whether a single pixel should receive ink.
pub trait InkPolicy: fmt::Debug + Send + Sync {
    /// The quantization kind this policy implements.
    fn kind(&self) -> Quantization;

    fn is_ink(&self, pixel: Pixel, threshold: i32) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlackPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct LumaPolicy;

static BLACK_POLICY: BlackPolicy = BlackPolicy;
static ALPHA_POLICY: AlphaPolicy = AlphaPolicy;
static LUMA_POLICY: LumaPolicy = LumaPolicy;

impl InkPolicy for BlackPolicy {
    fn kind(&self) -> Quantization {
        Quantization::Black
    }

    #[inline]
    fn is_ink(&self, pixel: Pixel, _threshold: i32) -> bool {
        pixel == Pixel::black()
    }
}

impl InkPolicy for AlphaPolicy {
    fn kind(&self) -> Quantization {
        Quantization::Alpha
    }

    #[inline]
    fn is_ink(&self, pixel: Pixel, threshold: i32) -> bool {
        pixel.a as i32 > threshold
    }
}

impl InkPolicy for LumaPolicy {
    fn kind(&self) -> Quantization {
        Quantization::Luma
    }

    #[inline]
    fn is_ink(&self, pixel: Pixel, threshold: i32) -> bool {
        // too transparent reads as paper, whatever the color
        if (pixel.a as i32) < threshold {
            return false;
        }
        pixel.luma() < threshold
    }
}
