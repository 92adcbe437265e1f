// src/encode/evolis.rs

//! Evolis card printer color encoder.
//!
//! The image is separated into CMYK planes and each plane is downloaded as a
//! ribbon panel with `ESC Db;<panel>;<precision>;<data>\r`. Panels go out in
//! the order the ribbon passes the head: yellow, magenta, cyan, black and
//! finally the optional clear overlay. Color panels use the requested
//! precision, black and overlay are always bi-level.
//!
//! Samples are quantized to `precision` levels and packed MSB first,
//! `popcount(precision - 1)` bits each, continuously across pixel and row
//! boundaries.

use crate::command::CommandBuilder;
use crate::image::quantize::{DEFAULT_THRESHOLD, Quantization};
use crate::image::raster::{Pixel, RasterImage};
use crate::utils::error::Result;
use bitvec::prelude::*;
use log::{debug, warn};
use std::path::PathBuf;

pub const DEFAULT_PRECISION: u16 = 128;

/// Precision of the black and overlay panels.
const BILEVEL: u16 = 2;

const ESC: u8 = 0x1B;

/// An inclusive, 1-based rectangle of the overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl OverlayRect {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        OverlayRect { x1, y1, x2, y2 }
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        let (x, y) = (x as i64 + 1, y as i64 + 1);
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Coverage of the clear overlay panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    /// No overlay panel is sent.
    #[default]
    None,
    /// The whole card is coated.
    Full,
    /// Only the listed rectangles are coated.
    Rects(Vec<OverlayRect>),
    /// Black pixels of the mask image at this path are coated.
    Mask(PathBuf),
    /// Black pixels of an already decoded mask are coated.
    MaskImage(RasterImage),
}

impl Overlay {
    pub fn is_none(&self) -> bool {
        matches!(self, Overlay::None)
    }
}

/// Evolis encoder for one card side.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolisEncoder {
    precision: u16,
    overlay: Overlay,
}

impl Default for EvolisEncoder {
    fn default() -> Self {
        EvolisEncoder {
            precision: DEFAULT_PRECISION,
            overlay: Overlay::None,
        }
    }
}

impl EvolisEncoder {
    /// Creates an encoder. A precision that is not a power of two in
    /// `2..=256` falls back to [`DEFAULT_PRECISION`].
    pub fn new(precision: i64, overlay: Overlay) -> Self {
        let precision = match u16::try_from(precision) {
            Ok(p) if (BILEVEL..=256).contains(&p) && p.is_power_of_two() => p,
            _ => {
                warn!(
                    "Evolis precision {} is not a power of two in 2..=256, using {}",
                    precision, DEFAULT_PRECISION
                );
                DEFAULT_PRECISION
            }
        };
        EvolisEncoder { precision, overlay }
    }

    pub fn precision(&self) -> u16 {
        self.precision
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn append_to(&self, image: &RasterImage, out: &mut CommandBuilder) -> Result<()> {
        let planes = separate(image);
        append_ribbon(out, b'y', self.precision, &planes.yellow);
        append_ribbon(out, b'm', self.precision, &planes.magenta);
        append_ribbon(out, b'c', self.precision, &planes.cyan);
        append_ribbon(out, b'k', BILEVEL, &planes.black);
        if let Some(coat) = self.overlay_plane(image)? {
            append_ribbon(out, b'o', BILEVEL, &coat);
        }
        Ok(())
    }

    pub fn encode(&self, image: &RasterImage) -> Result<crate::command::EncodedCommand> {
        let mut out = CommandBuilder::with_capacity(image.pixels().len() * 4);
        self.append_to(image, &mut out)?;
        Ok(out.finish())
    }

    /// Coverage values (0 or 255) for the overlay panel, `None` if no
    /// overlay is requested.
    fn overlay_plane(&self, image: &RasterImage) -> Result<Option<Vec<u8>>> {
        let (width, height) = image.dimensions();
        let plane_from = |covered: &dyn Fn(u32, u32) -> bool| {
            (0..height)
                .flat_map(|y| (0..width).map(move |x| (x, y)))
                .map(|(x, y)| if covered(x, y) { 255 } else { 0 })
                .collect::<Vec<u8>>()
        };

        let plane = match &self.overlay {
            Overlay::None => return Ok(None),
            Overlay::Full => vec![255u8; image.pixels().len()],
            Overlay::Rects(rects) => {
                plane_from(&|x: u32, y: u32| rects.iter().any(|r| r.contains(x, y)))
            }
            Overlay::Mask(path) => {
                let mask = load_mask(path)?;
                mask_plane(&mask, width, height)?
            }
            Overlay::MaskImage(mask) => mask_plane(mask, width, height)?,
        };
        Ok(Some(plane))
    }
}

/// Mask pixels are sampled at the card pixel's coordinates; anything
/// outside the mask is left uncoated.
fn mask_plane(mask: &RasterImage, width: u32, height: u32) -> Result<Vec<u8>> {
    let policy = Quantization::Black.policy()?;
    let (mask_w, mask_h) = mask.dimensions();
    let mut plane = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let ink = x < mask_w
                && y < mask_h
                && policy.is_ink(mask.get_pixel(x, y), DEFAULT_THRESHOLD);
            plane.push(if ink { 255 } else { 0 });
        }
    }
    Ok(plane)
}

#[cfg(feature = "image")]
fn load_mask(path: &std::path::Path) -> Result<RasterImage> {
    RasterImage::open(path)
}

#[cfg(not(feature = "image"))]
fn load_mask(path: &std::path::Path) -> Result<RasterImage> {
    Err(crate::utils::error::CodecError::invalid_image(format!(
        "overlay mask {} cannot be decoded without the `image` feature",
        path.display()
    )))
}

/// Per-pixel color separation, values 0-255.
struct Planes {
    cyan: Vec<u8>,
    magenta: Vec<u8>,
    yellow: Vec<u8>,
    black: Vec<u8>,
}

fn separate(image: &RasterImage) -> Planes {
    let n = image.pixels().len();
    let mut planes = Planes {
        cyan: vec![0; n],
        magenta: vec![0; n],
        yellow: vec![0; n],
        black: vec![0; n],
    };
    for (i, &Pixel { r, g, b, .. }) in image.pixels().iter().enumerate() {
        if r == 0 && g == 0 && b == 0 {
            planes.black[i] = 255;
        } else {
            planes.cyan[i] = 255 - r;
            planes.magenta[i] = 255 - g;
            planes.yellow[i] = 255 - b;
        }
    }
    planes
}

/// Bits per sample at `precision` levels.
fn precision_bits(precision: u16) -> usize {
    (precision - 1).count_ones() as usize
}

/// Scales a 0-255 value to `0..precision`.
fn scale(value: u8, precision: u16) -> u8 {
    (value as u32 * (precision as u32 - 1) / 255) as u8
}

fn pack_samples(values: &[u8], precision: u16) -> Vec<u8> {
    let bits = precision_bits(precision);
    let mut packed: BitVec<u8, Msb0> = BitVec::with_capacity(values.len() * bits);
    for &value in values {
        let sample = scale(value, precision);
        packed.extend_from_bitslice(&sample.view_bits::<Msb0>()[8 - bits..]);
    }
    packed.set_uninitialized(false);
    packed.into_vec()
}

fn append_ribbon(out: &mut CommandBuilder, panel: u8, precision: u16, values: &[u8]) {
    debug!("Building ribbon 'Db;{};{};...'", panel as char, precision);
    out.append_byte(ESC)
        .append_bytes(b"Db;")
        .append_byte(panel)
        .append_byte(b';')
        .append_decimal(precision as i64)
        .append_byte(b';')
        .append_bytes(&pack_samples(values, precision))
        .append_byte(b'\r');
}
