// src/image/raster.rs

//! In-memory representation of a decoded bitmap.
//!
//! `RasterImage` is what the external image-decoding collaborator hands to the
//! codec. It is read-only as far as the codec is concerned: the pipeline only
//! ever samples pixels out of it.

use crate::utils::error::{CodecError, Result};
use bytemuck::{Pod, Zeroable};

// --- Pixel Type Definitions ---

/// A single RGBA pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent pixel, used for canvas padding.
    pub const TRANSPARENT: Pixel = Pixel::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel { r, g, b, a }
    }

    /// An opaque pixel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Pixel { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Pixel::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Pixel::rgb(255, 255, 255)
    }

    /// Builds a pixel from a packed `0xAARRGGBB` word.
    pub const fn from_argb(argb: u32) -> Self {
        Pixel {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the pixel back into a `0xAARRGGBB` word.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Integer luma, `(299r + 587g + 114b) / 1000`.
    #[inline]
    pub fn luma(self) -> i32 {
        (299 * self.r as i32 + 587 * self.g as i32 + 114 * self.b as i32) / 1000
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(arr: [u8; 4]) -> Self {
        Pixel::rgba(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(p: Pixel) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

// --- RasterImage ---

/// An immutable, row-major RGBA bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl RasterImage {
    /// Creates an image from a row-major vector of pixels.
    pub fn new(width: u32, height: u32, data: Vec<Pixel>) -> Result<Self> {
        let expected = Self::checked_len(width, height)?;
        if data.len() != expected {
            return Err(CodecError::invalid_image(format!(
                "expected {} pixels for a {}x{} image, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(RasterImage {
            width,
            height,
            data,
        })
    }

    /// Creates an image filled with a single pixel value.
    pub fn from_pixel(width: u32, height: u32, pixel: Pixel) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        Ok(RasterImage {
            width,
            height,
            data: vec![pixel; len],
        })
    }

    /// Creates an image by calling a function for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let len = Self::checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(RasterImage {
            width,
            height,
            data,
        })
    }

    /// Creates an image from packed `0xAARRGGBB` words.
    pub fn from_argb(width: u32, height: u32, words: &[u32]) -> Result<Self> {
        Self::new(width, height, words.iter().map(|&w| Pixel::from_argb(w)).collect())
    }

    /// Creates an image from a tightly packed RGBA8 byte buffer.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let pixels: &[Pixel] = bytemuck::try_cast_slice(bytes).map_err(|e| {
            CodecError::invalid_image(format!("RGBA buffer of {} bytes: {:?}", bytes.len(), e))
        })?;
        Self::new(width, height, pixels.to_vec())
    }

    fn checked_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(CodecError::invalid_image(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                CodecError::invalid_image(format!("image dimensions {}x{} are too large", width, height))
            })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(x < self.width && y < self.height);
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// Returns raw pixel data as an RGBA byte slice.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[cfg(feature = "image")]
impl RasterImage {
    /// Decodes an encoded image file (PNG, ...) held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = ::image::load_from_memory(bytes)?.to_rgba8();
        log::info!("Loaded {}x{} image", decoded.width(), decoded.height());
        Ok(Self::from(&decoded))
    }

    /// Reads and decodes an image file from disk.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }
}

#[cfg(feature = "image")]
impl From<&::image::RgbaImage> for RasterImage {
    fn from(img: &::image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let data = img.pixels().map(|p| Pixel::from(p.0)).collect();
        RasterImage {
            width,
            height,
            data,
        }
    }
}
