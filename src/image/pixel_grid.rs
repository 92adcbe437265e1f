//! Bit-addressable monochrome raster.
//!
//! A [`PixelGrid`] owns a single MSB-first bit buffer of `width * height`
//! bits, row-major, index `y * width + x`. A set bit means "emit ink here"
//! (after any language polarity inversion has been applied).
//!
//! Row ranges are exposed as [`GridView`]s: a width, a row count and a
//! borrowed sub-slice of the owner's bit buffer. Taking a view costs O(1)
//! and never copies or aliases mutable state, since the grid is immutable
//! once built.

use crate::utils::error::{CodecError, Result};
use bitvec::order::Msb0;
use bitvec::prelude::*;
use log::debug;

/// An immutable monochrome raster, one bit per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    bits: BitVec<u8, Msb0>,
}

impl PixelGrid {
    /// Creates a grid by evaluating `f(x, y)` for every pixel, row by row.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> bool,
    {
        let total_bits = match width.checked_mul(height) {
            Some(bits) if bits < (isize::MAX as usize) / 8 => bits,
            _ => {
                return Err(CodecError::InvalidArg(format!(
                    "pixel grid dimensions ({}x{}) are too large",
                    width, height
                )));
            }
        };

        let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(total_bits);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        // the packed view exposes the raw buffer, so the tail must be zero
        bits.set_uninitialized(false);

        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Wraps MSB-first packed bytes, continuous across rows.
    pub fn from_packed(width: usize, height: usize, bytes: &[u8]) -> Result<Self> {
        let total_bits = width * height;
        if bytes.len() * 8 < total_bits {
            return Err(CodecError::InvalidArg(format!(
                "{} bytes cannot hold a {}x{} grid",
                bytes.len(),
                width,
                height
            )));
        }
        let mut bits = BitVec::<u8, Msb0>::from_slice(bytes);
        bits.truncate(total_bits);
        bits.set_uninitialized(false);
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels, always `width * height`.
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "location exceeds bounds");
        self.bits[y * self.width + x]
    }

    /// Bit at a row-major index, or `None` past the end of the grid.
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|b| *b)
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// The whole grid packed 8 pixels per byte, MSB first, continuous across
    /// row boundaries. The last byte is zero-padded.
    pub fn packed_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// A view over every row.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            width: self.width,
            height: self.height,
            first_row: 0,
            bits: &self.bits,
        }
    }

    /// A view over `row_count` rows starting at `start_row`.
    pub fn slice(&self, start_row: usize, row_count: usize) -> Result<GridView<'_>> {
        self.view().slice(start_row, row_count)
    }
}

/// A contiguous row range of a [`PixelGrid`].
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    width: usize,
    height: usize,
    first_row: usize,
    bits: &'a BitSlice<u8, Msb0>,
}

impl<'a> GridView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row of the owning grid this view starts at.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// `ceil(width / 8)`, the stride of per-row packing.
    pub fn bytes_per_row(&self) -> usize {
        self.width.div_ceil(8)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "location exceeds bounds");
        self.bits[y * self.width + x]
    }

    /// Bit at a row-major index relative to this view, `None` past the end.
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|b| *b)
    }

    pub fn row(&self, y: usize) -> &'a BitSlice<u8, Msb0> {
        assert!(y < self.height, "row exceeds bounds");
        &self.bits[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a BitSlice<u8, Msb0>> + use<'a> {
        let bits = self.bits;
        let width = self.width;
        (0..self.height).map(move |y| &bits[y * width..(y + 1) * width])
    }

    /// Narrows this view to `row_count` rows starting at `start_row`.
    pub fn slice(&self, start_row: usize, row_count: usize) -> Result<GridView<'a>> {
        match start_row.checked_add(row_count) {
            Some(end) if end <= self.height => Ok(self.slice_unchecked(start_row, row_count)),
            _ => Err(CodecError::InvalidArg(format!(
                "slice of {} rows at row {} exceeds grid height {}",
                row_count, start_row, self.height
            ))),
        }
    }

    fn slice_unchecked(&self, start_row: usize, row_count: usize) -> GridView<'a> {
        let from = start_row * self.width;
        let to = (start_row + row_count) * self.width;
        GridView {
            width: self.width,
            height: row_count,
            first_row: self.first_row + start_row,
            bits: &self.bits[from..to],
        }
    }

    /// Splits the view into consecutive chunks of at most `rows` rows. The
    /// last chunk may be shorter.
    ///
    /// # Panics
    /// Panics if `rows` is zero.
    pub fn chunks(&self, rows: usize) -> impl Iterator<Item = GridView<'a>> + use<'a> {
        assert!(rows > 0, "chunk height must be non-zero");
        let view = *self;
        (0..self.height)
            .step_by(rows)
            .map(move |start| view.slice_unchecked(start, rows.min(view.height - start)))
    }

    /// Packs each row independently into `bytes_per_row()` bytes, MSB first.
    /// Padding bits at the end of each row are zero.
    pub fn pack_rows(&self) -> Vec<u8> {
        let stride = self.bytes_per_row();
        debug!("Packing {} rows at {} bytes per row", self.height, stride);
        let mut out = vec![0u8; stride * self.height];
        for (y, row) in self.rows().enumerate() {
            let dst = &mut out[y * stride..(y + 1) * stride];
            dst.view_bits_mut::<Msb0>()[..self.width].copy_from_bitslice(row);
        }
        out
    }

    /// Packs the view 8 pixels per byte, continuous across rows.
    pub fn pack_continuous(&self) -> Vec<u8> {
        debug!("Packing {} bits continuously", self.size());
        let mut out = vec![0u8; self.size().div_ceil(8)];
        out.view_bits_mut::<Msb0>()[..self.size()].copy_from_bitslice(self.bits);
        out
    }
}
