// src/encode/escpos/esc_asterisk.rs

//! `ESC *` bit-image encoder.
//!
//! The grid is sent as horizontal bands. Each band is one `ESC * m nL nH`
//! command followed by `width * bytes_needed` column bytes, where every
//! column byte packs 8 vertically adjacent dots, top dot in the MSB.
//!
//! Density 1 (impact heads) is striped: each band is sent twice, first the
//! even rows then the odd rows, with a one-dot feed in between. The band
//! offset only advances after the odd pass.

use super::{DEFAULT_DOT_DENSITY, ESC};
use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;
use log::debug;

/// Line spacing set while printing in legacy mode.
const LEGACY_LINE_SPACING: u8 = 24;
/// Line spacing restored after a legacy-mode image.
const DEFAULT_LINE_SPACING: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscAsterisk {
    dot_density: u8,
    legacy_mode: bool,
}

impl EscAsterisk {
    pub fn new(dot_density: u8, legacy_mode: bool) -> Self {
        EscAsterisk {
            dot_density,
            legacy_mode,
        }
    }

    pub fn dot_density(&self) -> u8 {
        self.dot_density
    }

    pub fn legacy_mode(&self) -> bool {
        self.legacy_mode
    }

    /// Dots the head advances per band.
    pub fn segment_height(&self) -> u8 {
        match self.dot_density {
            0 => 16,
            1 => 8,
            _ => 24,
        }
    }

    pub fn is_striped(&self) -> bool {
        self.dot_density == 1
    }

    /// Column bytes per band and column.
    pub fn bytes_needed(&self) -> usize {
        if self.dot_density <= 1 { 1 } else { 3 }
    }
}

impl Default for EscAsterisk {
    fn default() -> Self {
        EscAsterisk::new(DEFAULT_DOT_DENSITY as u8, false)
    }
}

impl RasterEncoder for EscAsterisk {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        let (width, height) = (grid.width(), grid.height());
        let segment_height = self.segment_height();
        let stripe = self.is_striped();
        let step = if stripe { 2 } else { 1 };
        let bytes_needed = self.bytes_needed();

        if self.legacy_mode {
            out.append_bytes(&[ESC, b'3', LEGACY_LINE_SPACING]);
        }

        let mut offset = 0;
        let mut zero_pass = true;
        let mut passes = 0;
        while offset < height {
            out.append_bytes(&[ESC, b'*', self.dot_density])
                .append_u16_le_checked(width, "ESC * image width")?;

            let first_bit = if zero_pass { 0 } else { 1 };
            for x in 0..width {
                for bite in 0..bytes_needed {
                    let mut slice = 0u8;
                    for bit in (first_bit..8 * step).step_by(step) {
                        let y = offset + bite * 8 + bit;
                        if grid.bit(y * width + x).unwrap_or(false) {
                            slice |= 1 << (7 - (bit - first_bit) / step);
                        }
                    }
                    out.append_byte(slice);
                }
            }

            if stripe {
                if zero_pass {
                    out.append_bytes(&[ESC, b'J', 1]);
                } else {
                    out.append_bytes(&[ESC, b'J', segment_height - 1]);
                    offset += 8 * bytes_needed;
                }
                zero_pass = !zero_pass;
            } else {
                if self.legacy_mode {
                    out.append_byte(b'\n');
                } else {
                    out.append_bytes(&[ESC, b'J', segment_height]);
                }
                offset += 8 * bytes_needed;
            }
            passes += 1;
        }

        if self.legacy_mode {
            out.append_bytes(&[ESC, b'3', DEFAULT_LINE_SPACING]);
        }
        debug!(
            "ESC * density {}: {} passes over {} rows",
            self.dot_density, passes, height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    fn count_headers(bytes: &[u8], density: u8) -> usize {
        bytes.windows(3).filter(|w| *w == [ESC, b'*', density]).count()
    }

    #[test]
    fn striping_doubles_passes() {
        let blank = PixelGrid::from_fn(4, 8, |_, _| false).unwrap();
        let striped = EscAsterisk::new(1, false).encode(&blank.view()).unwrap();
        assert_eq!(count_headers(striped.as_bytes(), 1), 2);

        let plain = EscAsterisk::new(32, false).encode(&blank.view()).unwrap();
        assert_eq!(count_headers(plain.as_bytes(), 32), 1);
    }

    #[test]
    fn band_layout_for_24_dot_density() {
        // first and last row of the band inked
        let grid = PixelGrid::from_fn(2, 24, |_, y| y == 0 || y == 23).unwrap();
        let out = EscAsterisk::new(33, false).encode(&grid.view()).unwrap();
        assert_eq!(
            out.as_bytes(),
            &[
                ESC, b'*', 33, 2, 0, // header
                0x80, 0x00, 0x01, 0x80, 0x00, 0x01, // two columns, 3 bytes each
                ESC, b'J', 24,
            ]
        );
    }

    #[test]
    fn striped_passes_read_alternate_rows() {
        // row 0 and row 3 inked
        let grid = PixelGrid::from_fn(1, 8, |_, y| y == 0 || y == 3).unwrap();
        let out = EscAsterisk::new(1, false).encode(&grid.view()).unwrap();
        assert_eq!(
            out.as_bytes(),
            &[
                ESC, b'*', 1, 1, 0, 0x80, ESC, b'J', 1, // even rows: 0 -> bit 7
                ESC, b'*', 1, 1, 0, 0x40, ESC, b'J', 7, // odd rows: 3 -> bit 6
            ]
        );
    }

    #[test]
    fn legacy_mode_sets_and_restores_line_spacing() {
        let grid = PixelGrid::from_fn(1, 30, |_, _| true).unwrap();
        let out = EscAsterisk::new(32, true).encode(&grid.view()).unwrap();
        let bytes = out.as_bytes();
        assert_eq!(&bytes[..3], &[ESC, b'3', 24]);
        assert_eq!(&bytes[bytes.len() - 3..], &[ESC, b'3', 30]);
        // two bands of 24, each ending in a newline feed
        assert_eq!(count_headers(bytes, 32), 2);
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 2);
        // the second band holds rows 24..30, then zeros
        assert_eq!(&bytes[17..20], &[0xFC, 0x00, 0x00]);
    }

    #[test]
    fn default_is_single_density() {
        let enc = EscAsterisk::default();
        assert_eq!(enc.dot_density(), 32);
        assert!(!enc.legacy_mode());
        assert_eq!((enc.segment_height(), enc.bytes_needed()), (24, 3));
        let zero = EscAsterisk::new(0, false);
        assert_eq!((zero.segment_height(), zero.bytes_needed()), (16, 1));
    }

    #[test]
    fn oversized_width_is_rejected() {
        let grid = PixelGrid::from_fn(65536, 1, |_, _| false).unwrap();
        assert!(EscAsterisk::default().encode(&grid.view()).is_err());
    }
}
