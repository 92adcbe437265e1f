//! `GS v 0` raster bit images, one self-contained command per chunk.

use super::{CHUNK_ROWS, GS};
use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;
use log::debug;

/// Normal (1x1) print mode.
const MODE_NORMAL: u8 = 0x00;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GsV0;

impl RasterEncoder for GsV0 {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        for chunk in grid.chunks(CHUNK_ROWS) {
            let bytes_per_row = chunk.bytes_per_row();
            debug!(
                "GS v 0 chunk at row {}: {} rows of {} bytes",
                chunk.first_row(),
                chunk.height(),
                bytes_per_row
            );
            out.append_bytes(&[GS, b'v', b'0', MODE_NORMAL])
                .append_u16_le_checked(bytes_per_row, "GS v 0 bytes per row")?
                .append_u16_le_checked(chunk.height(), "GS v 0 chunk height")?
                .append_bytes(&chunk.pack_rows());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn all_ink_square() {
        let grid = PixelGrid::from_fn(8, 8, |_, _| true).unwrap();
        let out = GsV0.encode(&grid.view()).unwrap();
        let mut expected = vec![0x1D, b'v', b'0', 0x00, 0x01, 0x00, 0x08, 0x00];
        expected.extend_from_slice(&[0xFF; 8]);
        assert_eq!(out.as_bytes(), expected.as_slice());
    }

    #[test]
    fn rows_are_padded_independently() {
        let grid = PixelGrid::from_fn(10, 3, |_, _| true).unwrap();
        let out = GsV0.encode(&grid.view()).unwrap();
        assert_eq!(&out.as_bytes()[4..8], &[2, 0, 3, 0]);
        assert_eq!(&out.as_bytes()[8..], &[0xFF, 0xC0, 0xFF, 0xC0, 0xFF, 0xC0]);
    }

    #[test]
    fn chunk_headers_carry_their_own_height() {
        let grid = PixelGrid::from_fn(16, 30, |_, y| y >= 24).unwrap();
        let out = GsV0.encode(&grid.view()).unwrap();
        let bytes = out.as_bytes();
        let first_len = 8 + 2 * 24;
        assert_eq!(&bytes[6..8], &[24, 0]);
        assert!(bytes[8..first_len].iter().all(|b| *b == 0));
        assert_eq!(&bytes[first_len..first_len + 8], &[GS, b'v', b'0', 0, 2, 0, 6, 0]);
        assert!(bytes[first_len + 8..].iter().all(|b| *b == 0xFF));
        assert_eq!(bytes.len(), first_len + 8 + 2 * 6);
    }

    #[test]
    fn encoding_is_repeatable() {
        let grid = PixelGrid::from_fn(13, 50, |x, y| (x * y) % 3 == 0).unwrap();
        let a = GsV0.encode(&grid.view()).unwrap();
        let b = GsV0.encode(&grid.view()).unwrap();
        assert_eq!(a, b);
    }
}
