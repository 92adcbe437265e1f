//! `GS ( L` graphics: each chunk is stored in the printer's graphics buffer
//! (function 112) and then printed (function 50).

use super::{CHUNK_ROWS, GS};
use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;
use log::debug;

/// Bytes between the length field and the payload: m fn a bx by c xL xH yL yH.
const STORE_HEADER_LEN: usize = 10;

/// `m fn a bx by c`: raster format, store, monochrome, 1x1 scale, color 1.
const STORE_FUNCTION: [u8; 6] = [0x30, 0x70, 0x30, 0x01, 0x01, 0x31];

/// Print the buffered graphics.
const PRINT_GRAPHICS: [u8; 7] = [GS, b'(', b'L', 0x02, 0x00, 0x30, 0x32];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GsL;

impl RasterEncoder for GsL {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        for chunk in grid.chunks(CHUNK_ROWS) {
            let payload = chunk.pack_rows();
            debug!(
                "GS ( L chunk at row {}: {} rows, {} bytes",
                chunk.first_row(),
                chunk.height(),
                payload.len()
            );
            out.append_bytes(&[GS, b'(', b'L'])
                .append_u16_le_checked(payload.len() + STORE_HEADER_LEN, "GS ( L data length")?
                .append_bytes(&STORE_FUNCTION)
                .append_u16_le_checked(chunk.width(), "GS ( L image width")?
                .append_u16_le_checked(chunk.height(), "GS ( L chunk height")?
                .append_bytes(&payload)
                .append_bytes(&PRINT_GRAPHICS);
        }
        Ok(())
    }
}
