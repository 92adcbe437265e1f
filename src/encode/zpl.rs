//! ZPL `^GFA` graphic field, ASCII hex payload.

use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZplGraphic;

impl RasterEncoder for ZplGraphic {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        let packed = grid.pack_continuous();
        let total = packed.len() as i64;
        let per_row = total.checked_div(grid.height() as i64).unwrap_or(0);
        out.append_bytes(b"^GFA,")
            .append_decimal(total)
            .append_byte(b',')
            .append_decimal(total)
            .append_byte(b',')
            .append_decimal(per_row)
            .append_byte(b',')
            .append_hex(&packed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn graphic_field_counts_bytes() {
        let grid = PixelGrid::from_fn(16, 2, |x, _| x < 4).unwrap();
        let out = ZplGraphic.encode(&grid.view()).unwrap();
        assert_eq!(out.as_bytes(), b"^GFA,4,4,2,F000F000");
    }
}
