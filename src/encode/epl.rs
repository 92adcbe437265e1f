//! EPL2 `GW` direct graphic write. The payload is raw binary, and EPL reads
//! a set bit as paper, so the grid arrives here already inverted.

use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EplGraphic {
    pub x: u32,
    pub y: u32,
}

impl EplGraphic {
    pub fn new(x: u32, y: u32) -> Self {
        EplGraphic { x, y }
    }
}

impl RasterEncoder for EplGraphic {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        out.append_bytes(b"GW")
            .append_decimal(self.x as i64)
            .append_byte(b',')
            .append_decimal(self.y as i64)
            .append_byte(b',')
            .append_decimal((grid.width() / 8) as i64)
            .append_byte(b',')
            .append_decimal(grid.height() as i64)
            .append_byte(b',')
            .append_bytes(&grid.pack_continuous())
            .append_byte(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn header_then_raw_bytes() {
        let grid = PixelGrid::from_fn(8, 2, |x, y| x == y).unwrap();
        let out = EplGraphic::new(10, 20).encode(&grid.view()).unwrap();
        assert_eq!(out.as_bytes(), b"GW10,20,1,2,\x80\x40\n");
    }
}
