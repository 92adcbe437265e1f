//! CPCL `EG` expanded graphics, ASCII hex payload.

use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpclGraphic {
    pub x: u32,
    pub y: u32,
}

impl CpclGraphic {
    pub fn new(x: u32, y: u32) -> Self {
        CpclGraphic { x, y }
    }
}

impl RasterEncoder for CpclGraphic {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        out.append_bytes(b"EG ")
            .append_decimal((grid.width() / 8) as i64)
            .append_byte(b' ')
            .append_decimal(grid.height() as i64)
            .append_byte(b' ')
            .append_decimal(self.x as i64)
            .append_byte(b' ')
            .append_decimal(self.y as i64)
            .append_byte(b' ')
            .append_hex(&grid.pack_continuous())
            .append_bytes(b"\r\n");
        Ok(())
    }
}
