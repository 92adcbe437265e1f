//! SATO SBPL `ESC GH` hex graphics. Both size fields count 8-dot units.

use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::Result;

pub(crate) const ESC: u8 = 0x1B;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SbplGraphic;

impl RasterEncoder for SbplGraphic {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        let size = format!("{:03}{:03}", grid.width() / 8, grid.height() / 8);
        out.append_byte(ESC)
            .append_bytes(b"GH")
            .append_ascii(&size)?
            .append_hex(&grid.pack_continuous());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn sizes_are_zero_padded() {
        let grid = PixelGrid::from_fn(8, 16, |_, y| y == 0).unwrap();
        let out = SbplGraphic.encode(&grid.view()).unwrap();
        let mut expected = vec![ESC];
        expected.extend_from_slice(b"GH001002FF000000000000000000000000000000");
        assert_eq!(out.as_bytes(), expected.as_slice());
    }
}
