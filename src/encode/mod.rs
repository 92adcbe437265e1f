//! Protocol encoders: one per printer command language.
//!
//! ## Module Map
//!
//! - `escpos` - `ESC *`, `GS ( L` and `GS v 0` bit images
//! - `zpl` - Zebra `^GFA` graphic field
//! - `epl` - Eltron `GW` direct graphic
//! - `cpcl` - Comtec `EG` expanded graphic
//! - `sbpl` - SATO `ESC GH` graphic
//! - `pgl` - Printronix `~LOGO` run list
//! - `evolis` - Evolis CMYK(O) ribbon panels, the one color encoder
//!
//! Monochrome encoders implement [`RasterEncoder`] and are dispatched through
//! the [`MonoEncoder`] sum type, so adding a language means adding a variant
//! rather than another branch at every call site.

pub mod cpcl;
pub mod epl;
pub mod escpos;
pub mod evolis;
pub mod pgl;
pub mod sbpl;
pub mod zpl;

pub use cpcl::CpclGraphic;
pub use epl::EplGraphic;
pub use escpos::{EscAsterisk, GsL, GsV0};
pub use evolis::{EvolisEncoder, Overlay, OverlayRect};
pub use pgl::PglLogo;
pub use sbpl::SbplGraphic;
pub use zpl::ZplGraphic;

use crate::command::{CommandBuilder, EncodedCommand};
use crate::image::GridView;
use crate::language::{ImageEncoding, LanguageTarget};
use crate::utils::error::Result;

/// Appends the command bytes for a grid region.
///
/// Implementations are pure: the same grid and encoder settings always
/// produce the same bytes.
pub trait RasterEncoder {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()>;

    /// Encodes `grid` into a fresh command.
    fn encode(&self, grid: &GridView<'_>) -> Result<EncodedCommand> {
        let mut out = CommandBuilder::with_capacity(grid.size() / 4 + 32);
        self.append_to(grid, &mut out)?;
        Ok(out.finish())
    }
}

/// A configured monochrome encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonoEncoder {
    EscAsterisk(EscAsterisk),
    GsL(GsL),
    GsV0(GsV0),
    Zpl(ZplGraphic),
    Epl(EplGraphic),
    Cpcl(CpclGraphic),
    Sbpl(SbplGraphic),
    Pgl(PglLogo),
}

impl MonoEncoder {
    pub fn encoding(&self) -> ImageEncoding {
        match self {
            MonoEncoder::EscAsterisk(_) => ImageEncoding::EscAsterisk,
            MonoEncoder::GsL(_) => ImageEncoding::GsL,
            MonoEncoder::GsV0(_) => ImageEncoding::GsV0,
            MonoEncoder::Zpl(_) => ImageEncoding::Zpl,
            MonoEncoder::Epl(_) => ImageEncoding::Epl,
            MonoEncoder::Cpcl(_) => ImageEncoding::Cpcl,
            MonoEncoder::Sbpl(_) => ImageEncoding::Sbpl,
            MonoEncoder::Pgl(_) => ImageEncoding::Pgl,
        }
    }
}

impl RasterEncoder for MonoEncoder {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        match self {
            MonoEncoder::EscAsterisk(enc) => enc.append_to(grid, out),
            MonoEncoder::GsL(enc) => enc.append_to(grid, out),
            MonoEncoder::GsV0(enc) => enc.append_to(grid, out),
            MonoEncoder::Zpl(enc) => enc.append_to(grid, out),
            MonoEncoder::Epl(enc) => enc.append_to(grid, out),
            MonoEncoder::Cpcl(enc) => enc.append_to(grid, out),
            MonoEncoder::Sbpl(enc) => enc.append_to(grid, out),
            MonoEncoder::Pgl(enc) => enc.append_to(grid, out),
        }
    }
}

/// Label start and end commands that make an image printable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFrame {
    pub header: &'static [u8],
    pub footer: &'static [u8],
}

impl LabelFrame {
    const EMPTY: LabelFrame = LabelFrame {
        header: b"",
        footer: b"",
    };

    pub fn for_language(lang: LanguageTarget) -> Self {
        match lang {
            LanguageTarget::Zpl => LabelFrame {
                header: b"^XA\n",
                footer: b"^XZ\n",
            },
            LanguageTarget::Epl => LabelFrame {
                header: b"N\n",
                footer: b"P1,1\n",
            },
            // ! <offset> <h-res> <v-res> <height> <qty>
            LanguageTarget::Cpcl => LabelFrame {
                header: b"! 0 200 200 203 1\r\n",
                footer: b"PRINT\r\n",
            },
            // start, horizontal and vertical print position / quantity, end
            LanguageTarget::Sbpl => LabelFrame {
                header: b"\x1BA\x1BH0000\x1BV0000",
                footer: b"\x1BQ1\x1BZ",
            },
            // raw mode, landscape, clear card memory, start sequence / end sequence
            LanguageTarget::Evolis => LabelFrame {
                header: b"\x1BPps;0\r\x1BPwr;0\r\x1BWcb;k;0\r\x1BSs\r",
                footer: b"\x1BSe\r",
            },
            LanguageTarget::EscPos | LanguageTarget::Pgl => Self::EMPTY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.footer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelGrid;

    #[test]
    fn dispatch_matches_direct_encoding() {
        let grid = PixelGrid::from_fn(12, 30, |x, y| (x + y) % 5 == 0).unwrap();
        let view = grid.view();
        let pairs: Vec<(MonoEncoder, EncodedCommand)> = vec![
            (MonoEncoder::GsV0(GsV0), GsV0.encode(&view).unwrap()),
            (MonoEncoder::GsL(GsL), GsL.encode(&view).unwrap()),
            (
                MonoEncoder::EscAsterisk(EscAsterisk::new(1, true)),
                EscAsterisk::new(1, true).encode(&view).unwrap(),
            ),
            (MonoEncoder::Zpl(ZplGraphic), ZplGraphic.encode(&view).unwrap()),
        ];
        for (mono, direct) in pairs {
            assert_eq!(mono.encode(&view).unwrap(), direct, "{}", mono.encoding());
        }
    }

    #[test]
    fn frames_per_language() {
        assert_eq!(LabelFrame::for_language(LanguageTarget::Zpl).header, b"^XA\n");
        assert_eq!(LabelFrame::for_language(LanguageTarget::Epl).footer, b"P1,1\n");
        assert!(LabelFrame::for_language(LanguageTarget::EscPos).is_empty());
        assert!(LabelFrame::for_language(LanguageTarget::Evolis).footer.ends_with(b"Se\r"));
    }
}
