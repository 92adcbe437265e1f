//! Converts decoded bitmaps into the raw command streams thermal, label and
//! card printers understand.
//!
//! Printer firmwares do not take images; they take small binary command
//! languages, each with its own framing, bit polarity, row padding and chunk
//! limits. This crate turns a [`RasterImage`] into the exact bytes for one
//! of those languages.
//!
//! # Quick Start
//!
//! ```ignore
//! use rastercmd::{Converter, ImageOptions, LanguageRegistry, RasterImage};
//!
//! // Build the capability table once and share it
//! let registry = LanguageRegistry::builtin();
//! let converter = Converter::new(&registry);
//!
//! let image = RasterImage::open("logo.png")?;   // `image` feature
//! let options = ImageOptions::from_json_str(
//!     r#"{"language": "ESCPOS", "imageEncoding": "GS_V_0", "quantization": "BLACK"}"#,
//! )?;
//! let bytes = converter.convert(&image, &options)?;
//! printer.write_all(bytes.as_bytes())?;
//! ```
//!
//! # Pipeline
//!
//! 1. **Quantization**: an [`InkPolicy`] decides per pixel whether it is ink
//! 2. **Preprocessing**: width padding and polarity inversion produce a [`PixelGrid`]
//! 3. **Encoding**: a [`MonoEncoder`] (or the Evolis color encoder) writes the command
//!
//! # Features
//!
//! - **`rayon`**: parallel [`Converter::convert_batch`]
//! - **`image`**: decode image files into [`RasterImage`], needed for overlay mask paths

// Core modules
pub mod command;
pub mod convert;
pub mod encode;
pub mod image;
pub mod language;
pub mod utils;

// Entry points
pub use convert::{Converter, ImageConverter, ImageOptions};

// Building blocks
pub use command::{CommandBuilder, EncodedCommand};
pub use encode::{MonoEncoder, RasterEncoder};
pub use image::{GridView, InkPolicy, Pixel, PixelGrid, Quantization, RasterImage};
pub use language::{LanguageCaps, LanguageRegistry, LanguageTarget};

// Error types
pub use utils::error::{CodecError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_round() {
        let registry = LanguageRegistry::builtin();
        let image = RasterImage::from_pixel(8, 8, Pixel::black()).unwrap();
        let options = ImageOptions::for_language("ESCPOS")
            .with_image_encoding("GS_V_0")
            .with_quantization(Quantization::Black);
        let bytes = Converter::new(&registry).convert(&image, &options).unwrap();
        assert_eq!(&bytes.as_bytes()[..8], &[0x1D, b'v', b'0', 0x00, 0x01, 0x00, 0x08, 0x00]);
        assert_eq!(&bytes.as_bytes()[8..], &[0xFF; 8]);
    }

    #[test]
    fn test_every_language_converts() -> Result<()> {
        let registry = LanguageRegistry::builtin();
        let converter = Converter::new(&registry);
        let image = RasterImage::from_fn(12, 5, |x, y| {
            if (x + y) % 3 == 0 { Pixel::black() } else { Pixel::white() }
        })?;
        for lang in LanguageTarget::ALL {
            let options = ImageOptions::for_language(lang.name()).with_logo("L1", false);
            let bytes = converter.convert(&image, &options)?;
            assert!(!bytes.is_empty(), "{} produced no bytes", lang);
        }
        Ok(())
    }
}
