// src/convert/mod.rs

//! Converter dispatch: from a decoded image and a job's options to the final
//! printer command.
//!
//! ```text
//! RasterImage + ImageOptions
//!     -> LanguageTarget (registry caps)
//!     -> Mono: Preprocessor -> PixelGrid -> MonoEncoder
//!        Color: EvolisEncoder
//!     -> optional label frame
//!     -> EncodedCommand
//! ```
//!
//! Every configuration problem (unknown language, unknown encoder variant,
//! unsupported quantization) is reported when the converter is built,
//! before any pixel work starts.

pub mod options;

pub use options::ImageOptions;

use crate::command::{CommandBuilder, EncodedCommand};
use crate::encode::{
    CpclGraphic, EplGraphic, EscAsterisk, EvolisEncoder, GsL, GsV0, LabelFrame, MonoEncoder,
    PglLogo, RasterEncoder, SbplGraphic, ZplGraphic,
};
use crate::image::{PixelGrid, Preprocessor, RasterImage};
use crate::language::{ConverterKind, ImageEncoding, LanguageRegistry, LanguageTarget};
use crate::utils::error::{CodecError, Result};
use log::{debug, info};

/// Resolves the ESC/POS `imageEncoding` option.
fn escpos_encoding(name: Option<&str>) -> Result<ImageEncoding> {
    let Some(name) = name else {
        return Ok(LanguageTarget::EscPos.default_encoding());
    };
    if name.eq_ignore_ascii_case("DEFAULT") {
        return Ok(LanguageTarget::EscPos.default_encoding());
    }
    LanguageTarget::EscPos
        .encodings()
        .iter()
        .copied()
        .find(|enc| enc.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CodecError::unsupported_language(LanguageTarget::EscPos, name))
}

/// Builds the monochrome encoder `lang` needs for these options.
pub fn select_mono_encoder(lang: LanguageTarget, options: &ImageOptions) -> Result<MonoEncoder> {
    let encoder = match lang {
        LanguageTarget::EscPos => match escpos_encoding(options.image_encoding.as_deref())? {
            ImageEncoding::GsL => MonoEncoder::GsL(GsL),
            ImageEncoding::GsV0 => MonoEncoder::GsV0(GsV0),
            _ => {
                let (density, legacy) = options.effective_dot_density();
                MonoEncoder::EscAsterisk(EscAsterisk::new(density, legacy))
            }
        },
        LanguageTarget::Zpl => MonoEncoder::Zpl(ZplGraphic),
        LanguageTarget::Epl => MonoEncoder::Epl(EplGraphic::new(options.x, options.y)),
        LanguageTarget::Cpcl => MonoEncoder::Cpcl(CpclGraphic::new(options.x, options.y)),
        LanguageTarget::Sbpl => MonoEncoder::Sbpl(SbplGraphic),
        LanguageTarget::Pgl => {
            MonoEncoder::Pgl(PglLogo::new(options.logo_id.clone(), options.igp_dots))
        }
        LanguageTarget::Evolis => {
            return Err(CodecError::unsupported_language(lang, "monochrome"));
        }
    };
    Ok(encoder)
}

/// Monochrome path: the quantized grid and the encoder that will consume it.
#[derive(Debug, Clone)]
pub struct MonoConverter {
    language: LanguageTarget,
    grid: PixelGrid,
    encoder: MonoEncoder,
}

impl MonoConverter {
    pub fn new(
        image: &RasterImage,
        language: LanguageTarget,
        options: &ImageOptions,
        registry: &LanguageRegistry,
    ) -> Result<Self> {
        let encoder = select_mono_encoder(language, options)?;
        let policy = options.quantization.policy()?;
        let grid =
            Preprocessor::new(registry.caps(language), policy, options.threshold).build(image)?;
        Ok(MonoConverter {
            language,
            grid,
            encoder,
        })
    }

    pub fn language(&self) -> LanguageTarget {
        self.language
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn encoder(&self) -> &MonoEncoder {
        &self.encoder
    }

    pub fn append_to(&self, out: &mut CommandBuilder) -> Result<()> {
        self.encoder.append_to(&self.grid.view(), out)
    }
}

/// Color path: the source image is encoded directly.
#[derive(Debug, Clone)]
pub struct ColorConverter<'a> {
    language: LanguageTarget,
    image: &'a RasterImage,
    encoder: EvolisEncoder,
}

impl<'a> ColorConverter<'a> {
    pub fn new(
        image: &'a RasterImage,
        language: LanguageTarget,
        options: &ImageOptions,
    ) -> Result<Self> {
        let encoder = match language {
            LanguageTarget::Evolis => {
                EvolisEncoder::new(options.precision, options.overlay.clone())
            }
            other => return Err(CodecError::unsupported_language(other, "color")),
        };
        Ok(ColorConverter {
            language,
            image,
            encoder,
        })
    }

    pub fn language(&self) -> LanguageTarget {
        self.language
    }

    pub fn encoder(&self) -> &EvolisEncoder {
        &self.encoder
    }

    pub fn append_to(&self, out: &mut CommandBuilder) -> Result<()> {
        self.encoder.append_to(self.image, out)
    }
}

/// A converter ready to produce one image command.
#[derive(Debug, Clone)]
pub enum ImageConverter<'a> {
    Mono(MonoConverter),
    Color(ColorConverter<'a>),
}

impl<'a> ImageConverter<'a> {
    pub fn new(
        image: &'a RasterImage,
        options: &ImageOptions,
        registry: &LanguageRegistry,
    ) -> Result<Self> {
        let language = match options.language.as_deref() {
            Some(name) => LanguageTarget::parse(name)?,
            None => return Err(CodecError::unsupported_language("(none)", "any")),
        };
        match language.converter_kind() {
            ConverterKind::Mono => Ok(ImageConverter::Mono(MonoConverter::new(
                image, language, options, registry,
            )?)),
            ConverterKind::Color => Ok(ImageConverter::Color(ColorConverter::new(
                image, language, options,
            )?)),
        }
    }

    pub fn language(&self) -> LanguageTarget {
        match self {
            ImageConverter::Mono(conv) => conv.language(),
            ImageConverter::Color(conv) => conv.language(),
        }
    }

    pub fn kind(&self) -> ConverterKind {
        match self {
            ImageConverter::Mono(_) => ConverterKind::Mono,
            ImageConverter::Color(_) => ConverterKind::Color,
        }
    }

    /// Appends the image command, without any label frame.
    pub fn append_to(&self, out: &mut CommandBuilder) -> Result<()> {
        match self {
            ImageConverter::Mono(conv) => conv.append_to(out),
            ImageConverter::Color(conv) => conv.append_to(out),
        }
    }

    /// Produces the finished command, wrapped in the language's label frame
    /// when `framed` is set.
    pub fn image_command(&self, framed: bool) -> Result<EncodedCommand> {
        let frame = LabelFrame::for_language(self.language());
        let mut out = CommandBuilder::new();
        if framed {
            out.append_bytes(frame.header);
        }
        self.append_to(&mut out)?;
        if framed {
            out.append_bytes(frame.footer);
        }
        Ok(out.finish())
    }
}

/// Entry point holding the shared language table.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'r> {
    registry: &'r LanguageRegistry,
}

impl<'r> Converter<'r> {
    pub fn new(registry: &'r LanguageRegistry) -> Self {
        Converter { registry }
    }

    pub fn registry(&self) -> &'r LanguageRegistry {
        self.registry
    }

    /// Converts one image.
    pub fn convert(&self, image: &RasterImage, options: &ImageOptions) -> Result<EncodedCommand> {
        let converter = ImageConverter::new(image, options, self.registry)?;
        info!(
            "Converting {}x{} image to {} ({:?})",
            image.width(),
            image.height(),
            converter.language(),
            converter.kind()
        );
        let command = converter.image_command(options.frame)?;
        debug!("Produced {} command bytes", command.len());
        Ok(command)
    }

    /// Converts independent jobs, in parallel when the `rayon` feature is
    /// enabled. Results are in job order.
    pub fn convert_batch(
        &self,
        jobs: &[(&RasterImage, &ImageOptions)],
    ) -> Vec<Result<EncodedCommand>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            jobs.par_iter()
                .map(|(image, options)| self.convert(image, options))
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            jobs.iter()
                .map(|(image, options)| self.convert(image, options))
                .collect()
        }
    }
}
