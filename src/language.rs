//! Printer languages and their raster requirements.
//!
//! [`LanguageTarget`] is the closed set of command languages the codec can
//! emit. Each language's policy flags live in a [`LanguageCaps`] record, and
//! the process-wide table of those records is a [`LanguageRegistry`]. Build
//! the registry once at startup (optionally applying overrides from an
//! external configuration) and share it by reference afterwards; it has no
//! interior mutability.

use crate::utils::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A printer command language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LanguageTarget {
    /// Zebra Programming Language.
    Zpl,
    /// Eltron Programming Language.
    Epl,
    /// Comtec Printer Control Language.
    Cpcl,
    /// Epson ESC/POS and its ESC/P relatives.
    EscPos,
    /// Evolis card printers (color ribbons).
    Evolis,
    /// SATO Barcode Printer Language.
    Sbpl,
    /// Printronix Graphics Language.
    Pgl,
}

/// Which converter family a language is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    Mono,
    Color,
}

/// The concrete encoders available across all languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageEncoding {
    EscAsterisk,
    GsL,
    GsV0,
    Zpl,
    Epl,
    Cpcl,
    Sbpl,
    Pgl,
    Evolis,
}

impl ImageEncoding {
    pub fn name(self) -> &'static str {
        match self {
            ImageEncoding::EscAsterisk => "ESC_ASTERISK",
            ImageEncoding::GsL => "GS_L",
            ImageEncoding::GsV0 => "GS_V_0",
            ImageEncoding::Zpl => "ZPL",
            ImageEncoding::Epl => "EPL",
            ImageEncoding::Cpcl => "CPCL",
            ImageEncoding::Sbpl => "SBPL",
            ImageEncoding::Pgl => "PGL",
            ImageEncoding::Evolis => "EVOLIS",
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl LanguageTarget {
    pub const ALL: [LanguageTarget; 7] = [
        LanguageTarget::Zpl,
        LanguageTarget::Epl,
        LanguageTarget::Cpcl,
        LanguageTarget::EscPos,
        LanguageTarget::Evolis,
        LanguageTarget::Sbpl,
        LanguageTarget::Pgl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LanguageTarget::Zpl => "ZPL",
            LanguageTarget::Epl => "EPL",
            LanguageTarget::Cpcl => "CPCL",
            LanguageTarget::EscPos => "ESCPOS",
            LanguageTarget::Evolis => "EVOLIS",
            LanguageTarget::Sbpl => "SBPL",
            LanguageTarget::Pgl => "PGL",
        }
    }

    /// Alternate names accepted by [`LanguageTarget::lookup`].
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LanguageTarget::Zpl => &["ZPL2", "ZPLII", "ZEBRA"],
            LanguageTarget::Epl => &["EPL2", "EPLII"],
            LanguageTarget::Cpcl => &[],
            LanguageTarget::EscPos => &[
                "ESCP", "ESCP2", "ESC", "ESC/P", "ESC/P2", "ESCP/P2", "ESC/POS", "ESC\\P", "EPSON",
            ],
            LanguageTarget::Evolis => &[],
            LanguageTarget::Sbpl => &["SATO"],
            LanguageTarget::Pgl => &["PRINTRONIX", "IGP"],
        }
    }

    /// Case-insensitive lookup by name or alias.
    pub fn lookup(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.name().eq_ignore_ascii_case(input)
                || lang.aliases().iter().any(|a| a.eq_ignore_ascii_case(input))
        })
    }

    /// Like [`lookup`](Self::lookup), failing with `UnsupportedLanguage`.
    pub fn parse(input: &str) -> Result<Self> {
        Self::lookup(input).ok_or_else(|| CodecError::unsupported_language(input.trim(), "any"))
    }

    pub fn converter_kind(self) -> ConverterKind {
        match self {
            LanguageTarget::Evolis => ConverterKind::Color,
            _ => ConverterKind::Mono,
        }
    }

    /// Encoders this language can be rendered with; the first is the default.
    pub fn encodings(self) -> &'static [ImageEncoding] {
        match self {
            LanguageTarget::EscPos => &[
                ImageEncoding::EscAsterisk,
                ImageEncoding::GsL,
                ImageEncoding::GsV0,
            ],
            LanguageTarget::Zpl => &[ImageEncoding::Zpl],
            LanguageTarget::Epl => &[ImageEncoding::Epl],
            LanguageTarget::Cpcl => &[ImageEncoding::Cpcl],
            LanguageTarget::Sbpl => &[ImageEncoding::Sbpl],
            LanguageTarget::Pgl => &[ImageEncoding::Pgl],
            LanguageTarget::Evolis => &[ImageEncoding::Evolis],
        }
    }

    pub fn default_encoding(self) -> ImageEncoding {
        self.encodings()[0]
    }

    /// Built-in raster requirements for this language.
    pub const fn default_caps(self) -> LanguageCaps {
        match self {
            LanguageTarget::Zpl => LanguageCaps::new(false, true, 203),
            LanguageTarget::Epl => LanguageCaps::new(true, true, 203),
            LanguageTarget::Cpcl => LanguageCaps::new(false, true, 203),
            LanguageTarget::EscPos => LanguageCaps::new(false, false, 180),
            LanguageTarget::Evolis => LanguageCaps::new(false, false, 300),
            LanguageTarget::Sbpl => LanguageCaps::new(false, true, 203),
            LanguageTarget::Pgl => LanguageCaps::new(false, false, 203),
        }
    }
}

impl fmt::Display for LanguageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageTarget {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Raster requirements of one printer language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCaps {
    /// The firmware reads bit 0 as ink and bit 1 as paper.
    pub requires_inverted_polarity: bool,
    /// Rows must be a whole number of bytes; narrower images are padded.
    pub requires_width_multiple_of_8: bool,
    /// Default print density in dots per inch.
    pub default_dpi: u32,
}

impl LanguageCaps {
    pub const fn new(
        requires_inverted_polarity: bool,
        requires_width_multiple_of_8: bool,
        default_dpi: u32,
    ) -> Self {
        LanguageCaps {
            requires_inverted_polarity,
            requires_width_multiple_of_8,
            default_dpi,
        }
    }
}

/// Per-language capability table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    caps: HashMap<LanguageTarget, LanguageCaps>,
}

impl LanguageRegistry {
    /// The built-in table.
    pub fn builtin() -> Self {
        let caps = LanguageTarget::ALL
            .into_iter()
            .map(|lang| (lang, lang.default_caps()))
            .collect();
        LanguageRegistry { caps }
    }

    /// The built-in table with entries replaced by a JSON object keyed by
    /// language name or alias, e.g.
    /// `{"EPL": {"requires_inverted_polarity": false, "requires_width_multiple_of_8": true, "default_dpi": 300}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: HashMap<String, LanguageCaps> = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidArg(format!("language table: {}", e)))?;
        let mut registry = Self::builtin();
        for (name, caps) in overrides {
            let lang = LanguageTarget::parse(&name)?;
            registry = registry.with_caps(lang, caps);
        }
        Ok(registry)
    }

    /// Replaces the capabilities of one language.
    pub fn with_caps(mut self, lang: LanguageTarget, caps: LanguageCaps) -> Self {
        log::debug!("Language {} capabilities set to {:?}", lang, caps);
        self.caps.insert(lang, caps);
        self
    }

    pub fn caps(&self, lang: LanguageTarget) -> LanguageCaps {
        self.caps
            .get(&lang)
            .copied()
            .unwrap_or_else(|| lang.default_caps())
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
