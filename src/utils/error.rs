// src/utils/error.rs

//! Error type shared by every stage of the raster-to-command pipeline.
//!
//! All failures are local and synchronous. Nothing in the crate retries or
//! falls back to a "best effort" byte stream: a job either produces the exact
//! bytes the printer expects or returns one of these errors.

use thiserror::Error;

/// Boxed cause attached to [`CodecError::InvalidRawImage`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The primary error type for all operations in this crate.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The requested language, or the requested encoder variant of a
    /// language, has no implementation.
    #[error("{language} image conversion is not supported (variant: {variant})")]
    UnsupportedLanguage { language: String, variant: String },

    /// The requested quantization kind is unknown or needs an external
    /// algorithm that was not supplied.
    #[error("Image quantization {0} is not supported")]
    UnsupportedPolicy(String),

    /// A value could not be represented in the target byte form.
    #[error("Encoding error: {0} cannot be represented in the target command")]
    EncodingError(String),

    /// Generic image conversion failure, optionally wrapping its cause.
    #[error("Invalid raw image: {message}")]
    InvalidRawImage {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    /// An invalid argument was provided by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArg(String),
}

impl CodecError {
    pub fn unsupported_language(language: impl ToString, variant: impl ToString) -> Self {
        CodecError::UnsupportedLanguage {
            language: language.to_string(),
            variant: variant.to_string(),
        }
    }

    /// An `InvalidRawImage` with no underlying cause.
    pub fn invalid_image(message: impl Into<String>) -> Self {
        CodecError::InvalidRawImage {
            message: message.into(),
            source: None,
        }
    }

    /// An `InvalidRawImage` wrapping `cause`.
    pub fn invalid_image_from<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        CodecError::InvalidRawImage {
            message: message.into(),
            source: Some(cause.into()),
        }
    }
}

// I/O only happens while reading image files or overlay masks, so it is
// reported as an image conversion failure.
impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::invalid_image_from(err.to_string(), err)
    }
}

#[cfg(feature = "image")]
impl From<::image::ImageError> for CodecError {
    fn from(err: ::image::ImageError) -> Self {
        CodecError::invalid_image_from(format!("failed to decode image: {}", err), err)
    }
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn unsupported_language_names_language_and_variant() {
        let err = CodecError::unsupported_language("ESCPOS", "GS_Q");
        let msg = err.to_string();
        assert!(msg.contains("ESCPOS"));
        assert!(msg.contains("GS_Q"));
    }

    #[test]
    fn io_errors_keep_their_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "mask.png");
        let err: CodecError = io.into();
        assert!(matches!(err, CodecError::InvalidRawImage { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn plain_invalid_image_has_no_source() {
        let err = CodecError::invalid_image("Printronix graphics require a logoId");
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "Invalid raw image: Printronix graphics require a logoId"
        );
    }
}
