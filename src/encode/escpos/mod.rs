//! ESC/POS bit-image encoders.
//!
//! - `esc_asterisk` - `ESC *` column-format passes, with optional impact-head striping
//! - `gs_l` - `GS ( L` store-then-print raster graphics, 24-row chunks
//! - `gs_v0` - `GS v 0` raster bit images, 24-row chunks

pub mod esc_asterisk;
pub mod gs_l;
pub mod gs_v0;

pub use esc_asterisk::EscAsterisk;
pub use gs_l::GsL;
pub use gs_v0::GsV0;

pub(crate) const ESC: u8 = 0x1B;
pub(crate) const GS: u8 = 0x1D;

/// Rows per raster chunk, sized to the print buffer of common receipt heads.
pub const CHUNK_ROWS: usize = 24;

pub const DEFAULT_DOT_DENSITY: i32 = 32;

/// Resolves a `dotDensity` option given as text.
///
/// Named densities map to their `ESC *` mode, a negative value selects
/// legacy line-spacing mode. Anything unrecognised yields `None`.
pub fn parse_dot_density(input: &str) -> Option<i32> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "single" => Some(32),
        "double" => Some(33),
        "triple" => Some(39),
        "single-legacy" => Some(-32),
        "double-legacy" => Some(-33),
        _ => input.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_names_and_numbers() {
        assert_eq!(parse_dot_density("single"), Some(32));
        assert_eq!(parse_dot_density("Double"), Some(33));
        assert_eq!(parse_dot_density("triple"), Some(39));
        assert_eq!(parse_dot_density("double-legacy"), Some(-33));
        assert_eq!(parse_dot_density(" 1 "), Some(1));
        assert_eq!(parse_dot_density("quadruple"), None);
        assert_eq!(parse_dot_density(""), None);
    }
}
