// src/encode/pgl.rs

//! Printronix PGL/IGP logo definition.
//!
//! Unlike the other languages the payload is not a bitmap but a list of
//! horizontal ink runs per row:
//!
//! ```text
//! ~LOGO;<id>;<height>;<width>;DOT;
//! 1;1-12;19-22;38
//! ...
//! END
//! ```
//!
//! Rows and columns are 1-based and runs are inclusive. Rows without ink are
//! omitted. `DOT;` selects the printer's native resolution; IGP dot mode
//! drops it and limits the logo to 240x252.

use crate::command::CommandBuilder;
use crate::encode::RasterEncoder;
use crate::image::GridView;
use crate::utils::error::{CodecError, Result};
use bitvec::prelude::*;

pub const IGP_MAX_WIDTH: usize = 240;
pub const IGP_MAX_HEIGHT: usize = 252;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PglLogo {
    logo_id: String,
    igp_dots: bool,
}

impl PglLogo {
    pub fn new(logo_id: impl Into<String>, igp_dots: bool) -> Self {
        PglLogo {
            logo_id: logo_id.into(),
            igp_dots,
        }
    }

    pub fn logo_id(&self) -> &str {
        &self.logo_id
    }

    pub fn igp_dots(&self) -> bool {
        self.igp_dots
    }
}

/// Inclusive 1-based column ranges of the set bits in `row`.
fn ink_runs(row: &BitSlice<u8, Msb0>) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (x, bit) in row.iter().by_vals().enumerate() {
        match (bit, start) {
            (true, None) => start = Some(x + 1),
            (false, Some(s)) => {
                runs.push((s, x));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, row.len()));
    }
    runs
}

impl RasterEncoder for PglLogo {
    fn append_to(&self, grid: &GridView<'_>, out: &mut CommandBuilder) -> Result<()> {
        let (width, height) = (grid.width(), grid.height());
        if self.logo_id.trim().is_empty() {
            return Err(CodecError::invalid_image("Printronix graphics require a logoId"));
        }
        if self.igp_dots && (width > IGP_MAX_WIDTH || height > IGP_MAX_HEIGHT) {
            return Err(CodecError::invalid_image(format!(
                "IGP dots is enabled; logo size {}x{} exceeds {}x{}",
                width, height, IGP_MAX_WIDTH, IGP_MAX_HEIGHT
            )));
        }

        out.append_bytes(b"~LOGO;")
            .append_ascii(&self.logo_id)?
            .append_byte(b';')
            .append_decimal(height as i64)
            .append_byte(b';')
            .append_decimal(width as i64)
            .append_byte(b';');
        if !self.igp_dots {
            out.append_bytes(b"DOT;");
        }
        out.append_byte(b'\n');

        for (y, row) in grid.rows().enumerate() {
            let runs = ink_runs(row);
            if runs.is_empty() {
                continue;
            }
            out.append_decimal(y as i64 + 1);
            for (start, end) in runs {
                out.append_byte(b';').append_decimal(start as i64);
                if end != start {
                    out.append_byte(b'-').append_decimal(end as i64);
                }
            }
            out.append_byte(b'\n');
        }
        out.append_bytes(b"END\n");
        Ok(())
    }
}
