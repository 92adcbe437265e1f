//! Turns a [`RasterImage`] into the [`PixelGrid`] a language expects.
//!
//! Three steps, in order:
//! 1. width padding: languages that need byte-aligned rows get the canvas
//!    extended on the right with transparent pixels up to a multiple of 8;
//! 2. quantization of every pixel through an [`InkPolicy`];
//! 3. polarity: the stored bit is `inverted XOR ink`.

use crate::image::pixel_grid::PixelGrid;
use crate::image::quantize::InkPolicy;
use crate::image::raster::{Pixel, RasterImage};
use crate::language::LanguageCaps;
use crate::utils::error::Result;
use log::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct Preprocessor<'p> {
    caps: LanguageCaps,
    policy: &'p dyn InkPolicy,
    threshold: i32,
}

impl<'p> Preprocessor<'p> {
    pub fn new(caps: LanguageCaps, policy: &'p dyn InkPolicy, threshold: i32) -> Self {
        Preprocessor {
            caps,
            policy,
            threshold,
        }
    }

    /// Grid width after any padding the language requires.
    pub fn output_width(&self, image: &RasterImage) -> usize {
        let width = image.width() as usize;
        if self.caps.requires_width_multiple_of_8 {
            width.next_multiple_of(8)
        } else {
            width
        }
    }

    pub fn build(&self, image: &RasterImage) -> Result<PixelGrid> {
        let (src_width, height) = (image.width() as usize, image.height() as usize);
        let width = self.output_width(image);
        if width != src_width {
            info!(
                "Language requires image width a multiple of 8, padding {} to {}",
                src_width, width
            );
        }

        debug!(
            "Converting image to monochrome ({:?}, threshold {})",
            self.policy.kind(),
            self.threshold
        );
        let invert = self.caps.requires_inverted_polarity;
        let pixels = image.pixels();
        PixelGrid::from_fn(width, height, |x, y| {
            let pixel = if x < src_width {
                pixels[y * src_width + x]
            } else {
                Pixel::TRANSPARENT
            };
            invert != self.policy.is_ink(pixel, self.threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::quantize::Quantization;
    use crate::language::LanguageTarget;

    fn checkerboard(width: u32, height: u32) -> RasterImage {
        RasterImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Pixel::black()
            } else {
                Pixel::white()
            }
        })
        .unwrap()
    }

    #[test]
    fn pads_narrow_images_with_white() {
        let image = RasterImage::from_pixel(5, 3, Pixel::black()).unwrap();
        let policy = Quantization::Black.policy().unwrap();
        let pre = Preprocessor::new(LanguageTarget::Zpl.default_caps(), policy, 127);
        let grid = pre.build(&image).unwrap();
        assert_eq!((grid.width(), grid.height()), (8, 3));
        for y in 0..3 {
            for x in 0..5 {
                assert!(grid.get(x, y));
            }
            for x in 5..8 {
                assert!(!grid.get(x, y), "padding at ({}, {}) must be white", x, y);
            }
        }
    }

    #[test]
    fn leaves_width_alone_when_not_required() {
        let image = RasterImage::from_pixel(5, 1, Pixel::black()).unwrap();
        let policy = Quantization::Black.policy().unwrap();
        let pre = Preprocessor::new(LanguageTarget::EscPos.default_caps(), policy, 127);
        assert_eq!(pre.build(&image).unwrap().width(), 5);
    }

    #[test]
    fn inversion_complements_every_bit() {
        let image = checkerboard(13, 7);
        let policy = Quantization::Luma.policy().unwrap();
        let plain = Preprocessor::new(LanguageCaps::new(false, true, 203), policy, 127)
            .build(&image)
            .unwrap();
        let inverted = Preprocessor::new(LanguageCaps::new(true, true, 203), policy, 127)
            .build(&image)
            .unwrap();
        assert_eq!(plain.size(), inverted.size());
        for (a, b) in plain.bits().iter().zip(inverted.bits().iter()) {
            assert_ne!(*a, *b);
        }
    }

    #[test]
    fn threshold_is_forwarded_to_policy() {
        let image = RasterImage::from_pixel(8, 1, Pixel::rgb(100, 100, 100)).unwrap();
        let policy = Quantization::Luma.policy().unwrap();
        let caps = LanguageTarget::EscPos.default_caps();
        assert!(!Preprocessor::new(caps, policy, 100).build(&image).unwrap().get(0, 0));
        assert!(Preprocessor::new(caps, policy, 101).build(&image).unwrap().get(0, 0));
    }
}
