use image::{Rgba, RgbaImage};
use rastercmd::encode::{EscAsterisk, GsL, GsV0, RasterEncoder};
use rastercmd::{
    CodecError, Converter, ImageOptions, LanguageRegistry, PixelGrid, Quantization, RasterImage,
};
use serde_json::json;

fn raster(img: &RgbaImage) -> RasterImage {
    RasterImage::from_rgba_bytes(img.width(), img.height(), img.as_raw())
        .expect("Failed to wrap fixture")
}

fn solid(width: u32, height: u32, color: [u8; 4]) -> RasterImage {
    raster(&RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn convert(image: &RasterImage, options: serde_json::Value) -> rastercmd::Result<Vec<u8>> {
    let registry = LanguageRegistry::builtin();
    let options = ImageOptions::from_json(&options)?;
    Ok(Converter::new(&registry).convert(image, &options)?.into_vec())
}

#[test]
fn test_gs_v0_black_square() {
    let image = solid(8, 8, [0, 0, 0, 255]);
    let bytes = convert(
        &image,
        json!({"language": "ESCPOS", "imageEncoding": "GS_V_0", "quantization": "BLACK"}),
    )
    .expect("Failed to convert");

    let mut expected = vec![0x1D, b'v', b'0', 0x00, 0x01, 0x00, 0x08, 0x00];
    expected.extend_from_slice(&[0xFF; 8]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_encoding_is_idempotent() {
    let mut img = RgbaImage::new(37, 53);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let v = ((x * 7 + y * 13) % 256) as u8;
        *px = Rgba([v, v, v, 255]);
    }
    let image = raster(&img);
    for encoding in ["ESC_ASTERISK", "GS_L", "GS_V_0"] {
        let options = json!({"language": "ESCPOS", "imageEncoding": encoding});
        let first = convert(&image, options.clone()).expect("Failed to convert");
        let second = convert(&image, options).expect("Failed to convert");
        assert_eq!(first, second, "{} output differs between runs", encoding);
    }
}

#[test]
fn test_row_padding_is_zero() {
    let grid = PixelGrid::from_fn(10, 5, |_, _| true).unwrap();
    let bytes = GsV0.encode(&grid.view()).unwrap().into_vec();
    assert_eq!(&bytes[4..6], &[2, 0]);
    for row in bytes[8..].chunks(2) {
        assert_eq!(row, &[0xFF, 0xC0]);
    }
}

#[test]
fn test_thirty_rows_split_in_two_chunks() {
    let grid = PixelGrid::from_fn(8, 30, |_, _| false).unwrap();

    let v0 = GsV0.encode(&grid.view()).unwrap().into_vec();
    let headers: Vec<_> = v0
        .windows(4)
        .enumerate()
        .filter(|(_, w)| *w == [0x1D, b'v', b'0', 0x00])
        .map(|(i, _)| i)
        .collect();
    assert_eq!(headers, vec![0, 8 + 24]);
    assert_eq!(&v0[6..8], &[24, 0]);
    assert_eq!(&v0[32 + 6..32 + 8], &[6, 0]);

    let gs_l = GsL.encode(&grid.view()).unwrap().into_vec();
    let stores = gs_l
        .windows(5)
        .filter(|w| w[..3] == [0x1D, b'(', b'L'] && w[3] != 0x02)
        .count();
    let prints = gs_l
        .windows(7)
        .filter(|w| *w == [0x1D, b'(', b'L', 0x02, 0x00, 0x30, 0x32])
        .count();
    assert_eq!((stores, prints), (2, 2));
}

#[test]
fn test_striping_pass_count() {
    let grid = PixelGrid::from_fn(3, 8, |_, _| false).unwrap();
    let count = |density: u8| {
        let bytes = EscAsterisk::new(density, false).encode(&grid.view()).unwrap().into_vec();
        bytes.windows(3).filter(|w| *w == [0x1B, b'*', density]).count()
    };
    assert_eq!(count(1), 2);
    assert_eq!(count(32), 1);
}

#[test]
fn test_esc_asterisk_from_options() {
    let image = solid(2, 24, [0, 0, 0, 255]);
    let bytes = convert(&image, json!({"language": "epson", "dotDensity": "double"}))
        .expect("Failed to convert");
    assert_eq!(&bytes[..5], &[0x1B, b'*', 33, 2, 0]);
    assert_eq!(&bytes[5..11], &[0xFF; 6]);
    assert_eq!(&bytes[11..], &[0x1B, b'J', 24]);

    let legacy = convert(&image, json!({"language": "ESCPOS", "dotDensity": "single-legacy"}))
        .expect("Failed to convert");
    assert_eq!(&legacy[..3], &[0x1B, b'3', 24]);
    assert_eq!(&legacy[3..6], &[0x1B, b'*', 32]);
    assert!(legacy.ends_with(&[b'\n', 0x1B, b'3', 30]));
}

#[test]
fn test_luma_boundary() {
    // luma of (100, 100, 100) is exactly 100
    let image = solid(8, 1, [100, 100, 100, 255]);
    let at = |threshold: i32| {
        convert(
            &image,
            json!({"language": "ESCPOS", "imageEncoding": "GS_V_0", "threshold": threshold}),
        )
        .expect("Failed to convert")[8]
    };
    assert_eq!(at(100), 0x00, "luma == threshold is white");
    assert_eq!(at(101), 0xFF, "luma == threshold - 1 is ink");
}

#[test]
fn test_transparent_pixels_are_white_under_luma() {
    let image = solid(8, 1, [0, 0, 0, 10]);
    let bytes = convert(&image, json!({"language": "ESCPOS", "imageEncoding": "GS_V_0"}))
        .expect("Failed to convert");
    assert_eq!(bytes[8], 0x00);

    let alpha = convert(
        &image,
        json!({"language": "ESCPOS", "imageEncoding": "GS_V_0", "quantization": "ALPHA", "threshold": 5}),
    )
    .expect("Failed to convert");
    assert_eq!(alpha[8], 0xFF);
}

#[test]
fn test_unknown_variant_names_language_and_variant() {
    let image = solid(8, 8, [0, 0, 0, 255]);
    let err = convert(&image, json!({"language": "ESCPOS", "imageEncoding": "GS_Q"})).unwrap_err();
    match err {
        CodecError::UnsupportedLanguage { language, variant } => {
            assert_eq!(language, "ESCPOS");
            assert_eq!(variant, "GS_Q");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_dither_is_rejected_at_configuration() {
    let image = solid(8, 8, [0, 0, 0, 255]);
    let options = ImageOptions::for_language("ESCPOS").with_quantization(Quantization::Dither);
    let registry = LanguageRegistry::builtin();
    let err = Converter::new(&registry).convert(&image, &options).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedPolicy(_)));
}
