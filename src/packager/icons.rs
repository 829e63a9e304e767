//! Icon derivation: fixed-size square PNG variants

use crate::error::{Result, WizardError};
use crate::models::ICON_PATHS;
use crate::utils::helpers::strip_data_uri;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Fill colour of placeholder icons
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0x7c, 0x3a, 0xed, 0xff]);

pub const PLACEHOLDER_NOTE_PATH: &str = "icons/README.md";

pub const PLACEHOLDER_NOTE: &str = "The icons in this folder are placeholders. \
Replace them with your own 16x16, 48x48 and 128x128 pixel PNG images before publishing the extension.";

/// One packaged icon variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIcon {
    pub size: u32,
    pub path: &'static str,
    /// PNG data, base64 without a data URI header
    pub png_base64: String,
}

/// Stretch `image` onto a `size` x `size` canvas and encode it as PNG.
/// Aspect ratio is not preserved.
pub fn resize(image: &DynamicImage, size: u32) -> Result<String> {
    let scaled = image.resize_exact(size, size, FilterType::Triangle);
    encode_png(&DynamicImage::ImageRgba8(scaled.to_rgba8()))
}

/// Decode a source image in any supported format and derive every icon size
pub fn derive_icons(source: &[u8]) -> Result<Vec<DerivedIcon>> {
    let image = image::load_from_memory(source)?;
    ICON_PATHS
        .iter()
        .map(|&(size, path)| {
            Ok(DerivedIcon {
                size,
                path,
                png_base64: resize(&image, size)?,
            })
        })
        .collect()
}

/// Derive icons from base64 image data, as returned by an icon generator
pub fn derive_icons_from_base64(data: &str) -> Result<Vec<DerivedIcon>> {
    let bytes = decode_base64(data)
        .map_err(|reason| WizardError::invalid_entry("generated icon", reason))?;
    if bytes.is_empty() {
        return Err(WizardError::invalid_entry("generated icon", "no image data"));
    }
    derive_icons(&bytes)
}

/// Solid-colour icons for extensions that ship without any
pub fn placeholder_icons() -> Result<Vec<DerivedIcon>> {
    ICON_PATHS
        .iter()
        .map(|&(size, path)| {
            let canvas = RgbaImage::from_pixel(size, size, PLACEHOLDER_COLOR);
            Ok(DerivedIcon {
                size,
                path,
                png_base64: encode_png(&DynamicImage::ImageRgba8(canvas))?,
            })
        })
        .collect()
}

/// Decode base64, tolerating a data URI header and surrounding whitespace
pub fn decode_base64(data: &str) -> std::result::Result<Vec<u8>, String> {
    BASE64
        .decode(strip_data_uri(data.trim()))
        .map_err(|e| format!("invalid base64 content: {}", e))
}

fn encode_png(image: &DynamicImage) -> Result<String> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(BASE64.encode(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn dimensions(png_base64: &str) -> (u32, u32) {
        let bytes = BASE64.decode(png_base64).unwrap();
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        (image.width(), image.height())
    }

    #[test]
    fn test_derive_icons_is_square_and_stretched() {
        let icons = derive_icons(&sample_png(300, 100)).unwrap();

        let sizes: Vec<u32> = icons.iter().map(|i| i.size).collect();
        assert_eq!(sizes, vec![16, 48, 128]);
        for icon in &icons {
            assert_eq!(dimensions(&icon.png_base64), (icon.size, icon.size));
        }
        assert_eq!(icons[0].path, "icons/icon16.png");
    }

    #[test]
    fn test_derive_icons_from_data_uri() {
        let encoded = format!("data:image/png;base64,{}", BASE64.encode(sample_png(10, 10)));
        let icons = derive_icons_from_base64(&encoded).unwrap();
        assert_eq!(icons.len(), 3);
    }

    #[test]
    fn test_derive_icons_rejects_garbage() {
        assert!(derive_icons(b"not an image").is_err());
        assert!(derive_icons_from_base64("").is_err());
        assert!(derive_icons_from_base64("%%%").is_err());
    }

    #[test]
    fn test_placeholders_are_deterministic() {
        let first = placeholder_icons().unwrap();
        let second = placeholder_icons().unwrap();
        assert_eq!(first, second);
        assert_eq!(dimensions(&first[2].png_base64), (128, 128));
    }
}
