use crate::AssetError;

/// How texel values should be interpreted by the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Display-referred sRGB color data; sampling converts to linear.
    #[default]
    Srgb,
    /// Raw linear data.
    Linear,
}

/// A decoded matcap texture, tightly packed RGBA8 rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcapImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub color_space: ColorSpace,
}

impl MatcapImage {
    /// Decode a PNG or JPEG matcap. Matcaps are color textures, so the
    /// result is tagged sRGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
            color_space: ColorSpace::Srgb,
        })
    }

    /// A single-texel texture of one color, used while the real image loads.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
            color_space: ColorSpace::Srgb,
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_png() {
        let bytes = png_bytes(4, 2, [10, 20, 30, 255]);
        let image = MatcapImage::decode(&bytes).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
        assert_eq!(image.color_space, ColorSpace::Srgb);
        assert_eq!(image.bytes_per_row(), 16);
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(matches!(
            MatcapImage::decode(b"not an image"),
            Err(AssetError::Image(_))
        ));
    }

    #[test]
    fn solid_is_one_texel() {
        let image = MatcapImage::solid([1, 2, 3, 4]);
        assert_eq!(image.rgba, vec![1, 2, 3, 4]);
        assert_eq!(image.bytes_per_row(), 4);
    }
}
