//! A 2D debug image represented as a flat array of RGBA pixels.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Errors from writing a debug image to disk.
#[derive(Debug, thiserror::Error)]
pub enum DebugImageError {
    /// Failed to create the output file.
    #[error("failed to create image file: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("failed to encode png: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// A 2D debug image for terrain visualization, stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct DebugImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Create a new black (all-zero) image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.offset(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds"
        );
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count the number of unique colors (ignoring alpha) in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = hashbrown::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }

    /// Encode the image as an 8-bit RGBA PNG at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DebugImageError`] if the file cannot be created or encoding fails.
    pub fn write_png(&self, path: &Path) -> Result<(), DebugImageError> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_image_correct_dimensions() {
        let image = DebugImage::new(256, 128);
        assert_eq!(image.dimensions(), (256, 128));
        assert_eq!(image.pixels.len(), 256 * 128 * 4);
    }

    #[test]
    fn test_get_pixel_roundtrip() {
        let mut image = DebugImage::new(8, 8);
        image.set_pixel(2, 3, [10, 20, 30, 40]);
        assert_eq!(image.get_pixel(2, 3), [10, 20, 30, 40]);
        assert_eq!(&image.pixels[(3 * 8 + 2) * 4..][..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_unique_color_count() {
        let mut image = DebugImage::new(4, 1);
        image.set_pixel(0, 0, [255, 0, 0, 255]);
        image.set_pixel(1, 0, [0, 255, 0, 255]);
        image.set_pixel(2, 0, [255, 0, 0, 10]); // same color, different alpha
        image.set_pixel(3, 0, [0, 0, 255, 255]);
        assert_eq!(image.unique_color_count(), 3);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        let mut image = DebugImage::new(4, 4);
        image.set_pixel(1, 1, [200, 100, 50, 255]);
        image.write_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_write_png_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("field.png");
        assert!(matches!(
            DebugImage::new(1, 1).write_png(&path),
            Err(DebugImageError::Io(_))
        ));
    }
}
