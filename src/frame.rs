use crate::error::{CamspriteError, CamspriteResult};

/// Sprite/texture dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated non-degenerate canvas.
    pub fn new(width: u32, height: u32) -> CamspriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(CamspriteError::validation(
                "Canvas width and height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width / height as `f64`.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Byte length of a row-major RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully opaque color from r/g/b.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channel array in memory order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Owned row-major RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub rgba8: Vec<u8>,
}

impl FrameRgba {
    /// Allocate a zeroed (transparent black) buffer.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8: vec![0u8; canvas.byte_len()],
        }
    }

    /// Wrap existing pixel bytes, validating the length.
    pub fn from_pixels(canvas: Canvas, rgba8: Vec<u8>) -> CamspriteResult<Self> {
        if rgba8.len() != canvas.byte_len() {
            return Err(CamspriteError::validation(format!(
                "pixel buffer has {} bytes, expected {}",
                rgba8.len(),
                canvas.byte_len()
            )));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            rgba8,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: Rgba8) {
        for px in self.rgba8.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Read one pixel. Out-of-bounds coordinates return `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) as usize) * 4;
        Some(Rgba8 {
            r: self.rgba8[i],
            g: self.rgba8[i + 1],
            b: self.rgba8[i + 2],
            a: self.rgba8[i + 3],
        })
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) as usize) * 4;
        self.rgba8[i..i + 4].copy_from_slice(&color.to_array());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_dimensions() {
        assert!(Canvas::new(0, 32).is_err());
        assert!(Canvas::new(32, 0).is_err());
        assert!(Canvas::new(32, 32).is_ok());
    }

    #[test]
    fn frame_new_is_transparent_black() {
        let f = FrameRgba::new(Canvas::new(4, 4).unwrap());
        assert_eq!(f.rgba8.len(), 64);
        assert!(f.rgba8.iter().all(|&b| b == 0));
    }

    #[test]
    fn from_pixels_validates_length() {
        let canvas = Canvas::new(2, 2).unwrap();
        assert!(FrameRgba::from_pixels(canvas, vec![0u8; 15]).is_err());
        assert!(FrameRgba::from_pixels(canvas, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn fill_and_pixel_round_trip() {
        let mut f = FrameRgba::new(Canvas::new(3, 3).unwrap());
        let c = Rgba8::opaque(10, 20, 30);
        f.fill(c);
        assert_eq!(f.pixel(0, 0), Some(c));
        assert_eq!(f.pixel(2, 2), Some(c));
        assert_eq!(f.pixel(3, 0), None);

        let d = Rgba8::opaque(1, 2, 3);
        f.put_pixel(1, 2, d);
        assert_eq!(f.pixel(1, 2), Some(d));
        // out-of-bounds writes are dropped
        f.put_pixel(9, 9, d);
    }
}
