use chrono::{DateTime, Local};
use image::{GrayImage, Luma, RgbImage, imageops};
use rappy_types::{CaptureRegion, Point, Rgb};

use crate::error::CaptureError;

/// Byte order of one pixel in a native capture buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Rgba,
    Bgr,
    Bgra,
}

impl ChannelOrder {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ChannelOrder::Rgb | ChannelOrder::Bgr => 3,
            ChannelOrder::Rgba | ChannelOrder::Bgra => 4,
        }
    }

    fn to_rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb | ChannelOrder::Rgba => [px[0], px[1], px[2]],
            ChannelOrder::Bgr | ChannelOrder::Bgra => [px[2], px[1], px[0]],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    TopDown,
    BottomUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLayout {
    pub order: ChannelOrder,
    pub rows: RowOrder,
    /// Bytes per row including padding. `None` means tightly packed.
    pub stride: Option<usize>,
}

impl RawLayout {
    pub fn packed(order: ChannelOrder) -> Self {
        Self {
            order,
            rows: RowOrder::TopDown,
            stride: None,
        }
    }
}

/// Immutable RGB raster of the whole window plus the moment it was taken
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
    captured_at: DateTime<Local>,
}

impl Frame {
    pub fn new(image: RgbImage, captured_at: DateTime<Local>) -> Self {
        Self { image, captured_at }
    }

    /// Normalize a native buffer to top-down RGB, dropping alpha and row padding
    pub fn from_raw(
        data: &[u8],
        width: u32,
        height: u32,
        layout: RawLayout,
        captured_at: DateTime<Local>,
    ) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyFrame);
        }

        let bpp = layout.order.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let stride = layout.stride.unwrap_or(row_bytes);
        if stride < row_bytes {
            return Err(CaptureError::MalformedBuffer {
                expected: row_bytes,
                actual: stride,
            });
        }

        // The last row does not need trailing padding
        let expected = stride * (height as usize - 1) + row_bytes;
        if data.len() < expected {
            return Err(CaptureError::MalformedBuffer {
                expected,
                actual: data.len(),
            });
        }

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height as usize {
            let src_row = match layout.rows {
                RowOrder::TopDown => y,
                RowOrder::BottomUp => height as usize - 1 - y,
            };
            let start = src_row * stride;
            for px in data[start..start + row_bytes].chunks_exact(bpp) {
                rgb.extend_from_slice(&layout.order.to_rgb(px));
            }
        }

        let image = RgbImage::from_raw(width, height, rgb).ok_or(CaptureError::MalformedBuffer {
            expected: width as usize * height as usize * 3,
            actual: 0,
        })?;

        Ok(Self::new(image, captured_at))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixel at a window-relative coordinate, `None` outside the frame
    pub fn pixel(&self, at: Point) -> Option<Rgb> {
        self.image
            .get_pixel_checked(at.x, at.y)
            .map(|p| Rgb(p[0], p[1], p[2]))
    }

    /// Sub-frame sharing the capture timestamp. Regions reaching past the
    /// edge are clipped to the frame.
    pub fn crop(&self, region: CaptureRegion) -> Frame {
        let image =
            imageops::crop_imm(&self.image, region.x, region.y, region.width, region.height)
                .to_image();
        Frame::new(image, self.captured_at)
    }

    /// Rec.601 luma (0.299 R + 0.587 G + 0.114 B), rounded. The counter
    /// threshold and homing confidence are tuned against these levels.
    pub fn to_gray(&self) -> GrayImage {
        let (width, height) = self.image.dimensions();
        let mut gray = GrayImage::new(width, height);
        for (dst, src) in gray.pixels_mut().zip(self.image.pixels()) {
            let [r, g, b] = src.0.map(u32::from);
            *dst = Luma([((299 * r + 587 * g + 114 * b + 500) / 1000) as u8]);
        }
        gray
    }
}
