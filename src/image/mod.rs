//! Frame storage and manipulation.
//!
//! This module provides:
//!
//! - The [`Frame`] type, an owned 8-bit color image that carries its channel
//!   order, the unit of iteration of the acquisition loop.
//! - [`Resolution`], integer-valued image dimensions.
//! - A variety of [`draw`] functions to annotate frames.

pub mod draw;
mod resolution;

#[cfg(test)]
mod tests;

use std::{fmt, path::Path};

use image::{imageops, ImageBuffer, Rgb, RgbImage};

pub use resolution::Resolution;

#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => anyhow::bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }
}

/// Order of the color channels in a [`Frame`]'s pixel data.
///
/// Capture pipelines commonly deliver blue-first pixel data, while landmark
/// detectors typically expect red-first input. [`Frame::convert`] translates
/// between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// An 8-bit sRGB color.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Color(pub(crate) [u8; 3]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);
    pub const BLUE: Self = Self([0, 0, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

/// An owned 2D color image, the unit of iteration of the acquisition loop.
///
/// Pixel data is stored in the channel order the producing source delivered it
/// in; [`Frame::convert`] reorders it in place when a consumer requires the
/// other layout.
#[derive(Clone)]
pub struct Frame {
    buf: RgbImage,
    order: ChannelOrder,
}

impl Frame {
    /// Creates an all-black frame of the given size, in RGB channel order.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            buf: ImageBuffer::new(resolution.width(), resolution.height()),
            order: ChannelOrder::Rgb,
        }
    }

    /// Creates a frame from raw packed pixel data in the given channel order.
    ///
    /// `buf` must contain exactly `width * height * 3` bytes.
    pub fn from_raw(resolution: Resolution, order: ChannelOrder, buf: Vec<u8>) -> Self {
        let expected_size = resolution.num_pixels() * 3;
        assert_eq!(
            expected_size,
            buf.len(),
            "incorrect buffer size {} for {} frame (expected {} bytes)",
            buf.len(),
            resolution,
            expected_size,
        );

        Self {
            buf: ImageBuffer::from_vec(resolution.width(), resolution.height(), buf)
                .expect("buffer size does not match frame resolution"),
            order,
        }
    }

    /// Loads a frame from the filesystem.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    /// The loaded frame is in RGB channel order.
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let format = match ImageFormat::from_path(path)? {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        };
        let data = std::fs::read(path)?;
        let buf = image::load_from_memory_with_format(&data, format)?.to_rgb8();
        Ok(Self {
            buf,
            order: ChannelOrder::Rgb,
        })
    }

    /// Saves a frame to the file system, always in RGB channel order.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.save_impl(path.as_ref())
    }

    fn save_impl(&self, path: &Path) -> anyhow::Result<()> {
        ImageFormat::from_path(path)?;
        match self.order {
            ChannelOrder::Rgb => self.buf.save(path)?,
            ChannelOrder::Bgr => {
                let mut copy = self.clone();
                copy.convert(ChannelOrder::Rgb);
                copy.buf.save(path)?;
            }
        }
        Ok(())
    }

    /// Returns the width of this frame, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this frame, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this frame.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns the channel order of the stored pixel data.
    #[inline]
    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Reorders the pixel data in place so that it uses `order`.
    ///
    /// Does nothing when the frame already uses `order`.
    pub fn convert(&mut self, order: ChannelOrder) {
        if self.order == order {
            return;
        }
        for pixel in self.buf.pixels_mut() {
            pixel.0.swap(0, 2);
        }
        self.order = order;
    }

    /// Mirrors the frame along its vertical axis, in place.
    pub fn flip_horizontal_in_place(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.buf);
    }

    /// Samples the frame to `resolution`, replacing its contents.
    ///
    /// Does nothing when the frame already has the requested size.
    pub fn resize(&mut self, resolution: Resolution) {
        if self.resolution() == resolution {
            return;
        }
        self.buf = imageops::resize(
            &self.buf,
            resolution.width(),
            resolution.height(),
            imageops::FilterType::Triangle,
        );
    }

    /// Returns the color of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside of the frame.
    pub fn get(&self, x: u32, y: u32) -> Color {
        let px = self.buf.get_pixel(x, y).0;
        match self.order {
            ChannelOrder::Rgb => Color(px),
            ChannelOrder::Bgr => Color([px[2], px[1], px[0]]),
        }
    }

    /// Sets the pixel at `(x, y)` to `color`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside of the frame.
    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        let px = match self.order {
            ChannelOrder::Rgb => [color.r(), color.g(), color.b()],
            ChannelOrder::Bgr => [color.b(), color.g(), color.r()],
        };
        self.buf.put_pixel(x, y, Rgb(px));
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}, {:?})", self.resolution(), self.order)
    }
}
