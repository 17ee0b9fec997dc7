use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::canvas::{Canvas, Color, DrawTransform, FontHandle, ImageHandle};
use crate::app::geometry::{Rect, Resolution};

use super::raster::{blit_image, clear};
use super::text::draw_text_clipped;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Owns the pixel buffer. The buffer always matches the window's inner size, so
/// cursor coordinates and frame coordinates are the same.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    resolution: Resolution,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let resolution = Resolution::new(size.width.max(1), size.height.max(1));
        let pixels = Self::build_pixels(Arc::clone(&window), resolution)?;
        Ok(Self {
            window,
            pixels,
            resolution,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let resolution = Resolution::new(width, height);
        self.pixels = Self::build_pixels(Arc::clone(&self.window), resolution)?;
        self.resolution = resolution;
        Ok(())
    }

    fn build_pixels(window: Arc<Window>, resolution: Resolution) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(resolution.width, resolution.height, window);
        Pixels::new(resolution.width, resolution.height, surface)
    }

    /// Clears the frame, lets `draw` paint it, then presents.
    pub fn render(&mut self, draw: impl FnOnce(&mut dyn Canvas)) -> Result<(), Error> {
        let resolution = self.resolution;
        let frame = self.pixels.frame_mut();
        clear(frame, CLEAR_COLOR);
        let mut canvas = FrameCanvas::new(frame, resolution);
        draw(&mut canvas);
        self.pixels.render()
    }
}

/// Canvas over a borrowed RGBA8 frame.
pub struct FrameCanvas<'a> {
    frame: &'a mut [u8],
    resolution: Resolution,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut [u8], resolution: Resolution) -> Self {
        Self { frame, resolution }
    }
}

impl Canvas for FrameCanvas<'_> {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, transform: DrawTransform) {
        blit_image(
            self.frame,
            self.resolution.width,
            self.resolution.height,
            image,
            dest,
            transform,
        );
    }

    fn draw_text(&mut self, font: &FontHandle, text: &str, x: i32, y: i32, color: Color) {
        draw_text_clipped(
            self.frame,
            self.resolution.width,
            self.resolution.height,
            font,
            x,
            y,
            text,
            color,
        );
    }
}
