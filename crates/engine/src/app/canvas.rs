use std::fmt;
use std::sync::Arc;

use ab_glyph::FontArc;

use super::geometry::{Rect, Resolution};

/// Decoded RGBA8 pixels shared between every sprite that shows the same picture.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<ImageData>,
}

struct ImageData {
    name: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageHandle {
    /// Returns `None` when `rgba` does not hold `width * height` pixels.
    pub fn from_rgba(name: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            inner: Arc::new(ImageData {
                name: name.into(),
                width,
                height,
                rgba,
            }),
        })
    }

    /// One opaque white pixel, stretched to whatever rect it is drawn into.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ImageData {
                name: name.into(),
                width: 1,
                height: 1,
                rgba: vec![255, 255, 255, 255],
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.inner.rgba
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("name", &self.inner.name)
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.name == other.inner.name
    }
}

/// Font face at a pixel size.
///
/// Handles built with [`FontHandle::with_size`] carry no face and draw with the
/// built-in bitmap glyphs, whose cells are 3x5 pixels multiplied by `scale`.
#[derive(Clone)]
pub struct FontHandle {
    face: Option<Arc<FontFace>>,
    size_px: u32,
}

struct FontFace {
    name: String,
    font: FontArc,
}

impl FontHandle {
    pub fn with_size(size_px: u32) -> Self {
        Self {
            face: None,
            size_px: size_px.max(1),
        }
    }

    pub(crate) fn from_face(name: &str, font: FontArc, size_px: u32) -> Self {
        Self {
            face: Some(Arc::new(FontFace {
                name: name.to_string(),
                font,
            })),
            size_px: size_px.max(1),
        }
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    /// File the face was parsed from.
    pub fn name(&self) -> Option<&str> {
        self.face.as_ref().map(|face| face.name.as_str())
    }

    pub(crate) fn face(&self) -> Option<&FontArc> {
        self.face.as_ref().map(|face| &face.font)
    }

    /// Bitmap glyph scale: one step per 8 px of size, never below 1.
    pub fn scale(&self) -> i32 {
        ((self.size_px / 8) as i32).max(1)
    }

    /// Same face at a different display scale factor, in percent.
    pub fn resized(&self, percent: u32) -> Self {
        Self {
            face: self.face.clone(),
            size_px: (self.size_px * percent / 100).max(1),
        }
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("name", &self.name())
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        self.size_px == other.size_px && self.name() == other.name()
    }
}

impl Eq for FontHandle {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const PURPLE: Color = Color([50, 0, 50, 250]);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    pub scale: f32,
    pub half_turn: bool,
}

impl DrawTransform {
    pub const IDENTITY: DrawTransform = DrawTransform {
        scale: 1.0,
        half_turn: false,
    };

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    pub fn rotated_half_turn() -> Self {
        Self {
            half_turn: true,
            ..Self::IDENTITY
        }
    }

    /// Destination rect after the scale is applied around the rect's top-left corner.
    pub fn apply(&self, dest: Rect) -> Rect {
        if (self.scale - 1.0).abs() < f32::EPSILON {
            return dest;
        }
        Rect {
            pos: dest.pos,
            width: (dest.width as f32 * self.scale).round() as i32,
            height: (dest.height as f32 * self.scale).round() as i32,
        }
    }
}

impl Default for DrawTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawing surface for one frame.
pub trait Canvas {
    fn resolution(&self) -> Resolution;
    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, transform: DrawTransform);
    fn draw_text(&mut self, font: &FontHandle, text: &str, x: i32, y: i32, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image {
        name: String,
        dest: Rect,
        transform: DrawTransform,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        color: Color,
    },
}

/// Canvas that keeps every call instead of rasterizing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    resolution: Resolution,
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn image_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Image { name, .. } => Some(name.as_str()),
                DrawCall::Text { .. } => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                DrawCall::Image { .. } => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect, transform: DrawTransform) {
        self.calls.push(DrawCall::Image {
            name: image.name().to_string(),
            dest,
            transform,
        });
    }

    fn draw_text(&mut self, _font: &FontHandle, text: &str, x: i32, y: i32, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}
