use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Resolution every coordinate and per-frame delta in the game is authored against.
pub const BASE_RESOLUTION: Resolution = Resolution {
    width: 1250,
    height: 750,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub pos: Vector,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: Vector { x, y },
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.height
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.pos.x + self.width / 2, self.pos.y + self.height / 2)
    }

    pub fn with_pos(self, pos: Vector) -> Self {
        Self { pos, ..self }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        self.with_pos(Vector::new(self.pos.x + dx, self.pos.y + dy))
    }

    pub fn contains(&self, point: Vector) -> bool {
        point_in_rect(self, point)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        rects_overlap(self, other)
    }

    /// Maps this rect from one display resolution to another.
    pub fn rescaled(self, from: Resolution, to: Resolution) -> Self {
        DisplayScale::between(from, to).rect(self)
    }
}

/// Half-open on both axes: the far edges are outside.
pub fn point_in_rect(rect: &Rect, point: Vector) -> bool {
    point.x >= rect.pos.x && point.x < rect.right() && point.y >= rect.pos.y && point.y < rect.bottom()
}

/// Strict AABB test. Rects that only share an edge do not overlap, and empty rects overlap nothing.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    if a.width <= 0 || a.height <= 0 || b.width <= 0 || b.height <= 0 {
        return false;
    }
    a.pos.x < b.right() && b.pos.x < a.right() && a.pos.y < b.bottom() && b.pos.y < a.bottom()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        BASE_RESOLUTION
    }
}

/// Integer ratio between two resolutions, applied per axis.
///
/// Scaling never collapses a non-zero length to zero, so a one pixel per frame
/// delta authored at the base resolution still moves on a smaller display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayScale {
    from: Resolution,
    to: Resolution,
}

impl DisplayScale {
    pub fn between(from: Resolution, to: Resolution) -> Self {
        if from.is_empty() || to.is_empty() {
            return Self::identity();
        }
        Self { from, to }
    }

    pub fn from_base(current: Resolution) -> Self {
        Self::between(BASE_RESOLUTION, current)
    }

    pub fn identity() -> Self {
        Self {
            from: BASE_RESOLUTION,
            to: BASE_RESOLUTION,
        }
    }

    pub fn target(&self) -> Resolution {
        self.to
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    pub fn x(&self, value: i32) -> i32 {
        scale_component(value, self.to.width, self.from.width)
    }

    pub fn y(&self, value: i32) -> i32 {
        scale_component(value, self.to.height, self.from.height)
    }

    pub fn point(&self, point: Vector) -> Vector {
        Vector::new(self.x(point.x), self.y(point.y))
    }

    pub fn rect(&self, rect: Rect) -> Rect {
        Rect {
            pos: self.point(rect.pos),
            width: self.x(rect.width),
            height: self.y(rect.height),
        }
    }

    /// Maps a point on the current display back into the source resolution.
    pub fn unscale_point(&self, point: Vector) -> Vector {
        Self::between(self.to, self.from).point(point)
    }

    pub fn inverse(&self) -> Self {
        Self::between(self.to, self.from)
    }
}

fn scale_component(value: i32, numerator: u32, denominator: u32) -> i32 {
    if denominator == 0 || value == 0 {
        return value;
    }
    let scaled = (value as i64 * numerator as i64) / denominator as i64;
    if scaled == 0 {
        value.signum()
    } else {
        scaled.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}
