//! Axis-aligned boxes and regression deltas.
//!
//! Boxes are stored as corner coordinates `(x1, y1, x2, y2)` in image pixels.
//! Nothing here enforces `x1 <= x2` or `y1 <= y2`: decoded boxes may be
//! inverted, and the candidate filter is responsible for discarding them.

pub mod regression;

/// Axis-aligned box in corner form.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BBox {
    /// Creates a box from its corners.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a box from an `[x1, y1, x2, y2]` array.
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Returns the corners as `[x1, y1, x2, y2]`.
    pub const fn to_array(self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Signed width `x2 - x1`; negative for inverted boxes.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Signed height `y2 - y1`; negative for inverted boxes.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Area with negative extents clamped to zero.
    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f32, f32) {
        (self.x1 + 0.5 * self.width(), self.y1 + 0.5 * self.height())
    }

    /// Clamps x into `[0, width]` and y into `[0, height]`, per coordinate.
    ///
    /// Clipping is idempotent and may collapse a box to zero or negative
    /// extent when it lies outside the image.
    pub fn clip(&self, size: ImageSize) -> Self {
        Self {
            x1: self.x1.clamp(0.0, size.width),
            y1: self.y1.clamp(0.0, size.height),
            x2: self.x2.clamp(0.0, size.width),
            y2: self.y2.clamp(0.0, size.height),
        }
    }

    /// Intersection-over-union with another box.
    ///
    /// Returns 0 when the union is empty, so two zero-area boxes never
    /// overlap.
    pub fn iou(&self, other: &BBox) -> f32 {
        let iw = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let ih = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let inter = iw * ih;
        let union = self.area() + other.area() - inter;
        if union > 0.0 {
            inter / union
        } else {
            0.0
        }
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::from_array(v)
    }
}

/// Predicted adjustment of an anchor: center shift and log-scale change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxDelta {
    /// Center shift along x, in units of anchor width.
    pub dx: f32,
    /// Center shift along y, in units of anchor height.
    pub dy: f32,
    /// Log of the width ratio.
    pub dw: f32,
    /// Log of the height ratio.
    pub dh: f32,
}

impl BoxDelta {
    /// Creates a delta from its components.
    pub const fn new(dx: f32, dy: f32, dw: f32, dh: f32) -> Self {
        Self { dx, dy, dw, dh }
    }

    /// Creates a delta from a `[dx, dy, dw, dh]` array.
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Image extent in pixels after any resizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    /// Creates an image size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}
