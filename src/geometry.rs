use serde::{Deserialize, Serialize};

/// A point (or displacement) on the board, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMm {
    pub x: f64,
    pub y: f64,
}

impl PointMm {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotate this point as a vector about the origin, counter-clockwise.
    #[must_use]
    pub fn rotated(self, angle_deg: f64) -> Self {
        let a = angle_deg.to_radians();
        let (s, c) = a.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }
}

impl std::ops::Add for PointMm {
    type Output = PointMm;

    fn add(self, rhs: PointMm) -> PointMm {
        PointMm::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A position in the layout's native coordinate space, measured in key units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPoint {
    pub x: f64,
    pub y: f64,
}

impl UnitPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine map from unit space to absolute board millimeters.
///
/// The unit-space bounding box of the layout is centered inside the physical
/// case outline; every key goes through the same scale-plus-offset, there is
/// no per-key distortion.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    start: PointMm,
    unit_mm: f64,
}

impl Projector {
    /// Center a `layout_w x layout_h` (key units) block inside a case of
    /// `case_w x case_h` millimeters whose top-left corner sits at `origin`.
    #[must_use]
    pub fn centered(
        origin: PointMm,
        case_w: f64,
        case_h: f64,
        layout_w: f64,
        layout_h: f64,
        unit_mm: f64,
    ) -> Self {
        let start = PointMm::new(
            origin.x + (case_w - layout_w * unit_mm) / 2.0,
            origin.y + (case_h - layout_h * unit_mm) / 2.0,
        );
        Self { start, unit_mm }
    }

    #[must_use]
    pub fn to_mm(&self, p: UnitPoint) -> PointMm {
        PointMm::new(
            p.x * self.unit_mm + self.start.x,
            p.y * self.unit_mm + self.start.y,
        )
    }
}
