//! Region shape types
//!
//! All coordinates are 0-based pixel coordinates where pixel `i` spans
//! `[i - 0.5, i + 0.5]` and its center sits at `i`.

/// Geometric footprint of a region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionShape {
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    /// Rectangle centered on `(x, y)`, rotated counter-clockwise by `angle` degrees.
    Box {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        angle: f64,
    },
    /// Ellipse with semi-axes `rx` (along the rotated x axis) and `ry`.
    Ellipse {
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        angle: f64,
    },
    Polygon {
        vertices: Vec<(f64, f64)>,
    },
}

impl RegionShape {
    /// Returns true when the point lies strictly inside the shape.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            RegionShape::Circle { x, y, radius } => {
                let (dx, dy) = (px - x, py - y);
                dx * dx + dy * dy < radius * radius
            }
            RegionShape::Box { x, y, width, height, angle } => {
                let (u, v) = to_local(px - x, py - y, *angle);
                u.abs() < width / 2.0 && v.abs() < height / 2.0
            }
            RegionShape::Ellipse { x, y, rx, ry, angle } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let (u, v) = to_local(px - x, py - y, *angle);
                (u / rx).powi(2) + (v / ry).powi(2) < 1.0
            }
            RegionShape::Polygon { vertices } => polygon_contains(vertices, px, py),
        }
    }

    /// Continuous extent as `(xmin, xmax, ymin, ymax)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        match self {
            RegionShape::Circle { x, y, radius } => (x - radius, x + radius, y - radius, y + radius),
            RegionShape::Box { x, y, width, height, angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                let hx = (width / 2.0) * cos.abs() + (height / 2.0) * sin.abs();
                let hy = (width / 2.0) * sin.abs() + (height / 2.0) * cos.abs();
                (x - hx, x + hx, y - hy, y + hy)
            }
            RegionShape::Ellipse { x, y, rx, ry, angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                let hx = ((rx * cos).powi(2) + (ry * sin).powi(2)).sqrt();
                let hy = ((rx * sin).powi(2) + (ry * cos).powi(2)).sqrt();
                (x - hx, x + hx, y - hy, y + hy)
            }
            RegionShape::Polygon { vertices } => vertices.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
                |(xmin, xmax, ymin, ymax), &(vx, vy)| {
                    (xmin.min(vx), xmax.max(vx), ymin.min(vy), ymax.max(vy))
                },
            ),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegionShape::Circle { .. } => "circle",
            RegionShape::Box { .. } => "box",
            RegionShape::Ellipse { .. } => "ellipse",
            RegionShape::Polygon { .. } => "polygon",
        }
    }
}

/// Rotates an offset into the shape's frame (clockwise by `angle` degrees).
fn to_local(dx: f64, dy: f64, angle: f64) -> (f64, f64) {
    if angle == 0.0 {
        return (dx, dy);
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    (dx * cos + dy * sin, -dx * sin + dy * cos)
}

// Even-odd rule.
fn polygon_contains(vertices: &[(f64, f64)], px: f64, py: f64) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = vertices[i];
        let (xj, yj) = vertices[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// One entry of a region file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub shape: RegionShape,
    /// Optional name, taken from the `text={...}` property in DS9 files.
    pub label: Option<String>,
}

impl Region {
    pub fn new(shape: RegionShape) -> Self {
        Self { shape, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
