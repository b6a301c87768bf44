//! 2D affine transforms.
//!
//! Stored as the six coefficients of the matrix
//!
//! ```text
//! | a  b  tx |
//! | c  d  ty |
//! ```
//!
//! applied to column vectors, so `apply(p) = (a*x + b*y + tx, c*x + d*y + ty)`.

use crate::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translate(dx: f32, dy: f32) -> Self {
        Transform2D {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform2D {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotate_degrees(degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Transform2D {
            a: cos,
            b: -sin,
            c: sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Matrix product `self * other`: `other` is applied first.
    pub fn then(&self, other: &Transform2D) -> Transform2D {
        Transform2D {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            tx: self.a * other.tx + self.b * other.ty + self.tx,
            ty: self.c * other.tx + self.d * other.ty + self.ty,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular (for example
    /// a scale of zero along one axis). Hit-testing treats a singular
    /// ancestor as "nothing underneath".
    pub fn invert(&self) -> Option<Transform2D> {
        let det = self.determinant();
        if det.abs() < 1e-9 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform2D {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.b * self.ty - self.d * self.tx) * inv,
            ty: (self.c * self.tx - self.a * self.ty) * inv,
        })
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.b * point.y + self.tx,
            self.c * point.x + self.d * point.y + self.ty,
        )
    }

    /// Transform a direction vector: translation is dropped, so a vector
    /// that starts at the local origin is not shifted by the component's
    /// position.
    pub fn apply_vector(&self, vector: Point) -> Point {
        Point::new(
            self.a * vector.x + self.b * vector.y,
            self.c * vector.x + self.d * vector.y,
        )
    }

    /// A copy of this transform with the translation removed.
    pub fn about_origin(&self) -> Transform2D {
        Transform2D {
            tx: 0.0,
            ty: 0.0,
            ..*self
        }
    }

    /// Length of the transformed x or y unit basis vector. Pointer deltas in
    /// viewport coordinates are divided by this to recover local-axis travel
    /// under scaling ancestors.
    pub fn axis_scale(&self, horizontal: bool) -> f32 {
        if horizontal {
            (self.a * self.a + self.c * self.c).sqrt()
        } else {
            (self.b * self.b + self.d * self.d).sqrt()
        }
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply(Point::new(rect.x, rect.y)),
            self.apply(Point::new(rect.right(), rect.y)),
            self.apply(Point::new(rect.right(), rect.bottom())),
            self.apply(Point::new(rect.x, rect.bottom())),
        ];
        Rect::bounding_box(&corners)
    }
}
