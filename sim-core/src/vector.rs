//! Vector operations that [`Vector2`] does not provide out of the box.
//!
//! Everything else (add, subtract, scale, divide, length, normalize, the
//! zero constant) comes straight from `glam::DVec2`, which is a `Copy`
//! value type: every operation returns a new vector.

use crate::types::Vector2;

/// Extra constructors and transforms for [`Vector2`].
pub trait Vector2Ext: Sized {
    /// Builds the unit vector pointing along `(x, y)`.
    ///
    /// A zero-length input yields non-finite components, exactly like
    /// `normalize`; callers must guard against it.
    fn unit(x: f64, y: f64) -> Self;

    /// Rotates the vector, treated as a point, about `center` by `angle`
    /// radians.
    ///
    /// Uses the standard matrix `[cos -sin; sin cos]`. That is
    /// counter-clockwise in a y-up frame, which shows up as clockwise on
    /// the y-down screen the simulation draws to.
    fn rotate_about(self, angle: f64, center: Self) -> Self;
}

impl Vector2Ext for Vector2 {
    #[inline]
    fn unit(x: f64, y: f64) -> Self {
        let v = Vector2::new(x, y);
        v / v.length()
    }

    fn rotate_about(self, angle: f64, center: Self) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self - center;
        Vector2::new(
            d.x * cos - d.y * sin + center.x,
            d.x * sin + d.y * cos + center.y,
        )
    }
}
