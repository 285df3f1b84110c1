//! Geometric utilities for landmark computations.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::types::Landmark;

/// Axis-aligned bounding box over the x/y plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox2D {
    pub fn from_landmarks<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Landmark>,
    {
        let mut iter = points.into_iter().peekable();
        iter.peek()?;

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Larger of width and height
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }
}

fn planar_delta(from: &Landmark, to: &Landmark) -> Vector2<f64> {
    Vector2::new(to.x - from.x, to.y - from.y)
}

/// Full 3D distance between two landmarks
pub fn euclidean_distance(a: &Landmark, b: &Landmark) -> f64 {
    (b.to_point3() - a.to_point3()).norm()
}

/// Distance in the image plane, ignoring depth
pub fn planar_distance(a: &Landmark, b: &Landmark) -> f64 {
    planar_delta(a, b).norm()
}

/// Direction of `to` as seen from `from`, `atan2(dy, dx)` in radians
pub fn planar_angle(from: &Landmark, to: &Landmark) -> f64 {
    let d = planar_delta(from, to);
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_bounding_box_extent() {
        let points = [
            Landmark::new(0.0, 0.0, 0.0),
            Landmark::new(0.5, -1.0, 0.2),
            Landmark::new(-0.25, 0.1, 0.0),
        ];
        let bbox = BoundingBox2D::from_landmarks(&points).unwrap();

        assert!((bbox.width() - 0.75).abs() < 1e-12);
        assert!((bbox.height() - 1.1).abs() < 1e-12);
        assert!((bbox.max_extent() - 1.1).abs() < 1e-12);
        assert!(BoundingBox2D::from_landmarks(&[] as &[Landmark]).is_none());
    }

    #[test]
    fn test_distances() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(3.0, 4.0, 12.0);
        assert!((euclidean_distance(&a, &b) - 13.0).abs() < 1e-12);
        assert!((planar_distance(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_planar_angle() {
        let a = Landmark::origin();
        assert!((planar_angle(&a, &Landmark::new(0.0, 1.0, 0.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!(planar_angle(&a, &Landmark::new(1.0, 0.0, 0.0)).abs() < 1e-12);
    }
}
