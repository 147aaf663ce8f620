use std::ops::{Add, AddAssign};

use glam::Vec3;

/// Axis-aligned bounding box of the scene, used to lay out the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    pub fn is_set(&self) -> bool {
        self.min.x != Self::default().min.x
    }

    /// Returns whether this box spans a finite, non-zero distance on every
    /// axis, i.e. whether it can be divided into cells.
    pub fn is_solid(&self) -> bool {
        let extent = self.extent();

        self.min.is_finite()
            && self.max.is_finite()
            && extent.cmpgt(Vec3::ZERO).all()
    }

    /// Returns this box grown by `margin` on each side.
    pub fn inflated(&self, margin: f32) -> Self {
        let margin = Vec3::splat(margin);

        Self::new(self.min - margin, self.max + margin)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Vec3::MAX, Vec3::MIN)
    }
}

impl Add<Vec3> for BoundingBox {
    type Output = Self;

    fn add(mut self, rhs: Vec3) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign<Vec3> for BoundingBox {
    fn add_assign(&mut self, rhs: Vec3) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Vec3>,
    {
        let mut this = Self::default();

        for item in iter {
            this += item;
        }

        this
    }
}

impl AddAssign<Self> for BoundingBox {
    fn add_assign(&mut self, rhs: Self) {
        if rhs.is_set() {
            *self += rhs.min;
            *self += rhs.max;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn from_points() {
        let target: BoundingBox = [
            vec3(1.0, -2.0, 3.0),
            vec3(-1.0, 4.0, 0.0),
            vec3(0.0, 0.0, 5.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(vec3(-1.0, -2.0, 0.0), target.min());
        assert_eq!(vec3(1.0, 4.0, 5.0), target.max());
        assert_eq!(vec3(2.0, 6.0, 5.0), target.extent());
        assert!(target.is_set());
        assert!(target.is_solid());
    }

    #[test]
    fn flat_and_empty_boxes() {
        assert!(!BoundingBox::default().is_set());
        assert!(!BoundingBox::default().is_solid());

        let flat = BoundingBox::new(Vec3::ZERO, vec3(1.0, 0.0, 1.0));

        assert!(flat.is_set());
        assert!(!flat.is_solid());
        assert!(flat.inflated(0.5).is_solid());

        let mut target = flat;

        target += BoundingBox::default();

        assert_eq!(flat, target);
    }
}
