//! Axis aligned bounding boxes.

use nalgebra::Vector2;

/// Axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Corner with the smallest coordinates
    pub min: Vector2<f64>,
    /// Corner with the largest coordinates
    pub max: Vector2<f64>,
}

impl BoundingBox {
    /// Constructs the smallest box containing all points.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vector2<f64>>>(points: I) -> Option<BoundingBox> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut min = first;
        let mut max = first;
        for p in points {
            if min[0] > p[0] {
                min[0] = p[0];
            }
            if min[1] > p[1] {
                min[1] = p[1];
            }
            if max[0] < p[0] {
                max[0] = p[0];
            }
            if max[1] < p[1] {
                max[1] = p[1];
            }
        }
        Some(BoundingBox { min, max })
    }

    /// Smallest box containing `self` and `other`
    pub fn union(&self, other: &Self) -> BoundingBox {
        BoundingBox {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Grows the box by `margin` in every direction
    pub fn expand(&self, margin: f64) -> BoundingBox {
        let margin = Vector2::repeat(margin);
        BoundingBox {
            min: self.min - margin,
            max: self.max + margin,
        }
    }

    /// Width and height
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// Checks whether a point lies inside the box or on its border
    pub fn contains(&self, point: &Vector2<f64>) -> bool {
        self.min[0] <= point[0]
            && point[0] <= self.max[0]
            && self.min[1] <= point[1]
            && point[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes() {
        let a = BoundingBox {
            min: Vector2::new(0.0, 0.0),
            max: Vector2::new(10.0, 10.0),
        };
        let b = BoundingBox::from_points([Vector2::new(12.0, 5.0), Vector2::new(20.0, -5.0)]).unwrap();
        assert_eq!(b.min, Vector2::new(12.0, -5.0));
        assert!(!a.contains(&Vector2::new(12.0, 5.0)));
        assert!(a.expand(2.0).contains(&Vector2::new(12.0, 5.0)));
        assert!(a.contains(&Vector2::new(10.0, 0.0)));
        assert!(!a.contains(&Vector2::new(10.5, 0.0)));
        let union = a.union(&b);
        assert_eq!(union.min, Vector2::new(0.0, -5.0));
        assert_eq!(union.max, Vector2::new(20.0, 10.0));
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }
}
