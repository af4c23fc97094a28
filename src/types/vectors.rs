use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

/// A 3-dimensional vector type, implementing all usual operators, with the `*`
/// operator between two vectors being the dot product.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D(pub f64, pub f64, pub f64);

impl Vector3D {
    /// Create a new `Vector3D` with components `x`, `y`, `z`
    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D(x, y, z)
    }

    /// Create a new null `Vector3D`
    pub fn zero() -> Vector3D {
        Vector3D::new(0.0, 0.0, 0.0)
    }

    /// Get the squared euclidean norm of this vector
    pub fn norm2(&self) -> f64 {
        self * self
    }

    /// Get the euclidean norm of this vector
    pub fn norm(&self) -> f64 {
        f64::sqrt(self.norm2())
    }
}

impl_arithmetic!(
    Vector3D, Vector3D, Add, add, Vector3D, self, other,
    Vector3D::new(self.0 + other.0, self.1 + other.1, self.2 + other.2)
);

impl_arithmetic!(
    Vector3D, Vector3D, Sub, sub, Vector3D, self, other,
    Vector3D::new(self.0 - other.0, self.1 - other.1, self.2 - other.2)
);

// Dot product
impl_arithmetic!(
    Vector3D, Vector3D, Mul, mul, f64, self, other,
    self.0 * other.0 + self.1 * other.1 + self.2 * other.2
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, AddAssign, add_assign, self, other,
    {self.0 += other.0; self.1 += other.1; self.2 += other.2}
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, SubAssign, sub_assign, self, other,
    {self.0 -= other.0; self.1 -= other.1; self.2 -= other.2}
);

lsh_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D, self, other,
    Vector3D::new(self.0 * other, self.1 * other, self.2 * other)
);

rhs_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D, self, other,
    Vector3D::new(self * other.0, self * other.1, self * other.2)
);

lsh_scal_arithmetic!(
    Vector3D, Div, div, Vector3D, self, other,
    Vector3D::new(self.0 / other, self.1 / other, self.2 / other)
);

impl MulAssign<f64> for Vector3D {
    #[inline] fn mul_assign(&mut self, other: f64) {
        self.0 *= other;
        self.1 *= other;
        self.2 *= other;
    }
}

impl DivAssign<f64> for Vector3D {
    #[inline] fn div_assign(&mut self, other: f64) {
        self.0 /= other;
        self.1 /= other;
        self.2 /= other;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;
    #[inline] fn neg(self) -> Vector3D {
        Vector3D::new(-self.0, -self.1, -self.2)
    }
}

impl<'a> Neg for &'a Vector3D {
    type Output = Vector3D;
    #[inline] fn neg(self) -> Vector3D {
        Vector3D::new(-self.0, -self.1, -self.2)
    }
}

impl Index<usize> for Vector3D {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.0,
            1 => &self.1,
            2 => &self.2,
            _ => panic!("index out of bounds: a Vector3D only has 3 components, the index is {}", index),
        }
    }
}

impl IndexMut<usize> for Vector3D {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.0,
            1 => &mut self.1,
            2 => &mut self.2,
            _ => panic!("index out of bounds: a Vector3D only has 3 components, the index is {}", index),
        }
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(data: [f64; 3]) -> Vector3D {
        Vector3D::new(data[0], data[1], data[2])
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(vector: Vector3D) -> [f64; 3] {
        [vector.0, vector.1, vector.2]
    }
}

impl AbsDiffEq for Vector3D {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.0, &other.0, epsilon)
            && f64::abs_diff_eq(&self.1, &other.1, epsilon)
            && f64::abs_diff_eq(&self.2, &other.2, epsilon)
    }
}

impl RelativeEq for Vector3D {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        f64::relative_eq(&self.0, &other.0, epsilon, max_relative)
            && f64::relative_eq(&self.1, &other.1, epsilon, max_relative)
            && f64::relative_eq(&self.2, &other.2, epsilon, max_relative)
    }
}

impl UlpsEq for Vector3D {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        f64::ulps_eq(&self.0, &other.0, epsilon, max_ulps)
            && f64::ulps_eq(&self.1, &other.1, epsilon, max_ulps)
            && f64::ulps_eq(&self.2, &other.2, epsilon, max_ulps)
    }
}
