//! The `Domain` type represents the enclosing box of a simulated system, with
//! each axis either periodic with a finite extent or open (non-periodic).
use crate::{Error, Vector3D};

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// A `Domain` defines the boundaries of the space containing the particles.
///
/// Each axis is independently either periodic, with a finite positive extent,
/// or open, extending over the full real line. An optional origin offset
/// shifts the frame used when wrapping coordinates and assigning particles to
/// grid cells; it has no effect on distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// extents along each axis, `f64::INFINITY` on open axes
    lengths: [f64; 3],
    /// origin of the coordinate frame used for wrapping
    origin: Vector3D,
}

impl Domain {
    /// Create a fully open domain, without periodic boundary conditions on
    /// any axis.
    pub fn open() -> Domain {
        Domain {
            lengths: [f64::INFINITY; 3],
            origin: Vector3D::zero(),
        }
    }

    /// Create a domain periodic along all three axes, with extents `a`, `b`,
    /// `c`. All extents must be positive and finite.
    pub fn periodic(a: f64, b: f64, c: f64) -> Result<Domain, Error> {
        let mut domain = Domain::open();
        for (axis, extent) in [a, b, c].into_iter().enumerate() {
            if !(extent > 0.0) || !extent.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "periodic extent along {} must be positive and finite, got {}",
                    AXIS_NAMES[axis], extent
                )));
            }
            domain.lengths[axis] = extent;
        }
        return Ok(domain);
    }

    /// Create a domain from the historical `PBC` argument convention: `None`
    /// means fully open; inside `Some`, a strictly positive finite component
    /// marks that axis periodic with that extent, and any other non-NaN value
    /// marks it open.
    pub fn from_pbc(pbc: Option<[f64; 3]>) -> Result<Domain, Error> {
        let mut domain = Domain::open();
        if let Some(extents) = pbc {
            for (axis, &extent) in extents.iter().enumerate() {
                if extent.is_nan() {
                    return Err(Error::InvalidParameter(format!(
                        "PBC component along {} is NaN", AXIS_NAMES[axis]
                    )));
                }
                if extent > 0.0 && extent.is_finite() {
                    domain.lengths[axis] = extent;
                }
            }
        }
        return Ok(domain);
    }

    /// Set the origin of the coordinate frame used for wrapping and cell
    /// assignment.
    pub fn with_origin(mut self, origin: Vector3D) -> Domain {
        self.origin = origin;
        return self;
    }

    /// Get the origin of the coordinate frame
    pub fn origin(&self) -> Vector3D {
        self.origin
    }

    /// Check if the given axis (0, 1 or 2 for x, y, z) is periodic
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.lengths[axis].is_finite()
    }

    /// Check if this domain is fully open, i.e. if it has no periodic axis
    pub fn is_open(&self) -> bool {
        !self.is_periodic(0) && !self.is_periodic(1) && !self.is_periodic(2)
    }

    /// Get the extent along the given axis, `f64::INFINITY` on open axes
    pub fn length(&self, axis: usize) -> f64 {
        self.lengths[axis]
    }

    /// Validate a cutoff against this domain: the cutoff must be positive and
    /// finite, and every periodic extent must be at least twice the cutoff
    /// for the minimum image convention to be well defined.
    pub fn check_cutoff(&self, cutoff: f64) -> Result<(), Error> {
        if !(cutoff > 0.0) || !cutoff.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "cutoff must be positive and finite, got {}", cutoff
            )));
        }

        for axis in 0..3 {
            let length = self.lengths[axis];
            if length.is_finite() && length < 2.0 * cutoff {
                return Err(Error::AmbiguousMinimumImage(format!(
                    "periodic extent along {} ({}) is smaller than twice the cutoff ({}), \
                    a particle could see two periodic copies of the same neighbor",
                    AXIS_NAMES[axis], length, cutoff
                )));
            }
        }

        return Ok(());
    }
}

/// Geometric operations using periodic boundary conditions
impl Domain {
    /// Wrap a vector in the domain, obeying the periodic boundary conditions.
    /// Every periodic component is mapped to `[0, L)` with a floored modulo,
    /// staying in range even for negative inputs; open components are left
    /// untouched. The vector is expected in the origin-shifted frame.
    pub fn wrap_vector(&self, vector: &mut Vector3D) {
        for axis in 0..3 {
            let length = self.lengths[axis];
            if length.is_finite() {
                vector[axis] -= f64::floor(vector[axis] / length) * length;
            }
        }
    }

    /// Find the image of a vector in the domain, obeying the periodic
    /// boundary conditions. Every periodic component is mapped to
    /// `[-L/2, L/2]`, i.e. to the closest periodic copy; open components are
    /// left untouched.
    pub fn vector_image(&self, vector: &mut Vector3D) {
        for axis in 0..3 {
            let length = self.lengths[axis];
            if length.is_finite() {
                vector[axis] -= f64::round(vector[axis] / length) * length;
            }
        }
    }

    /// Minimum image squared distance between the point `u` and the point `v`
    pub fn distance2(&self, u: Vector3D, v: Vector3D) -> f64 {
        let mut d = v - u;
        self.vector_image(&mut d);
        return d.norm2();
    }

    /// Minimum image distance between the point `u` and the point `v`
    pub fn distance(&self, u: Vector3D, v: Vector3D) -> f64 {
        return f64::sqrt(self.distance2(u, v));
    }
}
