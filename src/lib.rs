#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod types;
pub use types::Vector3D;

mod errors;
pub use self::errors::Error;

mod domain;
pub use self::domain::Domain;

mod neighbors;
pub use self::neighbors::{CellGrid, NeighborList, Pair, Parameters};

/// Generate the neighbor list for the given particle `positions`: all pairs
/// of distinct particles whose separation is within `cutoff`, each unordered
/// pair reported exactly once.
///
/// `pbc` optionally gives the periodic extents along x, y and z: a strictly
/// positive finite component makes the corresponding axis periodic, any other
/// value leaves it non-periodic, and `None` disables periodicity everywhere.
/// Distances on periodic axes follow the minimum image convention, so every
/// periodic extent must be at least twice the cutoff. `origin` shifts the
/// coordinate frame used for wrapping, and defaults to zero.
pub fn gen_neigh(
    positions: &[Vector3D],
    cutoff: f64,
    pbc: Option<[f64; 3]>,
    origin: Option<Vector3D>,
) -> Result<NeighborList, Error> {
    let mut domain = Domain::from_pbc(pbc)?;
    if let Some(origin) = origin {
        domain = domain.with_origin(origin);
    }
    return NeighborList::new(positions, domain, cutoff);
}
