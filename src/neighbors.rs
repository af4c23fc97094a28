use log::warn;
use ndarray::Array3;
use rayon::prelude::*;

use crate::{Domain, Error, Vector3D};

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with widely spread positions and a small cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// Half of the 3x3x3 cell stencil: the 13 offsets whose first non-zero
/// component is positive. Together with the intra-cell candidates this visits
/// every unordered pair of adjacent cells exactly once.
const HALF_STENCIL: [[i32; 3]; 13] = [
    [0, 0, 1],
    [0, 1, -1], [0, 1, 0], [0, 1, 1],
    [1, -1, -1], [1, -1, 0], [1, -1, 1],
    [1, 0, -1], [1, 0, 0], [1, 0, 1],
    [1, 1, -1], [1, 1, 0], [1, 1, 1],
];

/// A `CellGrid` sorts particles inside bins/cells sized to the cutoff.
///
/// The list of candidate pairs is then constructed by looking through the
/// cells adjacent to the cell of each particle, wrapping around the domain
/// boundaries on periodic axes.
#[derive(Debug, Clone)]
pub struct CellGrid {
    /// particle indices, sorted by the cell containing them
    cells: Array3<Vec<usize>>,
    /// number of cells along each axis
    n_cells: [usize; 3],
    /// cell width along each axis, always at least the cutoff
    widths: [f64; 3],
    /// index of the lowest occupied cell along open axes, so storage indices
    /// start at zero (always zero on periodic axes)
    offsets: [i32; 3],
    /// domain defining the periodic boundary conditions
    domain: Domain,
}

impl CellGrid {
    /// Create a new `CellGrid` for the given domain and cutoff, and sort all
    /// `positions` into their cells.
    ///
    /// On a periodic axis with extent `L`, the grid has `floor(L / cutoff)`
    /// cells of width `L / n >= cutoff`; on an open axis, cells of width
    /// `cutoff` cover the occupied coordinate range. Either way a single
    /// layer of adjacent cells is enough to find all pairs within the
    /// cutoff.
    #[time_graph::instrument(name = "CellGrid")]
    pub fn new(domain: Domain, cutoff: f64, positions: &[Vector3D]) -> Result<CellGrid, Error> {
        domain.check_cutoff(cutoff)?;

        let origin = domain.origin();

        // occupied range of the origin-shifted coordinates, used to bound the
        // grid along open axes
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for (i, &position) in positions.iter().enumerate() {
            let shifted = position - origin;
            for axis in 0..3 {
                if !shifted[axis].is_finite() {
                    return Err(Error::InvalidParameter(format!(
                        "position of particle {} is not finite", i
                    )));
                }

                if i == 0 {
                    min[axis] = shifted[axis];
                    max[axis] = shifted[axis];
                } else {
                    min[axis] = f64::min(min[axis], shifted[axis]);
                    max[axis] = f64::max(max[axis], shifted[axis]);
                }
            }
        }

        let mut n_cells = [0.0; 3];
        for axis in 0..3 {
            if domain.is_periodic(axis) {
                // the cutoff check above guarantees at least two cells
                n_cells[axis] = f64::trunc(domain.length(axis) / cutoff);
            } else {
                n_cells[axis] = f64::trunc((max[axis] - min[axis]) / cutoff) + 1.0;
            }
        }

        // limit memory consumption by ensuring we have less than
        // `MAX_NUMBER_OF_CELLS` cells, keeping roughly the ratio of cells in
        // each direction. Fewer cells only means wider cells, which stays
        // correct with a single layer of neighboring cells.
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            let scale = f64::cbrt(MAX_NUMBER_OF_CELLS / n_cells_total);
            for axis in 0..3 {
                n_cells[axis] = f64::clamp(f64::trunc(n_cells[axis] * scale), 1.0, f64::INFINITY);
            }
        }

        let mut widths = [0.0; 3];
        let mut offsets = [0; 3];
        let mut shape = [0; 3];
        for axis in 0..3 {
            if domain.is_periodic(axis) {
                widths[axis] = domain.length(axis) / n_cells[axis];
                offsets[axis] = 0;
                shape[axis] = n_cells[axis] as usize;
            } else {
                widths[axis] = f64::max(cutoff, (max[axis] - min[axis]) / n_cells[axis]);
                offsets[axis] = f64::floor(min[axis] / widths[axis]) as i32;
                shape[axis] = (f64::floor(max[axis] / widths[axis]) as i32 - offsets[axis] + 1) as usize;
            }
        }

        let mut grid = CellGrid {
            cells: Array3::from_elem(shape, Vec::new()),
            n_cells: shape,
            widths: widths,
            offsets: offsets,
            domain: domain,
        };

        for (index, &position) in positions.iter().enumerate() {
            let cell = grid.cell_index(position);
            grid.cells[cell].push(index);
        }

        return Ok(grid);
    }

    /// Get the coordinates of the cell containing `position`
    pub fn cell_index(&self, position: Vector3D) -> [usize; 3] {
        let mut shifted = position - self.domain.origin();
        self.domain.wrap_vector(&mut shifted);

        let mut index = [0; 3];
        for axis in 0..3 {
            let cell = f64::floor(shifted[axis] / self.widths[axis]) as i32 - self.offsets[axis];
            // roundoff in the wrapping can land a coordinate exactly on the
            // upper face of the grid
            index[axis] = i32::clamp(cell, 0, self.n_cells[axis] as i32 - 1) as usize;
        }
        return index;
    }

    /// Get the particles inside the cell at the given coordinates
    pub fn particles(&self, cell: [usize; 3]) -> &[usize] {
        &self.cells[cell]
    }

    /// Resolve the cell adjacent to `cell` in the direction of `offset`,
    /// wrapping around periodic axes. Returns `None` when the offset leaves
    /// the grid along an open axis.
    fn neighbor_cell(&self, cell: [usize; 3], offset: [i32; 3]) -> Option<[usize; 3]> {
        let mut neighbor = [0; 3];
        for axis in 0..3 {
            let index = cell[axis] as i32 + offset[axis];
            if self.domain.is_periodic(axis) {
                neighbor[axis] = index.rem_euclid(self.n_cells[axis] as i32) as usize;
            } else if index < 0 || index >= self.n_cells[axis] as i32 {
                return None;
            } else {
                neighbor[axis] = index as usize;
            }
        }
        return Some(neighbor);
    }

    /// Get the list of candidate pairs, i.e. all pairs of particles in the
    /// same or adjacent cells, with the particle indices of each pair sorted.
    /// Some candidates are separated by more than the cutoff, so the pairs
    /// require distance filtering; and a pair can appear twice when a
    /// periodic axis wraps after only two cells, so the consumer must treat
    /// the result as a set.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let occupied = self.cells.indexed_iter()
            .filter(|(_, particles)| !particles.is_empty())
            .map(|((x, y, z), _)| [x, y, z])
            .collect::<Vec<_>>();

        // each unit of work only reads the grid and emits into its own
        // buffer, the buffers are merged by concatenation
        return occupied.into_par_iter()
            .flat_map_iter(|cell| self.cell_candidates(cell))
            .collect();
    }

    /// Candidate pairs with at least one particle in the given cell: pairs
    /// among the cell members, and all cross pairs with the half stencil of
    /// adjacent cells.
    fn cell_candidates(&self, cell: [usize; 3]) -> Vec<(usize, usize)> {
        let members = &self.cells[cell];
        let mut candidates = Vec::new();

        for (i, &first) in members.iter().enumerate() {
            for &second in &members[i + 1..] {
                candidates.push(sort_pair(first, second));
            }
        }

        // wrapping can resolve two different offsets to the same cell when an
        // axis only has two cells, only visit each adjacent cell once
        let mut seen = Vec::with_capacity(HALF_STENCIL.len() + 1);
        seen.push(cell);

        for offset in HALF_STENCIL {
            let neighbor = match self.neighbor_cell(cell, offset) {
                Some(neighbor) => neighbor,
                None => continue,
            };

            if seen.contains(&neighbor) {
                continue;
            }
            seen.push(neighbor);

            for &first in members {
                for &second in &self.cells[neighbor] {
                    candidates.push(sort_pair(first, second));
                }
            }
        }

        return candidates;
    }
}

/// Sort the two particle indices of a pair
fn sort_pair(i: usize, j: usize) -> (usize, usize) {
    if i < j {
        (i, j)
    } else {
        (j, i)
    }
}

/// Pair of particles within the cutoff of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    /// index of the first particle in the pair, always smaller than `second`
    pub first: usize,
    /// index of the second particle in the pair
    pub second: usize,
    /// minimum image distance between the two particles
    pub distance: f64,
    /// minimum image vector from the first particle to the second one
    pub vector: Vector3D,
}

/// A neighbor list: all pairs of particles within the cutoff of each other,
/// under the minimum image convention of the domain.
#[derive(Debug, Clone)]
pub struct NeighborList {
    /// the cutoff used to create this neighbor list
    pub cutoff: f64,
    /// all pairs, sorted by `(first, second)`, each unordered pair exactly
    /// once, without self pairs
    pub pairs: Vec<Pair>,
    /// for each particle, the sorted indices of its neighbors. This contains
    /// the same information as `pairs`: `j` is in `neighbors[i]` if and only
    /// if the pair `i-j` is in `pairs`.
    pub neighbors: Vec<Vec<usize>>,
}

impl NeighborList {
    /// Compute the neighbor list for the given `positions`, reporting every
    /// pair of distinct particles whose minimum image distance is within
    /// `cutoff` (inclusive).
    ///
    /// The result only depends on the inputs, not on the traversal order of
    /// the grid; fewer than two particles give an empty list.
    #[time_graph::instrument(name = "NeighborList")]
    pub fn new(positions: &[Vector3D], domain: Domain, cutoff: f64) -> Result<NeighborList, Error> {
        let grid = CellGrid::new(domain, cutoff, positions)?;
        let cutoff2 = cutoff * cutoff;

        // the grid produces too many pairs, only keep the ones where the
        // distance is actually within the cutoff
        let mut pairs = Vec::new();
        for (first, second) in grid.candidate_pairs() {
            let mut vector = positions[second] - positions[first];
            domain.vector_image(&mut vector);

            let distance2 = vector * vector;
            if distance2 <= cutoff2 {
                if distance2 < 1e-6 {
                    warn!(
                        "particles {} and {} are very close to one another ({})",
                        first, second, distance2.sqrt()
                    );
                }

                pairs.push(Pair {
                    first: first,
                    second: second,
                    distance: distance2.sqrt(),
                    vector: vector,
                });
            }
        }

        // sort the pairs to make the output order deterministic, and remove
        // the duplicated candidates the grid can produce on small periodic
        // grids
        pairs.sort_unstable_by_key(|pair| (pair.first, pair.second));
        pairs.dedup_by_key(|pair| (pair.first, pair.second));

        let mut neighbors = vec![Vec::new(); positions.len()];
        for pair in &pairs {
            neighbors[pair.first].push(pair.second);
            neighbors[pair.second].push(pair.first);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        return Ok(NeighborList {
            cutoff: cutoff,
            pairs: pairs,
            neighbors: neighbors,
        });
    }

    /// Compute a neighbor list with the parameters given as JSON, in the
    /// shape of [`Parameters`].
    pub fn from_json(positions: &[Vector3D], parameters: &str) -> Result<NeighborList, Error> {
        let parameters = serde_json::from_str::<Parameters>(parameters)?;
        return NeighborList::new(positions, parameters.domain()?, parameters.cutoff);
    }
}

/// Parameters for a neighbor list calculation, in the same shape as the
/// historical `gen_neigh` keyword arguments.
#[derive(Debug, Clone)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Parameters {
    /// cutoff distance for two particles to be considered neighbors
    pub cutoff: f64,
    /// periodic extents along x, y and z; a non-positive component marks the
    /// corresponding axis non-periodic, and a missing field means fully
    /// non-periodic
    #[serde(default)]
    pub pbc: Option<[f64; 3]>,
    /// origin of the coordinate frame used for wrapping and cell assignment
    #[serde(default)]
    pub origin: Option<[f64; 3]>,
}

impl Parameters {
    /// Build the corresponding [`Domain`]
    pub fn domain(&self) -> Result<Domain, Error> {
        let mut domain = Domain::from_pbc(self.pbc)?;
        if let Some(origin) = self.origin {
            domain = domain.with_origin(origin.into());
        }
        return Ok(domain);
    }
}
