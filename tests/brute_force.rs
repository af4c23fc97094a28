use std::collections::BTreeSet;

use neigh_list::{gen_neigh, Domain, NeighborList, Vector3D};

/// Deterministic pseudo-random generator (splitmix64), to build test
/// configurations without an external dependency
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> SplitMix64 {
        SplitMix64 { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// uniform value in `[0, 1)`
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn random_positions(rng: &mut SplitMix64, count: usize, min: f64, max: f64) -> Vec<Vector3D> {
    (0..count).map(|_| {
        Vector3D::new(
            min + rng.next_f64() * (max - min),
            min + rng.next_f64() * (max - min),
            min + rng.next_f64() * (max - min),
        )
    }).collect()
}

/// All pairs within the cutoff, checking every pair of particles with the
/// same minimum image distance used by the neighbor list
fn brute_force(positions: &[Vector3D], domain: Domain, cutoff: f64) -> BTreeSet<(usize, usize)> {
    let mut pairs = BTreeSet::new();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if domain.distance2(positions[i], positions[j]) <= cutoff * cutoff {
                pairs.insert((i, j));
            }
        }
    }
    return pairs;
}

fn pair_set(neighbors: &NeighborList) -> BTreeSet<(usize, usize)> {
    let pairs = neighbors.pairs.iter()
        .map(|pair| (pair.first, pair.second))
        .collect::<BTreeSet<_>>();
    // no self pairs, no duplicated pairs
    assert_eq!(pairs.len(), neighbors.pairs.len());
    assert!(pairs.iter().all(|&(i, j)| i != j));
    return pairs;
}

fn check_adjacency(neighbors: &NeighborList) {
    for (i, list) in neighbors.neighbors.iter().enumerate() {
        for &j in list {
            assert!(neighbors.neighbors[j].contains(&i));
        }
        assert!(list.windows(2).all(|w| w[0] < w[1]));
    }

    let mut count = 0;
    for (i, list) in neighbors.neighbors.iter().enumerate() {
        count += list.iter().filter(|&&j| i < j).count();
    }
    assert_eq!(count, neighbors.pairs.len());
}

#[test]
fn open_domain() {
    let mut rng = SplitMix64::new(0xDEADBEEF);
    let positions = random_positions(&mut rng, 200, 0.0, 10.0);

    let domain = Domain::open();
    let neighbors = NeighborList::new(&positions, domain, 1.5).unwrap();

    assert_eq!(pair_set(&neighbors), brute_force(&positions, domain, 1.5));
    check_adjacency(&neighbors);
}

#[test]
fn periodic_domain() {
    let mut rng = SplitMix64::new(42);
    // positions outside [0, L) as well, they wrap into the domain
    let positions = random_positions(&mut rng, 250, -10.0, 20.0);

    let domain = Domain::periodic(10.0, 10.0, 10.0).unwrap();
    let neighbors = NeighborList::new(&positions, domain, 2.5).unwrap();

    assert_eq!(pair_set(&neighbors), brute_force(&positions, domain, 2.5));
    check_adjacency(&neighbors);
}

#[test]
fn mixed_periodicity() {
    let mut rng = SplitMix64::new(7);
    let positions = random_positions(&mut rng, 200, -8.0, 16.0);

    let domain = Domain::from_pbc(Some([8.0, 0.0, 8.0])).unwrap();
    let neighbors = NeighborList::new(&positions, domain, 2.0).unwrap();

    assert_eq!(pair_set(&neighbors), brute_force(&positions, domain, 2.0));
    check_adjacency(&neighbors);
}

#[test]
fn periodic_with_origin() {
    let mut rng = SplitMix64::new(0xC0FFEE);
    let positions = random_positions(&mut rng, 150, 0.0, 12.0);

    let origin = Vector3D::new(2.0, -3.0, 0.5);
    let domain = Domain::periodic(12.0, 12.0, 12.0).unwrap().with_origin(origin);
    let neighbors = NeighborList::new(&positions, domain, 3.0).unwrap();

    // the origin changes the wrapping frame, not the distances
    assert_eq!(pair_set(&neighbors), brute_force(&positions, domain, 3.0));
    check_adjacency(&neighbors);
}

#[test]
fn more_cells_than_the_grid_limit() {
    let mut rng = SplitMix64::new(1234);
    // 120 cells along each axis before the total cell limit kicks in
    let positions = random_positions(&mut rng, 400, 0.0, 60.0);

    let domain = Domain::open();
    let neighbors = NeighborList::new(&positions, domain, 0.5).unwrap();

    assert_eq!(pair_set(&neighbors), brute_force(&positions, domain, 0.5));
    check_adjacency(&neighbors);
}

#[test]
fn gen_neigh_entry_point() {
    let mut rng = SplitMix64::new(6);
    let positions = random_positions(&mut rng, 100, 0.0, 10.0);

    let from_entry_point = gen_neigh(&positions, 2.0, Some([10.0, 10.0, 10.0]), None).unwrap();
    let domain = Domain::periodic(10.0, 10.0, 10.0).unwrap();
    let from_list = NeighborList::new(&positions, domain, 2.0).unwrap();

    assert_eq!(from_entry_point.pairs, from_list.pairs);
    assert_eq!(pair_set(&from_entry_point), brute_force(&positions, domain, 2.0));
}
