//! Regular Networks
//!
//! Non-variate families: periodic 2D lattices, complete graphs and hypercubes.
//! Lattices live on a `side × side` torus, so `n` must be a perfect square.

use voter_events::NetworkKind;

use super::Network;
use crate::error::NetworkError;

/// Side length of a square lattice with `n` sites.
fn square_side(kind: NetworkKind, n: usize) -> Result<usize, NetworkError> {
    let side = (n as f64).sqrt().round() as usize;
    if side * side == n {
        Ok(side)
    } else {
        Err(NetworkError::InvalidSize {
            kind,
            n,
            reason: "a 2D lattice needs a perfect square number of nodes".into(),
        })
    }
}

/// Rejects tori whose side is too short to keep wrapped neighbors distinct.
fn check_min_side(
    kind: NetworkKind,
    n: usize,
    side: usize,
    min: usize,
) -> Result<(), NetworkError> {
    if side >= min {
        return Ok(());
    }
    Err(NetworkError::InvalidSize {
        kind,
        n,
        reason: format!("side length must be at least {}, got {}", min, side),
    })
}

fn site(side: usize, row: usize, col: usize) -> usize {
    (row % side) * side + (col % side)
}

/// Periodic square lattice, degree 4.
pub fn rectangular(n: usize) -> Result<Network, NetworkError> {
    let side = square_side(NetworkKind::Lattice2dRectangle, n)?;
    let mut network = Network::with_nodes(n);

    for row in 0..side {
        for col in 0..side {
            let here = site(side, row, col);
            network.connect(here, site(side, row, col + 1));
            network.connect(here, site(side, row + 1, col));
        }
    }

    Ok(network)
}

/// Periodic triangular lattice, degree 6.
///
/// The square torus with one diagonal per cell. Needs a side of at least 3.
pub fn triangular(n: usize) -> Result<Network, NetworkError> {
    let side = square_side(NetworkKind::Lattice2dTriangle, n)?;
    check_min_side(NetworkKind::Lattice2dTriangle, n, side, 3)?;
    let mut network = Network::with_nodes(n);

    for row in 0..side {
        for col in 0..side {
            let here = site(side, row, col);
            network.connect(here, site(side, row, col + 1));
            network.connect(here, site(side, row + 1, col));
            network.connect(here, site(side, row + 1, col + 1));
        }
    }

    Ok(network)
}

/// Periodic honeycomb lattice, degree 3.
///
/// Brick-wall embedding: every row is a ring and sites with an even
/// `row + col` bond to the site below. Wrapping needs an even side of at
/// least 4.
pub fn hexagonal(n: usize) -> Result<Network, NetworkError> {
    let side = square_side(NetworkKind::Lattice2dHexagon, n)?;
    if side % 2 != 0 {
        return Err(NetworkError::InvalidSize {
            kind: NetworkKind::Lattice2dHexagon,
            n,
            reason: "a hexagonal lattice needs an even side length".into(),
        });
    }
    check_min_side(NetworkKind::Lattice2dHexagon, n, side, 4)?;

    let mut network = Network::with_nodes(n);
    for row in 0..side {
        for col in 0..side {
            let here = site(side, row, col);
            network.connect(here, site(side, row, col + 1));
            if (row + col) % 2 == 0 {
                network.connect(here, site(side, row + 1, col));
            }
        }
    }

    Ok(network)
}

/// Every pair of nodes connected.
pub fn complete(n: usize) -> Network {
    let mut network = Network::with_nodes(n);
    for a in 0..n {
        for b in (a + 1)..n {
            network.connect(a, b);
        }
    }
    network
}

/// Hypercube over `log2(n)` dimensions; nodes differing in one bit are adjacent.
pub fn hypercube(n: usize) -> Result<Network, NetworkError> {
    if !n.is_power_of_two() {
        return Err(NetworkError::InvalidSize {
            kind: NetworkKind::Hypercube,
            n,
            reason: "a hypercube needs a power of two number of nodes".into(),
        });
    }

    let dimensions = n.trailing_zeros();
    let mut network = Network::with_nodes(n);
    for a in 0..n {
        for bit in 0..dimensions {
            let b = a ^ (1 << bit);
            if a < b {
                network.connect(a, b);
            }
        }
    }

    Ok(network)
}
