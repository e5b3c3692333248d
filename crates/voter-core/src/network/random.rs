//! Random Networks
//!
//! Variate families. Every draw comes from the caller's generator so an
//! ensemble is reproducible from its seed.

use rand::rngs::SmallRng;
use rand::Rng;
use voter_events::NetworkKind;

use super::{check_probability, lattice, Network};
use crate::error::NetworkError;

/// Picks `m` distinct values from `seq`, weighted by multiplicity.
///
/// `seq` must hold at least `m` distinct values.
fn random_subset(seq: &[usize], m: usize, rng: &mut SmallRng) -> Vec<usize> {
    let mut targets = Vec::with_capacity(m);
    while targets.len() < m {
        let candidate = seq[rng.gen_range(0..seq.len())];
        if !targets.contains(&candidate) {
            targets.push(candidate);
        }
    }
    targets
}

fn check_attachment(kind: NetworkKind, n: usize, m: usize) -> Result<(), NetworkError> {
    if m == 0 {
        return Err(NetworkError::InvalidParameter {
            kind,
            name: "m",
            value: 0.0,
        });
    }
    if n <= m {
        return Err(NetworkError::InvalidSize {
            kind,
            n,
            reason: format!("attachment count {} needs more than {} nodes", m, m),
        });
    }
    Ok(())
}

/// Small-world network: ring of degree `k` with edges rewired at probability `p`.
///
/// Each node links to `k / 2` successors; `k >= n` yields a complete graph.
pub fn watts_strogatz(
    n: usize,
    k: usize,
    p: f64,
    rng: &mut SmallRng,
) -> Result<Network, NetworkError> {
    check_probability(NetworkKind::WattsStrogatz, "p", p)?;
    if k >= n {
        return Ok(lattice::complete(n));
    }

    let mut network = Network::with_nodes(n);
    let half_k = k / 2;
    for offset in 1..=half_k {
        for u in 0..n {
            network.connect(u, (u + offset) % n);
        }
    }

    for offset in 1..=half_k {
        for u in 0..n {
            if rng.gen::<f64>() >= p {
                continue;
            }
            let v = (u + offset) % n;

            let mut w = rng.gen_range(0..n);
            let mut saturated = false;
            while w == u || network.has_edge(u, w) {
                if network.degree(u) >= n - 1 {
                    saturated = true;
                    break;
                }
                w = rng.gen_range(0..n);
            }

            if !saturated {
                network.disconnect(u, v);
                network.connect(u, w);
            }
        }
    }

    Ok(network)
}

/// Holme–Kim power-law cluster graph.
///
/// Preferential attachment of `m` edges per new node, where each edge after
/// the first closes a triangle with probability `p`.
pub fn powerlaw_cluster(
    n: usize,
    m: usize,
    p: f64,
    rng: &mut SmallRng,
) -> Result<Network, NetworkError> {
    check_attachment(NetworkKind::PowerLaw, n, m)?;
    check_probability(NetworkKind::PowerLaw, "p", p)?;

    let mut network = Network::with_nodes(n);
    let mut repeated: Vec<usize> = (0..m).collect();

    for source in m..n {
        let mut candidates = random_subset(&repeated, m, rng);
        let mut target = match candidates.pop() {
            Some(target) => target,
            None => break,
        };
        network.connect(source, target);
        repeated.push(target);

        let mut count = 1;
        while count < m {
            if rng.gen::<f64>() < p {
                let neighborhood: Vec<usize> = network
                    .neighbor_positions(target)
                    .into_iter()
                    .filter(|&nbr| nbr != source && !network.has_edge(source, nbr))
                    .collect();
                if !neighborhood.is_empty() {
                    let nbr = neighborhood[rng.gen_range(0..neighborhood.len())];
                    network.connect(source, nbr);
                    repeated.push(nbr);
                    count += 1;
                    continue;
                }
            }
            // No triangle: fall back to the next preferential target
            target = match candidates.pop() {
                Some(next) => next,
                None => break,
            };
            network.connect(source, target);
            repeated.push(target);
            count += 1;
        }

        repeated.extend(std::iter::repeat(source).take(m));
    }

    Ok(network)
}

/// G(n, p): every pair connected independently with probability `p`.
pub fn erdos_renyi(n: usize, p: f64, rng: &mut SmallRng) -> Result<Network, NetworkError> {
    check_probability(NetworkKind::ErdosRenyi, "p", p)?;

    let mut network = Network::with_nodes(n);
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.gen::<f64>() < p {
                network.connect(a, b);
            }
        }
    }

    Ok(network)
}

/// Barabási–Albert preferential attachment, `m` edges per new node.
///
/// Grows from a star of `m + 1` nodes.
pub fn barabasi_albert(n: usize, m: usize, rng: &mut SmallRng) -> Result<Network, NetworkError> {
    check_attachment(NetworkKind::BarabasiAlbert, n, m)?;

    let mut network = Network::with_nodes(n);
    let mut repeated = Vec::with_capacity(2 * n * m);
    for leaf in 1..=m {
        network.connect(0, leaf);
        repeated.push(0);
        repeated.push(leaf);
    }

    for source in (m + 1)..n {
        let targets = random_subset(&repeated, m, rng);
        for &target in &targets {
            network.connect(source, target);
        }
        repeated.extend(targets);
        repeated.extend(std::iter::repeat(source).take(m));
    }

    Ok(network)
}
