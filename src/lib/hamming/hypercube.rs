use log::info;

use super::encode::linear_polys;
use super::instance::InstanceError;
use crate::algebra::{extend, q, Basis, Poly, Q};

/// Specialized encoding for a = 2. A binary position collapses to a single
/// +-1 variable, so H(k, 2) needs k variables instead of 2k, and only
/// floor(k/2) counting constraints are meaningful.
pub fn check_hypercube_resolving(r: &[String], k: usize) -> Result<bool, InstanceError> {
    for s in r {
        if s.chars().count() != k {
            return Err(InstanceError::BadLength { s: s.clone(), k });
        }
        if let Some(c) = s.chars().find(|&c| c != '0' && c != '1') {
            return Err(InstanceError::BadSymbol { s: s.clone(), c });
        }
    }

    info!("hypercube encode R={{{}}} (k={k})", r.join(", "));

    let base = extend(&hypercube_basis(k), linear_polys(hypercube_matrix(r), k));
    for (i, f) in hypercube_counting(k).into_iter().enumerate() {
        if !extend(&base, vec![f]).is_trivial() {
            info!("extension {} is non-trivial: not resolving", i + 1);
            return Ok(false);
        }
    }
    Ok(true)
}

/// z_i^3 - z_i for each coordinate, already a reduced basis.
fn hypercube_basis(k: usize) -> Basis {
    let gens = (0..k)
        .map(|i| {
            let z = Poly::variable(k, i);
            &(&z * &(&z * &z)) - &z
        })
        .collect();
    Basis::assume_reduced(k, gens)
}

/// sum_j z_j^2 - 2i for i = 1 ..= floor(k/2).
fn hypercube_counting(k: usize) -> Vec<Poly> {
    (1..=k / 2)
        .map(|i| {
            let mut f = Poly::constant(k, -q(2 * i as i64));
            for j in 0..k {
                let z = Poly::variable(k, j);
                f = &f + &(&z * &z);
            }
            f
        })
        .collect()
}

/// One row per member of R: '0' maps to -1 and '1' to +1.
fn hypercube_matrix(r: &[String]) -> Vec<Vec<Q>> {
    r.iter()
        .map(|s| s.chars().map(|c| if c == '0' { -q(1) } else { q(1) }).collect())
        .collect()
}
