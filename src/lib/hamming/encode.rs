use itertools::Itertools;
use num_traits::{One, Zero};

use super::instance::ResolvingInstance;
use crate::algebra::{q, Basis, Mono, Poly, Q};

/// The closed-form pattern ideal for H(k, a): per position block, the
/// indicator variables of symbols 1..a satisfy the cubic, pairwise and
/// triple product relations. The generators form a reduced Groebner basis
/// as written, so no computation is needed here.
pub fn pattern_basis(k: usize, a: usize) -> Basis {
    let n = k * a;
    let mut gens = vec![];

    for b in 0..k {
        let off = b * a;
        for i in 1..a {
            gens.push(Poly::from_terms(
                n,
                [
                    (Mono::from_pairs(n, [(off + i, 3)]), Q::one()),
                    (Mono::from_pairs(n, [(off + i, 1)]), -Q::one()),
                ],
            ));
        }
        for pair in (1..a).combinations(2) {
            let (i, j) = (off + pair[0], off + pair[1]);
            gens.push(Poly::from_terms(
                n,
                [
                    (Mono::from_pairs(n, [(i, 2), (j, 1)]), Q::one()),
                    (Mono::from_pairs(n, [(i, 1), (j, 2)]), Q::one()),
                ],
            ));
        }
        for t in (1..a).combinations(3) {
            gens.push(Poly::from_terms(
                n,
                [(
                    Mono::from_pairs(n, [(off + t[0], 1), (off + t[1], 1), (off + t[2], 1)]),
                    Q::one(),
                )],
            ));
        }
    }

    Basis::assume_reduced(n, gens)
}

/// The counting polynomials `(sum z_j^2) - 2i` for i = 1..k. The i-th
/// extension ideal is trivial exactly when no two vertices with i differing
/// positions are equidistant from R.
pub fn counting_polys(k: usize, a: usize) -> Vec<Poly> {
    let n = k * a;
    let sq = Poly::from_terms(
        n,
        (0..n).map(|j| (Mono::from_pairs(n, [(j, 2)]), Q::one())),
    );
    (1..=k).map(|i| &sq - &Poly::constant(n, q(2 * i as i64))).collect()
}

/// One row per member of R: the position-major flattening of its one-hot
/// indicator matrix.
pub fn one_hot_rows(inst: &ResolvingInstance) -> Vec<Vec<Q>> {
    let a = inst.a();
    inst.r()
        .iter()
        .map(|s| {
            let mut row = vec![Q::zero(); inst.arity()];
            for (i, c) in s.chars().enumerate() {
                let j = inst.alphabet().iter().position(|&x| x == c).unwrap();
                row[i * a + j] = Q::one();
            }
            row
        })
        .collect()
}

/// The full linear system for an instance: one-hot rows of R stacked with
/// the k per-position indicator-sum rows.
pub fn constraint_matrix(inst: &ResolvingInstance) -> Vec<Vec<Q>> {
    let (k, a) = (inst.k(), inst.a());
    let mut rows = one_hot_rows(inst);
    for i in 0..k {
        let mut row = vec![Q::zero(); k * a];
        for j in 0..a {
            row[i * a + j] = Q::one();
        }
        rows.push(row);
    }
    rows
}

/// In-place Gauss-Jordan elimination to reduced row-echelon form, in exact
/// arithmetic.
pub fn rref(mat: &mut [Vec<Q>]) {
    let rows = mat.len();
    if rows == 0 {
        return;
    }
    let cols = mat[0].len();

    let mut r = 0;
    for c in 0..cols {
        let Some(pivot) = (r..rows).find(|&i| !mat[i][c].is_zero()) else {
            continue;
        };
        mat.swap(r, pivot);

        let pv = mat[r][c].clone();
        for x in mat[r].iter_mut() {
            *x = &*x / &pv;
        }

        for i in 0..rows {
            if i == r || mat[i][c].is_zero() {
                continue;
            }
            let f = mat[i][c].clone();
            for j in 0..cols {
                let t = &mat[r][j] * &f;
                mat[i][j] = &mat[i][j] - &t;
            }
        }

        r += 1;
        if r == rows {
            break;
        }
    }
}

/// Row-reduces the matrix and converts each nonzero row into a linear
/// polynomial, emitted bottom row first.
pub fn linear_polys(mut mat: Vec<Vec<Q>>, arity: usize) -> Vec<Poly> {
    rref(&mut mat);
    let mut polys: Vec<Poly> = mat
        .iter()
        .filter(|row| row.iter().any(|c| !c.is_zero()))
        .map(|row| {
            Poly::from_terms(
                arity,
                row.iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_zero())
                    .map(|(j, c)| (Mono::variable(arity, j), c.clone())),
            )
        })
        .collect();
    polys.reverse();
    polys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::groebner;

    fn inst(r: &[&str], k: usize, a: usize) -> ResolvingInstance {
        ResolvingInstance::new(r.iter().map(|s| s.to_string()).collect(), k, a, None).unwrap()
    }

    #[test]
    fn pattern_generator_count() {
        // per block: (a-1) cubics + C(a-1, 2) pairs + C(a-1, 3) triples.
        assert_eq!(pattern_basis(2, 2).len(), 2);
        assert_eq!(pattern_basis(1, 3).len(), 3);
        assert_eq!(pattern_basis(2, 4).len(), 2 * (3 + 3 + 1));
    }

    #[test]
    fn pattern_is_a_reduced_basis() {
        // re-deriving the closed form with the full algorithm must be a no-op.
        for (k, a) in [(1, 4), (2, 3)] {
            let known = pattern_basis(k, a);
            let derived = groebner(k * a, known.elems().to_vec());
            assert_eq!(known, derived);
        }
    }

    #[test]
    fn counting_poly_shape() {
        let fs = counting_polys(2, 2);
        assert_eq!(fs.len(), 2);
        // f_1 = z1^2 + z2^2 + z3^2 + z4^2 - 2.
        assert_eq!(fs[0].nterms(), 5);
        assert_eq!(fs[0].coeff(&Mono::one(4)), q(-2));
        assert_eq!(fs[1].coeff(&Mono::one(4)), q(-4));
        assert_eq!(fs[0].coeff(&Mono::from_pairs(4, [(3, 2)])), q(1));
    }

    #[test]
    fn one_hot_layout() {
        let rows = one_hot_rows(&inst(&["01", "10"], 2, 2));
        let num: Vec<Vec<i64>> = rows
            .iter()
            .map(|r| r.iter().map(|c| if c.is_zero() { 0 } else { 1 }).collect())
            .collect();
        assert_eq!(num, vec![vec![1, 0, 0, 1], vec![0, 1, 1, 0]]);
    }

    #[test]
    fn rref_and_linear_polys() {
        let m = constraint_matrix(&inst(&["00", "11"], 2, 2));
        let polys = linear_polys(m, 4);

        let z = |i: usize| Poly::variable(4, i);
        assert_eq!(
            polys,
            vec![&z(2) + &z(3), &z(1) + &z(3), &z(0) - &z(3)]
        );
    }

    #[test]
    fn rref_handles_dependent_rows() {
        let mut m = vec![
            vec![q(2), q(4)],
            vec![q(1), q(2)],
        ];
        rref(&mut m);
        assert_eq!(m, vec![vec![q(1), q(2)], vec![q(0), q(0)]]);
    }
}
