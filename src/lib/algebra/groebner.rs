use std::collections::{BTreeSet, HashMap, VecDeque};

use delegate::delegate;
use log::debug;

use super::mono::Mono;
use super::poly::{reduce, s_poly, Poly};

/// A reduced Groebner basis, immutable once returned: every element is monic
/// and fully reduced against the rest, no leading monomial divides another's,
/// and elements are sorted descending by leading monomial.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Basis {
    arity: usize,
    elems: Vec<Poly>,
}

impl Basis {
    pub fn empty(arity: usize) -> Self {
        Self { arity, elems: vec![] }
    }

    /// Wraps polynomials already known to form a reduced Groebner basis,
    /// such as the closed-form pattern ideal. The caller asserts reducedness.
    pub(crate) fn assume_reduced(arity: usize, mut elems: Vec<Poly>) -> Self {
        elems.sort_by(|p, q| q.lead_mono().cmp(&p.lead_mono()));
        Self { arity, elems }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn elems(&self) -> &[Poly] {
        &self.elems
    }

    delegate! {
        to self.elems {
            pub fn len(&self) -> usize;
            pub fn is_empty(&self) -> bool;
        }
    }

    /// A basis equal to `{1}` generates the whole ring: the corresponding
    /// equation system has no solution.
    pub fn is_trivial(&self) -> bool {
        self.elems.len() == 1 && self.elems[0].is_const_one()
    }

    /// Unique remainder of `f` modulo this basis.
    pub fn reduce(&self, f: &Poly) -> Poly {
        reduce(f, &self.elems)
    }

    /// Ideal membership test.
    pub fn contains(&self, f: &Poly) -> bool {
        self.reduce(f).is_zero()
    }
}

/// The reduced Groebner basis of the ideal generated by `gens`.
pub fn groebner(arity: usize, gens: Vec<Poly>) -> Basis {
    extend(&Basis::empty(arity), gens)
}

/// Incremental Buchberger: the reduced Groebner basis of the ideal generated
/// by `base` together with `gens`, reusing `base` instead of recomputing it.
pub fn extend(base: &Basis, gens: Vec<Poly>) -> Basis {
    Buchberger::run(base, gens)
}

/// Working state of one Groebner computation. Polynomials live in an arena
/// with stable integer handles; the basis and the critical-pair set are index
/// sets over that arena, so retiring a redundant element never invalidates a
/// pending pair.
struct Buchberger {
    arena: Vec<Poly>,
    index: HashMap<Poly, usize>,
    basis: BTreeSet<usize>,
    pairs: BTreeSet<(usize, usize)>,
}

impl Buchberger {
    fn run(base: &Basis, gens: Vec<Poly>) -> Basis {
        let arity = base.arity;

        // seed: the previous reduced basis, then each surviving new
        // generator reduced against everything accepted so far.
        let mut arena: Vec<Poly> = base.elems.clone();
        let old = arena.len();
        for p in gens {
            if p.is_zero() {
                continue;
            }
            let r = reduce(&p, &arena);
            if !r.is_zero() {
                arena.push(r);
            }
        }
        if arena.is_empty() {
            return Basis::empty(arity);
        }

        let total = arena.len();
        let index = arena.iter().cloned().enumerate().map(|(i, p)| (p, i)).collect();
        let mut this = Self {
            arena,
            index,
            basis: (0..old).collect(),
            pairs: BTreeSet::new(),
        };

        // fresh generators enter the update cycle smallest leading monomial
        // first, as in GROEBNERNEWS2.
        let mut fresh: Vec<usize> = (old..total).collect();
        fresh.sort_by(|&i, &j| this.lm(i).cmp(this.lm(j)).then(i.cmp(&j)));
        for ih in fresh {
            this.update(ih);
        }

        let mut zero_reductions = 0;
        while let Some((i, j)) = this.select() {
            this.pairs.remove(&(i, j));
            let s = s_poly(&this.arena[i], &this.arena[j]);
            match this.normal(&s) {
                Some(ih) => this.update(ih),
                None => zero_reductions += 1,
            }
        }

        debug!(
            "basis complete: {} elements, {} reductions to zero",
            this.basis.len(),
            zero_reductions
        );

        this.finish(arity)
    }

    fn lm(&self, i: usize) -> &Mono {
        self.arena[i].lead_mono().unwrap()
    }

    /// The pending pair minimizing the lcm of its leading monomials.
    /// Ties break on the index pair, keeping selection deterministic.
    fn select(&self) -> Option<(usize, usize)> {
        self.pairs
            .iter()
            .copied()
            .min_by_key(|&(i, j)| (self.lm(i).lcm(self.lm(j)), i, j))
    }

    /// Reduces `g` against the given basis members; a nonzero remainder is
    /// normalized to monic and interned into the arena.
    fn normal_against(&mut self, g: &Poly, members: &[usize]) -> Option<usize> {
        let mut divisors: Vec<Poly> = members.iter().map(|&j| self.arena[j].clone()).collect();
        divisors.sort_by(|p, q| p.lead_mono().cmp(&q.lead_mono()));

        let h = reduce(g, &divisors);
        if h.is_zero() {
            return None;
        }
        let h = h.monic();
        if let Some(&i) = self.index.get(&h) {
            return Some(i);
        }
        let i = self.arena.len();
        self.index.insert(h.clone(), i);
        self.arena.push(h);
        Some(i)
    }

    fn normal(&mut self, g: &Poly) -> Option<usize> {
        let members: Vec<usize> = self.basis.iter().copied().collect();
        self.normal_against(g, &members)
    }

    /// One incremental update cycle for the new basis element `ih`,
    /// after [BW] page 230: filter the candidate pairs (h, g) through the
    /// coprimality criterion and the lcm-cover criterion, prune superseded
    /// old pairs, and retire basis elements h makes redundant.
    fn update(&mut self, ih: usize) {
        let mh = self.lm(ih).clone();

        let mut cand: VecDeque<usize> = self.basis.iter().copied().collect();
        let mut kept: Vec<(usize, bool)> = vec![];
        while let Some(ig) = cand.pop_front() {
            let lcm_hg = mh.lcm(self.lm(ig));
            let coprime = mh.is_coprime(self.lm(ig));
            let covers = |ip: usize| mh.lcm(self.lm(ip)).divides(&lcm_hg);
            if coprime
                || (!cand.iter().any(|&ip| covers(ip)) && !kept.iter().any(|&(ip, _)| covers(ip)))
            {
                kept.push((ig, coprime));
            }
        }

        // coprime leading monomials always reduce to zero; drop those pairs.
        let new_pairs: Vec<(usize, usize)> =
            kept.iter().filter(|&&(_, cop)| !cop).map(|&(ig, _)| (ih, ig)).collect();

        // an old pair survives unless h strictly refines its lcm relation.
        let old_pairs = std::mem::take(&mut self.pairs);
        for (i1, i2) in old_pairs {
            let keep = {
                let m1 = self.lm(i1);
                let m2 = self.lm(i2);
                let lcm12 = m1.lcm(m2);
                !mh.divides(&lcm12) || m1.lcm(&mh) == lcm12 || m2.lcm(&mh) == lcm12
            };
            if keep {
                self.pairs.insert((i1, i2));
            }
        }
        self.pairs.extend(new_pairs);

        let arena = &self.arena;
        self.basis
            .retain(|&ig| !mh.divides(arena[ig].lead_mono().unwrap()));
        self.basis.insert(ih);
    }

    /// Inter-reduce the completed basis and drop redundant elements.
    fn finish(mut self, arity: usize) -> Basis {
        let members: Vec<usize> = self.basis.iter().copied().collect();
        let mut keep = BTreeSet::new();
        for &ig in &members {
            let others: Vec<usize> = members.iter().copied().filter(|&j| j != ig).collect();
            let g = self.arena[ig].clone();
            if let Some(ih) = self.normal_against(&g, &others) {
                keep.insert(ih);
            }
        }

        let mut elems: Vec<Poly> = keep.into_iter().map(|i| self.arena[i].clone()).collect();
        elems.sort_by(|p, q| q.lead_mono().cmp(&p.lead_mono()));
        Basis { arity, elems }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::algebra::{q, Q};

    fn qr(n: i64, d: i64) -> Q {
        Q::new(BigInt::from(n), BigInt::from(d))
    }

    fn p(arity: usize, terms: &[(&[(usize, u32)], Q)]) -> Poly {
        Poly::from_terms(
            arity,
            terms
                .iter()
                .map(|(m, c)| (Mono::from_pairs(arity, m.iter().copied()), c.clone())),
        )
    }

    fn assert_reduced(g: &Basis) {
        for f in g.elems() {
            assert_eq!(*f, f.monic(), "element not monic: {f}");
        }
        for (i, f) in g.elems().iter().enumerate() {
            for (j, h) in g.elems().iter().enumerate() {
                if i != j {
                    let mf = f.lead_mono().unwrap();
                    let mh = h.lead_mono().unwrap();
                    assert!(!mf.divides(mh), "leading monomial of {f} divides that of {h}");
                }
            }
        }
    }

    #[test]
    fn trivial_ideal() {
        let x = Poly::variable(1, 0);
        let g = groebner(1, vec![x.clone(), &x + &Poly::one(1)]);
        assert!(g.is_trivial());
        assert_eq!(g.elems(), &[Poly::one(1)]);
    }

    #[test]
    fn circle_hyperbola() {
        // lex basis of <x^2 + y^2 - 1, x*y - 2>.
        let f1 = p(2, &[(&[(0, 2)], q(1)), (&[(1, 2)], q(1)), (&[], q(-1))]);
        let f2 = p(2, &[(&[(0, 1), (1, 1)], q(1)), (&[], q(-2))]);
        let g = groebner(2, vec![f1, f2]);

        let e1 = p(2, &[(&[(0, 1)], q(1)), (&[(1, 3)], qr(1, 2)), (&[(1, 1)], qr(-1, 2))]);
        let e2 = p(2, &[(&[(1, 4)], q(1)), (&[(1, 2)], q(-1)), (&[], q(4))]);
        assert_eq!(g.elems(), &[e1, e2]);
        assert_reduced(&g);

        // 2x^3 + y^3 + 3y = 2x*f1 - 2y*f2 + 2*(x + y^3/2 - y/2).
        let f = p(2, &[(&[(0, 3)], q(2)), (&[(1, 3)], q(1)), (&[(1, 1)], q(3))]);
        assert!(g.contains(&f));
        assert!(!g.contains(&(&f + &Poly::one(2))));
    }

    #[test]
    fn incremental_matches_batch() {
        let f1 = p(2, &[(&[(0, 2)], q(1)), (&[(1, 2)], q(1)), (&[], q(-1))]);
        let f2 = p(2, &[(&[(0, 1), (1, 1)], q(1)), (&[], q(-2))]);

        let batch = groebner(2, vec![f1.clone(), f2.clone()]);
        let step = extend(&groebner(2, vec![f1]), vec![f2]);
        assert_eq!(batch, step);
    }

    #[test]
    fn redundant_generator_changes_nothing() {
        let f1 = p(2, &[(&[(0, 3)], q(1)), (&[(0, 1)], q(-1))]);
        let f2 = p(2, &[(&[(1, 3)], q(1)), (&[(1, 1)], q(-1))]);
        let g = groebner(2, vec![f1.clone(), f2]);

        // f1 is in the ideal already; inserting it must return the same basis.
        let h = extend(&g, vec![f1]);
        assert_eq!(g, h);
    }

    #[test]
    fn deterministic() {
        let f1 = p(3, &[(&[(0, 1), (1, 1)], q(1)), (&[(2, 2)], q(-1))]);
        let f2 = p(3, &[(&[(1, 2)], q(1)), (&[(2, 1)], q(-3))]);
        let f3 = p(3, &[(&[(0, 2)], q(1)), (&[(2, 1)], q(1)), (&[], q(-1))]);

        let a = groebner(3, vec![f1.clone(), f2.clone(), f3.clone()]);
        let b = groebner(3, vec![f1, f2, f3]);
        assert_eq!(a, b);
        assert_reduced(&a);
    }

    #[test]
    fn empty_inputs() {
        let g = groebner(2, vec![]);
        assert!(g.is_empty());
        assert!(!g.is_trivial());

        let x = Poly::variable(2, 0);
        assert_eq!(g.reduce(&x), x);
    }
}
