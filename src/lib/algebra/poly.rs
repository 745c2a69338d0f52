use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Signed, Zero};

use super::mono::Mono;
use super::Q;

/// A sparse multivariate polynomial over the rationals. Terms are keyed by
/// monomial under the lex order, so the leading term is the last entry and
/// zero coefficients are never stored.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Poly {
    arity: usize,
    terms: BTreeMap<Mono, Q>,
}

impl Poly {
    pub fn zero(arity: usize) -> Self {
        Self { arity, terms: BTreeMap::new() }
    }

    pub fn one(arity: usize) -> Self {
        Self::constant(arity, Q::one())
    }

    pub fn constant(arity: usize, c: Q) -> Self {
        Self::from_terms(arity, [(Mono::one(arity), c)])
    }

    pub fn variable(arity: usize, i: usize) -> Self {
        Self::from_terms(arity, [(Mono::variable(arity, i), Q::one())])
    }

    pub fn from_terms<I>(arity: usize, terms: I) -> Self
    where
        I: IntoIterator<Item = (Mono, Q)>,
    {
        let mut p = Self::zero(arity);
        for (m, c) in terms {
            p.insert_term(m, c);
        }
        p
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn nterms(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Mono, &Q)> {
        self.terms.iter()
    }

    /// Leading term, the maximum under the monomial order.
    pub fn lead(&self) -> Option<(&Mono, &Q)> {
        self.terms.last_key_value()
    }

    pub fn lead_mono(&self) -> Option<&Mono> {
        self.lead().map(|(m, _)| m)
    }

    pub fn coeff(&self, m: &Mono) -> Q {
        self.terms.get(m).cloned().unwrap_or_else(Q::zero)
    }

    /// True for the constant polynomial `1`, the marker of a trivial ideal.
    pub fn is_const_one(&self) -> bool {
        self.nterms() == 1
            && self.lead().map_or(false, |(m, c)| m.is_one() && c.is_one())
    }

    /// The product of `self` with the single term `c * m`.
    pub fn mul_term(&self, m: &Mono, c: &Q) -> Self {
        if c.is_zero() {
            return Self::zero(self.arity);
        }
        let terms = self.terms.iter().map(|(x, a)| (x.mul(m), a * c));
        Self { arity: self.arity, terms: terms.collect() }
    }

    /// `self` scaled so its leading coefficient is `1`. Zero stays zero.
    pub fn monic(&self) -> Self {
        match self.lead() {
            Some((_, c)) if !c.is_one() => {
                let c = c.clone();
                let terms = self.terms.iter().map(|(x, a)| (x.clone(), a / &c));
                Self { arity: self.arity, terms: terms.collect() }
            }
            _ => self.clone(),
        }
    }

    fn insert_term(&mut self, m: Mono, c: Q) {
        debug_assert_eq!(m.arity(), self.arity);
        if c.is_zero() {
            return;
        }
        match self.terms.entry(m) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(c);
            }
            std::collections::btree_map::Entry::Occupied(mut e) => {
                let sum = e.get() + &c;
                if sum.is_zero() {
                    e.remove();
                } else {
                    *e.get_mut() = sum;
                }
            }
        }
    }
}

impl Add for &Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.arity, rhs.arity);
        let mut out = self.clone();
        for (m, c) in rhs.iter() {
            out.insert_term(m.clone(), c.clone());
        }
        out
    }
}

impl Sub for &Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.arity, rhs.arity);
        let mut out = self.clone();
        for (m, c) in rhs.iter() {
            out.insert_term(m.clone(), -c);
        }
        out
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        let terms = self.terms.iter().map(|(m, c)| (m.clone(), -c));
        Poly { arity: self.arity, terms: terms.collect() }
    }
}

impl Mul for &Poly {
    type Output = Poly;
    fn mul(self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.arity, rhs.arity);
        let mut out = Poly::zero(self.arity);
        for (m, c) in self.iter() {
            for (x, a) in rhs.iter() {
                out.insert_term(m.mul(x), c * a);
            }
        }
        out
    }
}

/// Multivariate division: the remainder of `f` modulo `divisors`. Each step
/// cancels the current leading term against some divisor whose leading
/// monomial divides it, or retires it into the remainder; the current
/// polynomial strictly decreases under the monomial order, so this
/// terminates.
pub fn reduce(f: &Poly, divisors: &[Poly]) -> Poly {
    let arity = f.arity();
    let mut rem = Poly::zero(arity);
    let mut p = f.clone();

    'next: while let Some((m, c)) = p.lead().map(|(m, c)| (m.clone(), c.clone())) {
        for g in divisors {
            let Some((mg, cg)) = g.lead() else { continue };
            if let Some(quot) = m.try_div(mg) {
                let coef = &c / cg;
                p = &p - &g.mul_term(&quot, &coef);
                continue 'next;
            }
        }
        p.terms.remove(&m);
        rem.terms.insert(m, c);
    }

    rem
}

/// The S-polynomial of `f` and `g`, scaled so both leading terms cancel
/// exactly. Zero when either input is zero.
pub fn s_poly(f: &Poly, g: &Poly) -> Poly {
    let (Some((mf, cf)), Some((mg, cg))) = (f.lead(), g.lead()) else {
        return Poly::zero(f.arity());
    };
    let l = mf.lcm(mg);
    let uf = l.try_div(mf).unwrap();
    let ug = l.try_div(mg).unwrap();
    let a = f.mul_term(&uf, &cf.recip());
    let b = g.mul_term(&ug, &cg.recip());
    &a - &b
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (m, c)) in self.terms.iter().rev().enumerate() {
            let neg = c.is_negative();
            if i == 0 {
                if neg {
                    write!(f, "-")?;
                }
            } else {
                write!(f, "{}", if neg { " - " } else { " + " })?;
            }
            let a = c.abs();
            if m.is_one() {
                write!(f, "{a}")?;
            } else if a.is_one() {
                write!(f, "{m}")?;
            } else {
                write!(f, "{a}*{m}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::q;

    fn p(arity: usize, terms: &[(&[(usize, u32)], i64)]) -> Poly {
        Poly::from_terms(
            arity,
            terms.iter().map(|(m, c)| (Mono::from_pairs(arity, m.iter().copied()), q(*c))),
        )
    }

    #[test]
    fn arithmetic() {
        let x = Poly::variable(2, 0);
        let y = Poly::variable(2, 1);
        let s = &x + &y;
        let d = &x - &y;
        assert_eq!(&s * &d, p(2, &[(&[(0, 2)], 1), (&[(1, 2)], -1)]));
        assert_eq!(&s - &s, Poly::zero(2));
        assert_eq!(-&d, &y - &x);
    }

    #[test]
    fn leading_term() {
        // lex: x^2 beats x*y^3 beats y^5.
        let f = p(2, &[(&[(1, 5)], 7), (&[(0, 1), (1, 3)], 2), (&[(0, 2)], 1)]);
        let (m, c) = f.lead().unwrap();
        assert_eq!(*m, Mono::from_pairs(2, [(0, 2)]));
        assert_eq!(*c, q(1));
    }

    #[test]
    fn monic_normalization() {
        let f = p(2, &[(&[(0, 1)], 2), (&[], -4)]);
        let g = f.monic();
        assert_eq!(g, p(2, &[(&[(0, 1)], 1), (&[], -2)]));
        assert_eq!(Poly::zero(2).monic(), Poly::zero(2));
        assert!(Poly::one(2).is_const_one());
    }

    #[test]
    fn division_remainder() {
        // 2x^4 - x^2 + y^3 + y^2 mod [x^3 - x, y^3 - y] = x^2 + y^2 + y.
        let f = p(2, &[(&[(0, 4)], 2), (&[(0, 2)], -1), (&[(1, 3)], 1), (&[(1, 2)], 1)]);
        let g1 = p(2, &[(&[(0, 3)], 1), (&[(0, 1)], -1)]);
        let g2 = p(2, &[(&[(1, 3)], 1), (&[(1, 1)], -1)]);
        let r = reduce(&f, &[g1.clone(), g2.clone()]);
        assert_eq!(r, p(2, &[(&[(0, 2)], 1), (&[(1, 2)], 1), (&[(1, 1)], 1)]));

        // reducing an already-reduced polynomial changes nothing.
        assert_eq!(reduce(&r, &[g1, g2]), r);
    }

    #[test]
    fn s_polynomial_cancels_leads() {
        let f1 = p(2, &[(&[(0, 2)], 1), (&[(1, 2)], 1), (&[], -1)]);
        let f2 = p(2, &[(&[(0, 1), (1, 1)], 1), (&[], -2)]);
        let s = s_poly(&f1, &f2);
        assert_eq!(s, p(2, &[(&[(0, 1)], 2), (&[(1, 3)], 1), (&[(1, 1)], -1)]));
    }
}
