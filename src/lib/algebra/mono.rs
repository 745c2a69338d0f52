use std::fmt;

use itertools::Itertools;

/// A monomial in a fixed number of indeterminates, stored as its exponent
/// vector. The derived ordering on the exponent vector is exactly the lex
/// monomial order (the first differing exponent decides, variables with
/// smaller index take precedence), so monomials must only be compared within
/// a single ring.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mono(Vec<u32>);

impl Mono {
    pub fn one(arity: usize) -> Self {
        Self(vec![0; arity])
    }

    pub fn variable(arity: usize, i: usize) -> Self {
        Self::from_pairs(arity, [(i, 1)])
    }

    pub fn from_pairs<I>(arity: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, u32)>,
    {
        let mut e = vec![0; arity];
        for (i, d) in pairs {
            e[i] += d;
        }
        Self(e)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn is_one(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.arity(), other.arity());
        Self(Iterator::zip(self.0.iter(), other.0.iter()).map(|(a, b)| a + b).collect())
    }

    pub fn lcm(&self, other: &Self) -> Self {
        debug_assert_eq!(self.arity(), other.arity());
        Self(Iterator::zip(self.0.iter(), other.0.iter()).map(|(a, b)| *a.max(b)).collect())
    }

    /// Exponent-wise quotient, `None` when `other` does not divide `self`.
    pub fn try_div(&self, other: &Self) -> Option<Self> {
        debug_assert_eq!(self.arity(), other.arity());
        Iterator::zip(self.0.iter(), other.0.iter())
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Does `self` divide `other`?
    pub fn divides(&self, other: &Self) -> bool {
        debug_assert_eq!(self.arity(), other.arity());
        Iterator::zip(self.0.iter(), other.0.iter()).all(|(a, b)| a <= b)
    }

    /// True when the two monomials share no variable.
    pub fn is_coprime(&self, other: &Self) -> bool {
        debug_assert_eq!(self.arity(), other.arity());
        Iterator::zip(self.0.iter(), other.0.iter()).all(|(a, b)| *a == 0 || *b == 0)
    }
}

impl fmt::Display for Mono {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        let s = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, &e)| e > 0)
            .map(|(i, &e)| {
                if e == 1 {
                    format!("z{}", i + 1)
                } else {
                    format!("z{}^{}", i + 1, e)
                }
            })
            .join("*");
        write!(f, "{s}")
    }
}

impl fmt::Debug for Mono {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_lcm() {
        let x = Mono::from_pairs(3, [(0, 2), (1, 1)]);
        let y = Mono::from_pairs(3, [(1, 2), (2, 1)]);
        assert_eq!(x.mul(&y), Mono::from_pairs(3, [(0, 2), (1, 3), (2, 1)]));
        assert_eq!(x.lcm(&y), Mono::from_pairs(3, [(0, 2), (1, 2), (2, 1)]));
    }

    #[test]
    fn division() {
        let x = Mono::from_pairs(2, [(0, 2), (1, 1)]);
        let y = Mono::variable(2, 0);
        assert_eq!(x.try_div(&y), Some(Mono::from_pairs(2, [(0, 1), (1, 1)])));
        assert_eq!(y.try_div(&x), None);
        assert!(y.divides(&x));
        assert!(!x.divides(&y));
    }

    #[test]
    fn coprime() {
        let x = Mono::from_pairs(3, [(0, 2)]);
        let y = Mono::from_pairs(3, [(2, 1)]);
        let z = Mono::from_pairs(3, [(0, 1), (2, 1)]);
        assert!(x.is_coprime(&y));
        assert!(!x.is_coprime(&z));
        assert_eq!(x.mul(&y), x.lcm(&y));
    }

    #[test]
    fn lex_order() {
        // z1 > z2^5 > z2 > 1 under lex.
        let m1 = Mono::variable(2, 0);
        let m2 = Mono::from_pairs(2, [(1, 5)]);
        let m3 = Mono::variable(2, 1);
        let one = Mono::one(2);
        assert!(m1 > m2);
        assert!(m2 > m3);
        assert!(m3 > one);
    }
}
