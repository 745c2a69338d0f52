use std::fmt;

use derive_more::Display;
use itertools::Itertools;

/// Symbols used when no alphabet is given: the first `a` of these.
pub const CANONICAL_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[display("k must be positive")]
    KNotPositive,

    #[display("alphabet size must be positive")]
    ANotPositive,

    #[display("no default alphabet of size {a}, pass one explicitly")]
    NoDefaultAlphabet { a: usize },

    #[display("alphabet must contain {expected} distinct symbols, got {got}")]
    BadAlphabet { expected: usize, got: usize },

    #[display("string `{s}` does not have length {k}")]
    BadLength { s: String, k: usize },

    #[display("string `{s}` contains symbol `{c}` outside the alphabet")]
    BadSymbol { s: String, c: char },
}

impl std::error::Error for InstanceError {}

/// A candidate resolving set R on the Hamming graph H(k, a), validated on
/// construction and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvingInstance {
    r: Vec<String>,
    k: usize,
    a: usize,
    alphabet: Vec<char>,
}

impl ResolvingInstance {
    pub fn new(
        r: Vec<String>,
        k: usize,
        a: usize,
        alphabet: Option<Vec<char>>,
    ) -> Result<Self, InstanceError> {
        if k == 0 {
            return Err(InstanceError::KNotPositive);
        }
        if a == 0 {
            return Err(InstanceError::ANotPositive);
        }

        let alphabet = match alphabet {
            Some(sym) => {
                if sym.len() != a || !sym.iter().all_unique() {
                    return Err(InstanceError::BadAlphabet { expected: a, got: sym.len() });
                }
                sym
            }
            None => {
                if a > CANONICAL_ALPHABET.len() {
                    return Err(InstanceError::NoDefaultAlphabet { a });
                }
                CANONICAL_ALPHABET.chars().take(a).collect()
            }
        };

        for s in &r {
            if s.chars().count() != k {
                return Err(InstanceError::BadLength { s: s.clone(), k });
            }
            if let Some(c) = s.chars().find(|c| !alphabet.contains(c)) {
                return Err(InstanceError::BadSymbol { s: s.clone(), c });
            }
        }

        Ok(Self { r, k, a, alphabet })
    }

    pub fn r(&self) -> &[String] {
        &self.r
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn a(&self) -> usize {
        self.a
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of indicator variables in the algebraic encoding.
    pub fn arity(&self) -> usize {
        self.k * self.a
    }
}

impl fmt::Display for ResolvingInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R={{{}}} (a={}, k={})", self.r.iter().join(","), self.a, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet() {
        let inst = ResolvingInstance::new(vec!["01".into(), "20".into()], 2, 3, None).unwrap();
        assert_eq!(inst.alphabet(), &['0', '1', '2']);
        assert_eq!(inst.arity(), 6);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(
            ResolvingInstance::new(vec![], 0, 2, None),
            Err(InstanceError::KNotPositive)
        );
        assert_eq!(
            ResolvingInstance::new(vec![], 1, 0, None),
            Err(InstanceError::ANotPositive)
        );
        assert_eq!(
            ResolvingInstance::new(vec!["000".into()], 2, 2, None),
            Err(InstanceError::BadLength { s: "000".into(), k: 2 })
        );
        assert_eq!(
            ResolvingInstance::new(vec!["02".into()], 2, 2, None),
            Err(InstanceError::BadSymbol { s: "02".into(), c: '2' })
        );
        assert_eq!(
            ResolvingInstance::new(vec![], 1, 2, Some(vec!['x', 'x'])),
            Err(InstanceError::BadAlphabet { expected: 2, got: 2 })
        );
        assert!(ResolvingInstance::new(vec![], 1, 40, None).is_err());
    }

    #[test]
    fn explicit_alphabet() {
        let inst =
            ResolvingInstance::new(vec!["ab".into()], 2, 2, Some(vec!['a', 'b'])).unwrap();
        assert_eq!(inst.to_string(), "R={ab} (a=2, k=2)");
    }
}
