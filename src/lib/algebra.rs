pub mod groebner;
pub mod mono;
pub mod poly;

pub use groebner::{extend, groebner, Basis};
pub use mono::Mono;
pub use poly::{reduce, s_poly, Poly};

/// Exact coefficient field. Groebner computations rely on exact cancellation,
/// so coefficients are arbitrary-precision rationals.
pub type Q = num_rational::BigRational;

pub(crate) fn q(n: i64) -> Q {
    Q::from_integer(n.into())
}
