pub mod algebra;
pub mod hamming;
pub mod io;
pub mod timing;

pub use hamming::instance::{InstanceError, ResolvingInstance};
pub use hamming::resolve::{
    check_resolving, check_resolving_par, cross_check, DecideOpts, Disagreement, Method, Verdict,
};
pub use hamming::brute::brute_force;
pub use hamming::hypercube::check_hypercube_resolving;
