pub mod brute;
pub mod encode;
pub mod hypercube;
pub mod instance;
pub mod resolve;

pub use instance::{InstanceError, ResolvingInstance};
pub use resolve::{Method, Verdict};
