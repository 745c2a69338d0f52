use derive_more::Display;
use log::{debug, info};

#[cfg(feature = "multithread")]
use rayon::prelude::*;

use super::brute::brute_force;
use super::encode::{constraint_matrix, counting_polys, linear_polys, pattern_basis};
use super::instance::ResolvingInstance;
use crate::algebra::{extend, Basis};

/// Outcome of one decision. The algebraic engines never produce a witness;
/// the brute-force engine reports the colliding pair when one exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub resolving: bool,
    pub witness: Option<(String, String)>,
}

impl Verdict {
    pub fn resolving() -> Self {
        Self { resolving: true, witness: None }
    }

    pub fn collision(x: String, y: String) -> Self {
        Self { resolving: false, witness: Some((x, y)) }
    }

    pub fn from_bool(resolving: bool) -> Self {
        Self { resolving, witness: None }
    }
}

/// The closed set of decision procedures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Chunked exact comparison of distance vectors.
    BruteForce,
    /// Incremental Groebner bases, extensions tested in order.
    Groebner,
    /// Incremental Groebner bases, extensions fanned out to the thread pool.
    ParallelGroebner,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::BruteForce => "brute-force",
            Method::Groebner => "groebner",
            Method::ParallelGroebner => "parallel-groebner",
        }
    }

    pub fn decide(self, inst: &ResolvingInstance, opts: &DecideOpts) -> Verdict {
        info!("method: {self}");
        match self {
            Method::BruteForce => brute_force(inst, opts.dict_size, opts.scan_size),
            Method::Groebner => Verdict::from_bool(check_resolving(inst)),
            Method::ParallelGroebner => Verdict::from_bool(check_resolving_par(inst)),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs that only concern the brute-force engine.
#[derive(Clone, Copy, Debug)]
pub struct DecideOpts {
    pub dict_size: usize,
    pub scan_size: usize,
}

impl Default for DecideOpts {
    fn default() -> Self {
        Self { dict_size: 100_000, scan_size: 100_000 }
    }
}

/// The shared prefix of every extension test: the reduced basis of the
/// pattern ideal joined with the linear constraints derived from R.
pub fn base_basis(inst: &ResolvingInstance) -> Basis {
    info!("encode {inst}");

    let pattern = pattern_basis(inst.k(), inst.a());
    let linear = linear_polys(constraint_matrix(inst), inst.arity());
    debug!("{} pattern elements, {} linear equations", pattern.len(), linear.len());

    let base = extend(&pattern, linear);
    debug!("base basis: {} elements", base.len());
    base
}

/// Algebraic decision, extensions evaluated in index order with a stop at
/// the first non-trivial one.
pub fn check_resolving(inst: &ResolvingInstance) -> bool {
    let base = base_basis(inst);
    for (i, f) in counting_polys(inst.k(), inst.a()).into_iter().enumerate() {
        let gi = extend(&base, vec![f]);
        if !gi.is_trivial() {
            info!("extension {} is non-trivial: {inst} is not resolving", i + 1);
            return false;
        }
    }
    true
}

/// Algebraic decision with all k extensions dispatched to the worker pool.
/// `find_any` stops handing out work once any failure is observed; the
/// verdict is a conjunction of independent checks, so this matches the
/// sequential result. Without the `multithread` feature this degrades to
/// the sequential scan.
pub fn check_resolving_par(inst: &ResolvingInstance) -> bool {
    let base = base_basis(inst);
    let fs = counting_polys(inst.k(), inst.a());

    cfg_if::cfg_if! {
        if #[cfg(feature = "multithread")] {
            let failed = fs
                .into_par_iter()
                .enumerate()
                .find_any(|(_, f)| !extend(&base, vec![f.clone()]).is_trivial());
        } else {
            let failed = fs
                .into_iter()
                .enumerate()
                .find(|(_, f)| !extend(&base, vec![f.clone()]).is_trivial());
        }
    }

    if let Some((i, _)) = failed {
        info!("extension {} is non-trivial: {inst} is not resolving", i + 1);
        false
    } else {
        true
    }
}

/// Raised when the two independent decision procedures contradict each
/// other: a correctness bug in one of the engines, never a normal outcome.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("decision procedures disagree on {inst}: groebner says {algebraic}, brute-force says {brute}")]
pub struct Disagreement {
    pub inst: ResolvingInstance,
    pub algebraic: bool,
    pub brute: bool,
}

impl std::error::Error for Disagreement {}

/// Runs both engines on the same instance and fails loudly when their
/// verdicts differ. The returned verdict carries the brute-force witness.
pub fn cross_check(inst: &ResolvingInstance, opts: &DecideOpts) -> Result<Verdict, Disagreement> {
    let algebraic = check_resolving(inst);
    let exact = brute_force(inst, opts.dict_size, opts.scan_size);

    if algebraic != exact.resolving {
        return Err(Disagreement {
            inst: inst.clone(),
            algebraic,
            brute: exact.resolving,
        });
    }
    Ok(exact)
}
