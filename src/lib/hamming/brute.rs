use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

#[cfg(feature = "multithread")]
use rayon::prelude::*;

use super::instance::ResolvingInstance;
use super::resolve::Verdict;

/// Exhaustive decision by direct comparison of distance vectors.
///
/// Vertices are enumerated in lexicographic order and consumed in two
/// nested layers of chunks: a dictionary chunk whose distance vectors are
/// indexed by a hash map, then scan chunks covering every later vertex.
/// Two vertices with equal vectors are a counterexample and come back as
/// the witness pair. Memory stays bounded by the two chunk sizes, never
/// by a^k.
pub fn brute_force(inst: &ResolvingInstance, dict_size: usize, scan_size: usize) -> Verdict {
    assert!(dict_size > 0 && scan_size > 0);

    let members = inst.r();
    let mut start = 0;

    loop {
        let chunk = strings(inst).skip(start).take(dict_size).collect_vec();
        if chunk.is_empty() {
            return Verdict::resolving();
        }

        debug!("dictionary chunk [{start}, {})", start + chunk.len());

        let mut dict: HashMap<Vec<u32>, &String> = HashMap::new();
        for (s, t) in chunk.iter().zip(tags(&chunk, members)) {
            if let Some(prev) = dict.insert(t, s) {
                return Verdict::collision(prev.clone(), s.clone());
            }
        }

        let mut from = start + chunk.len();
        loop {
            let scan = strings(inst).skip(from).take(scan_size).collect_vec();
            if scan.is_empty() {
                break;
            }
            for (s, t) in scan.iter().zip(tags(&scan, members)) {
                if let Some(rep) = dict.get(&t) {
                    return Verdict::collision((*rep).clone(), s.clone());
                }
            }
            from += scan.len();
        }

        start += chunk.len();
    }
}

/// All a^k vertices of H(k, a) in lexicographic order over the alphabet.
fn strings(inst: &ResolvingInstance) -> impl Iterator<Item = String> + '_ {
    std::iter::repeat(inst.alphabet())
        .take(inst.k())
        .multi_cartesian_product()
        .map(|cs| cs.into_iter().collect())
}

pub(crate) fn hamming_dist(x: &str, y: &str) -> u32 {
    x.chars().zip(y.chars()).filter(|(a, b)| a != b).count() as u32
}

/// Distance vector of each vertex in `chunk` against the reference set.
fn tags(chunk: &[String], members: &[String]) -> Vec<Vec<u32>> {
    let tag = |s: &String| members.iter().map(|m| hamming_dist(s, m)).collect_vec();

    cfg_if::cfg_if! {
        if #[cfg(feature = "multithread")] {
            let itr = chunk.par_iter();
        } else {
            let itr = chunk.iter();
        }
    };

    itr.map(tag).collect()
}
