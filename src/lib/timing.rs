//! Persistent timing records, kept as JSON keyed by method, alphabet size
//! and word length so runs from different machines can be merged.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TimingEntry {
    pub r: Vec<String>,
    pub resolving: bool,
    pub elapsed: f64,
}

type Table = HashMap<String, HashMap<usize, HashMap<usize, Vec<TimingEntry>>>>;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TimingStore {
    entries: Table,
}

impl TimingStore {
    /// Loads a store, treating a missing file as an empty one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let store = serde_json::from_str(&json)?;
        Ok(store)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn record(&mut self, method: &str, a: usize, k: usize, entry: TimingEntry) {
        self.entries
            .entry(method.to_string())
            .or_default()
            .entry(a)
            .or_default()
            .entry(k)
            .or_default()
            .push(entry);
    }

    pub fn count_for(&self, method: &str, a: usize, k: usize) -> usize {
        self.entries
            .get(method)
            .and_then(|m| m.get(&a))
            .and_then(|m| m.get(&k))
            .map_or(0, |v| v.len())
    }

    pub fn merge(&mut self, other: TimingStore) {
        for (method, by_a) in other.entries {
            for (a, by_k) in by_a {
                for (k, entries) in by_k {
                    for e in entries {
                        self.record(&method, a, k, e);
                    }
                }
            }
        }
    }
}

/// Folds the stores at `paths` into one and writes it to `out`.
pub fn merge_files(
    paths: &[impl AsRef<Path>],
    out: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut merged = TimingStore::default();
    for p in paths {
        info!("merge {}", p.as_ref().display());
        merged.merge(TimingStore::load(p)?);
    }
    merged.save(out)?;
    Ok(())
}

/// Repeats `f` until at least `min` has elapsed in total and reports the
/// last result, the mean duration per run and the run count.
pub fn timed_repeat<F, T>(min: Duration, mut f: F) -> (T, Duration, u32)
where
    F: FnMut() -> T,
{
    let start = Instant::now();
    let mut runs = 0;
    loop {
        let res = f();
        runs += 1;
        let total = start.elapsed();
        if total >= min {
            return (res, total / runs, runs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(elapsed: f64) -> TimingEntry {
        TimingEntry { r: vec!["00".into(), "11".into()], resolving: false, elapsed }
    }

    #[test]
    fn record_and_count() {
        let mut store = TimingStore::default();
        assert_eq!(store.count_for("groebner", 2, 3), 0);

        store.record("groebner", 2, 3, entry(0.5));
        store.record("groebner", 2, 3, entry(0.6));
        store.record("brute-force", 2, 3, entry(0.1));

        assert_eq!(store.count_for("groebner", 2, 3), 2);
        assert_eq!(store.count_for("brute-force", 2, 3), 1);
        assert_eq!(store.count_for("groebner", 3, 3), 0);
    }

    #[test]
    fn merge_appends() {
        let mut s1 = TimingStore::default();
        s1.record("groebner", 2, 2, entry(0.5));

        let mut s2 = TimingStore::default();
        s2.record("groebner", 2, 2, entry(0.7));
        s2.record("groebner", 3, 2, entry(0.9));

        s1.merge(s2);
        assert_eq!(s1.count_for("groebner", 2, 2), 2);
        assert_eq!(s1.count_for("groebner", 3, 2), 1);
    }

    #[test]
    fn json_round_trip() {
        let mut store = TimingStore::default();
        store.record("groebner", 2, 3, entry(0.25));

        let path = std::env::temp_dir().join("hamres-timing-test.json");
        store.save(&path).unwrap();
        let back = TimingStore::load(&path).unwrap();
        assert_eq!(back.count_for("groebner", 2, 3), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_empty() {
        let store = TimingStore::load("/nonexistent/timings.json").unwrap();
        assert_eq!(store.count_for("groebner", 2, 2), 0);
    }

    #[test]
    fn timed_repeat_runs_at_least_once() {
        let (res, _, runs) = timed_repeat(Duration::ZERO, || 42);
        assert_eq!(res, 42);
        assert_eq!(runs, 1);
    }
}
