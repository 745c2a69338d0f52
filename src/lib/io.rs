//! Tab-separated input/output for batches of instances.

use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::hamming::instance::ResolvingInstance;
use crate::hamming::resolve::Verdict;

/// One input line: a candidate set, its alphabet and the word length.
/// `R` and `alphabet` are comma-separated within their fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InstanceRecord {
    #[serde(rename = "R")]
    pub r: String,
    pub alphabet: String,
    pub k: usize,
}

impl InstanceRecord {
    pub fn instance(&self) -> Result<ResolvingInstance, Box<dyn Error>> {
        let r = split_list(&self.r);
        let alphabet = parse_alphabet(&self.alphabet)?;
        let a = alphabet.len();
        let inst = ResolvingInstance::new(r, self.k, a, Some(alphabet))?;
        Ok(inst)
    }
}

/// One output line: the input echoed back with the verdict appended.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResultRecord {
    #[serde(rename = "R")]
    pub r: String,
    pub alphabet: String,
    pub k: usize,
    pub resolving: bool,
    pub witness: String,
}

impl ResultRecord {
    pub fn new(rec: &InstanceRecord, v: &Verdict) -> Self {
        let witness = match &v.witness {
            Some((x, y)) => format!("{x},{y}"),
            None => String::new(),
        };
        Self {
            r: rec.r.clone(),
            alphabet: rec.alphabet.clone(),
            k: rec.k,
            resolving: v.resolving,
            witness,
        }
    }
}

/// One line of curated reference data with a known verdict. The alphabet
/// is implied: the first `a` symbols of the canonical one.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExpectedRecord {
    pub k: usize,
    pub a: usize,
    #[serde(rename = "R")]
    pub r: String,
    pub resolving: bool,
}

impl ExpectedRecord {
    pub fn instance(&self) -> Result<ResolvingInstance, Box<dyn Error>> {
        let inst = ResolvingInstance::new(split_list(&self.r), self.k, self.a, None)?;
        Ok(inst)
    }
}

pub fn read_instances(path: impl AsRef<Path>) -> Result<Vec<InstanceRecord>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b'\t').from_path(path)?;
    let mut res = vec![];
    for rec in reader.deserialize() {
        res.push(rec?);
    }
    Ok(res)
}

pub fn write_results(path: impl AsRef<Path>, results: &[ResultRecord]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for rec in results {
        writer.serialize(rec)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_expected(path: impl AsRef<Path>) -> Result<Vec<ExpectedRecord>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b'\t').from_path(path)?;
    let mut res = vec![];
    for rec in reader.deserialize() {
        res.push(rec?);
    }
    Ok(res)
}

fn split_list(field: &str) -> Vec<String> {
    field.split(',').map(|s| s.to_string()).collect()
}

fn parse_alphabet(field: &str) -> Result<Vec<char>, Box<dyn Error>> {
    field
        .split(',')
        .map(|s| {
            let mut cs = s.chars();
            match (cs.next(), cs.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("alphabet symbols must be single characters, got `{s}`").into()),
            }
        })
        .collect()
}
