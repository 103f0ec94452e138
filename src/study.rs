//! Experimental comparison of the balanced and unbalanced trees.
//!
//! For every configured size and key order the study builds both trees from the same keys and
//! then looks up every value in `0..2n` (so half the lookups miss), averaging wall-clock time over
//! a number of repetitions after a few warmup rounds. Results come out as CSV rows.

use std::hint::black_box;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use log::info;
use num_traits::{NumCast, PrimInt};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use crate::{BinarySearchTree, OrderedCollection, RedBlackTree, TreeError};

pub const CSV_HEADER: &str = "n,mode,build_bst_ns,build_rbt_ns,search_bst_ns,search_rbt_ns";

pub const DEFAULT_SIZES: [usize; 10] = [
    100, 1000, 2500, 5000, 7500, 10000, 30000, 50000, 75000, 100000,
];

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("writing results: {0}")]
    Io(#[from] io::Error),
    #[error("building tree: {0}")]
    Tree(#[from] TreeError),
    #[error("{0} does not fit the key type")]
    KeyRange(usize),
    #[error("invalid size list {0:?}")]
    Sizes(String),
}

/// Order in which keys are fed to the trees.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyOrder {
    /// A seeded shuffle of `0..n`; the favourable case for the unbalanced tree.
    Random,
    /// `0..n` ascending; the unbalanced tree degenerates into a list.
    Sorted,
}

impl KeyOrder {
    pub fn label(self) -> &'static str {
        match self {
            KeyOrder::Random => "random",
            KeyOrder::Sorted => "sorted",
        }
    }
}

#[derive(Clone, Debug)]
pub struct StudyConfig {
    pub sizes: Vec<usize>,
    pub repetitions: u32,
    pub warmup: u32,
    pub seed: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            repetitions: 7,
            warmup: 2,
            seed: 123456789,
        }
    }
}

impl StudyConfig {
    /// Parse a comma separated list of sizes, e.g. `"100,1000,5000"`.
    pub fn parse_sizes(list: &str) -> Result<Vec<usize>, StudyError> {
        let sizes = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| StudyError::Sizes(list.to_string()))?;
        if sizes.is_empty() {
            return Err(StudyError::Sizes(list.to_string()));
        }
        Ok(sizes)
    }
}

/// Average timings for one size and key order.
#[derive(Clone, Debug, PartialEq)]
pub struct StudyRow {
    pub n: usize,
    pub order: KeyOrder,
    pub build_bst: Duration,
    pub build_rbt: Duration,
    pub search_bst: Duration,
    pub search_rbt: Duration,
}

impl StudyRow {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.n,
            self.order.label(),
            self.build_bst.as_nanos(),
            self.build_rbt.as_nanos(),
            self.search_bst.as_nanos(),
            self.search_rbt.as_nanos()
        )
    }
}

/// The keys `0..n` in the requested order.
pub fn generate_keys<K: PrimInt>(
    n: usize,
    order: KeyOrder,
    seed: u64,
) -> Result<Vec<K>, StudyError> {
    let mut keys = (0..n)
        .map(|i| <K as NumCast>::from(i).ok_or(StudyError::KeyRange(i)))
        .collect::<Result<Vec<K>, _>>()?;
    if order == KeyOrder::Random {
        let mut rng = StdRng::seed_from_u64(seed);
        keys.shuffle(&mut rng);
    }
    Ok(keys)
}

/// Fill `collection` with `keys`, returning how long it took.
pub fn time_build<K, S>(collection: &mut S, keys: &[K]) -> Result<Duration, TreeError>
where
    K: Copy,
    S: OrderedCollection<K>,
{
    let start = Instant::now();
    for key in keys {
        collection.add(*key)?;
    }
    Ok(start.elapsed())
}

/// Look up every key in `0..limit`, returning how long it took.
pub fn time_search<K, S>(collection: &S, limit: usize) -> Result<Duration, StudyError>
where
    K: PrimInt,
    S: OrderedCollection<K>,
{
    let probes = (0..limit)
        .map(|i| <K as NumCast>::from(i).ok_or(StudyError::KeyRange(i)))
        .collect::<Result<Vec<K>, _>>()?;
    let start = Instant::now();
    for probe in &probes {
        black_box(collection.contains(probe));
    }
    Ok(start.elapsed())
}

/// Measure one size and key order.
pub fn measure<K>(config: &StudyConfig, n: usize, order: KeyOrder) -> Result<StudyRow, StudyError>
where
    K: PrimInt,
{
    let keys = generate_keys::<K>(n, order, config.seed)?;

    for _ in 0..config.warmup {
        let mut bst = BinarySearchTree::<K>::new();
        let mut rbt = RedBlackTree::<K>::new();
        time_build(&mut bst, &keys)?;
        time_build(&mut rbt, &keys)?;
        time_search::<K, _>(&bst, 2 * n)?;
        time_search::<K, _>(&rbt, 2 * n)?;
    }

    let mut totals = [Duration::ZERO; 4];
    for _ in 0..config.repetitions {
        let mut bst = BinarySearchTree::<K>::new();
        totals[0] += time_build(&mut bst, &keys)?;
        let mut rbt = RedBlackTree::<K>::new();
        totals[1] += time_build(&mut rbt, &keys)?;
        totals[2] += time_search::<K, _>(&bst, 2 * n)?;
        totals[3] += time_search::<K, _>(&rbt, 2 * n)?;
    }

    let reps = config.repetitions.max(1);
    Ok(StudyRow {
        n,
        order,
        build_bst: totals[0] / reps,
        build_rbt: totals[1] / reps,
        search_bst: totals[2] / reps,
        search_rbt: totals[3] / reps,
    })
}

/// Run the whole study, writing the CSV header and one line per size and key order to `out`.
pub fn run<W: Write>(config: &StudyConfig, mut out: W) -> Result<Vec<StudyRow>, StudyError> {
    writeln!(out, "{}", CSV_HEADER)?;
    let mut rows = Vec::with_capacity(config.sizes.len() * 2);
    for &n in &config.sizes {
        info!("measuring n = {}", n);
        for order in [KeyOrder::Random, KeyOrder::Sorted] {
            let row = measure::<i64>(config, n, order)?;
            writeln!(out, "{}", row.to_csv_line())?;
            rows.push(row);
        }
        out.flush()?;
    }
    Ok(rows)
}
