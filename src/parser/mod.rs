pub mod record;
pub mod segment;

pub use record::{Field, FieldMap, Record};

use rayon::prelude::*;
use tracing::debug;

/// Two-pass pipeline: raw blob → report units → structured records.
///
/// Units are independent, so multi-report blobs are parsed in parallel.
pub fn process_text(raw: &str) -> Vec<Record> {
    let units = segment::segment(raw);
    debug!("segmented input into {} unit(s)", units.len());
    if units.len() > 1 {
        units.par_iter().map(|u| record::parse(u)).collect()
    } else {
        units.iter().map(|u| record::parse(u)).collect()
    }
}

// ── Tests ──
