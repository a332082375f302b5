//! Normalizes flat ODF spreadsheets (`.fods`) so that repeated saves produce
//! small, stable diffs: volatile metadata and view settings are cut, styles are
//! reduced to column width, text color and background color, deduplicated by
//! content hash and renamed to that hash.

use std::io::Read;

pub mod batch;
pub mod emit;
pub mod error;
pub mod format;
pub mod minimizer;
pub mod rewrite;
pub mod scope;
pub mod styles;
pub mod suppress;
pub mod tag;

pub use batch::{Mode, Outcome, Summary};
pub use error::{Error, Result};
pub use minimizer::{Minimizer, Stats};
pub use styles::{StyleDefinition, StyleFamily, StyleKey};

/// Minimizes a whole document: the filtering pass followed by reformatting.
pub fn minimize<R: Read>(source: R) -> Result<(String, Stats)> {
    let (streamed, stats) = Minimizer::new(Vec::new()).run(source)?;
    let output = format::reformat(streamed.as_slice())?;
    Ok((output, stats))
}
