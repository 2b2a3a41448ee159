//! Command-line interface definitions and argument parsing

use crate::error::{Error, Result};
use crate::model::{KMeansConfig, DEFAULT_ITER, MAX_ITER, MIN_ITER, MIN_K};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Partition comma-separated points into k clusters using Lloyd's k-means
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of clusters; must be a whole number smaller than the point count
    #[arg(allow_hyphen_values = true)]
    pub k: String,

    /// Maximum number of iterations, a whole number in [1, 1000]
    #[arg(allow_hyphen_values = true)]
    pub max_iterations: Option<String>,

    /// Read points from this file instead of standard input
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Verbosity level for diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validated cluster count.
    pub fn k(&self) -> Result<usize> {
        match parse_whole_number(&self.k) {
            Some(k) if k >= MIN_K => Ok(k),
            _ => Err(Error::InvalidClusterCount {
                value: self.k.clone(),
            }),
        }
    }

    /// Validated iteration bound, defaulting to 400.
    pub fn max_iterations(&self) -> Result<usize> {
        let Some(ref raw) = self.max_iterations else {
            return Ok(DEFAULT_ITER);
        };

        match parse_whole_number(raw) {
            Some(n) if (MIN_ITER..=MAX_ITER).contains(&n) => Ok(n),
            _ => Err(Error::InvalidIterationCount {
                value: raw.clone(),
                min: MIN_ITER,
                max: MAX_ITER,
            }),
        }
    }

    /// Engine configuration built from the validated positional arguments.
    ///
    /// `k` is checked before the iteration bound.
    pub fn config(&self) -> Result<KMeansConfig> {
        let k = self.k()?;
        let max_iterations = self.max_iterations()?;
        Ok(KMeansConfig::new(k).with_max_iterations(max_iterations))
    }
}

/// Command-line tokens with `--` kept as an ordinary positional value.
///
/// A bare `--` fails validation in whichever slot it occupies. It is
/// rewritten to `-`, which clap always hands to the next positional.
pub fn literal_double_dash<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            if arg == "--" {
                OsString::from("-")
            } else {
                arg
            }
        })
        .collect()
}

/// Parse decimal text holding a non-negative whole number.
///
/// A zero fractional part is accepted (`"3.0"` is 3); fractions, non-finite
/// values, negatives and trailing text yield `None`.
pub fn parse_whole_number(raw: &str) -> Option<usize> {
    let value: f64 = raw.trim_start().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > usize::MAX as f64 {
        return None;
    }
    Some(value as usize)
}
