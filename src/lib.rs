#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod estimator;
pub mod image;
pub mod needle;

// Numerical building blocks; public for tools and tests.
pub mod config;
pub mod flow;

// --- High-level re-exports -------------------------------------------------

pub use crate::diagnostics::FlowReport;
pub use crate::error::{FlowError, Result};
pub use crate::estimator::{FlowEstimate, FlowEstimator};
pub use crate::flow::{FlowParams, SolverParams, SweepPolicy};
pub use crate::needle::{build_needle_map, NeedleMap, NeedleMapOptions};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hs_flow::prelude::*;
///
/// # fn main() -> hs_flow::Result<()> {
/// let (w, h) = (64usize, 48usize);
/// let a = vec![0u8; w * h];
/// let b = vec![0u8; w * h];
/// let first = ImageU8 { w, h, stride: w, data: &a };
/// let second = ImageU8 { w, h, stride: w, data: &b };
///
/// let estimator = FlowEstimator::new(SolverParams::new(100).with_workers(2));
/// let estimate = estimator.estimate(first, second)?;
/// println!("needles={}", estimate.report.needles);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{FlowEstimator, FlowParams, SolverParams, SweepPolicy};
}
