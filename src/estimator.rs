//! End-to-end estimator: frames → derivatives → relaxation → needle map.
//!
//! ```no_run
//! use hs_flow::{FlowEstimator, SolverParams};
//! use hs_flow::image::io::load_frame_pair;
//! use std::path::Path;
//!
//! # fn main() -> hs_flow::Result<()> {
//! let (a, b) = load_frame_pair(Path::new("a.png"), Path::new("b.png"))?;
//! let estimator = FlowEstimator::new(SolverParams::new(500).with_workers(4));
//! let estimate = estimator.estimate(a.as_view(), b.as_view())?;
//! println!("mean |v| = {:.4}", estimate.report.stats.mean_magnitude);
//! # Ok(())
//! # }
//! ```
use crate::diagnostics::{FlowReport, FlowStats, InputDescriptor, TimingBreakdown};
use crate::error::{FlowError, Result};
use crate::flow::{
    compute_derivatives, partition_columns, relax_parallel, DerivativeSet, FlowField,
    SolverParams,
};
use crate::image::{ImageU8, ImageView};
use crate::needle::{NeedleMap, NeedleMapOptions};
use log::{debug, warn};
use std::time::Instant;

/// Output of one estimation run.
#[derive(Clone, Debug)]
pub struct FlowEstimate {
    pub derivatives: DerivativeSet,
    pub field: FlowField,
    pub needle_map: NeedleMap,
    pub report: FlowReport,
}

/// Horn–Schunck estimator configured once and reusable across frame pairs.
#[derive(Clone, Debug)]
pub struct FlowEstimator {
    params: SolverParams,
    needles: NeedleMapOptions,
}

impl FlowEstimator {
    pub fn new(params: SolverParams) -> Self {
        Self {
            params,
            needles: NeedleMapOptions::default(),
        }
    }

    pub fn with_needle_options(mut self, needles: NeedleMapOptions) -> Self {
        self.needles = needles;
        self
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Estimate the flow from `first` (time t) to `second` (time t + dt).
    ///
    /// Configuration, dimension and partition problems are reported before
    /// any computation starts.
    pub fn estimate(&self, first: ImageU8<'_>, second: ImageU8<'_>) -> Result<FlowEstimate> {
        self.params.validate()?;
        self.needles.validate()?;
        if !first.conforms_to(&second) {
            return Err(FlowError::DimensionMismatch {
                first: first.dims(),
                second: second.dims(),
            });
        }
        let (w, h) = first.dims();
        let strips = partition_columns(w, h, self.params.workers)?;
        debug!(
            "FlowEstimator::estimate start w={} h={} workers={} iterations={}",
            w, h, self.params.workers, self.params.iterations
        );

        let total = Instant::now();
        let mut timings = TimingBreakdown::default();

        let t = Instant::now();
        let derivatives = compute_derivatives(first, second)?;
        timings.push("derivatives", elapsed_ms(t));

        let t = Instant::now();
        let field = relax_parallel(&derivatives, &self.params)?;
        timings.push("relaxation", elapsed_ms(t));

        let t = Instant::now();
        let needle_map = NeedleMap::from_field(&field, &self.needles)?;
        timings.push("needle_map", elapsed_ms(t));
        timings.total_ms = elapsed_ms(total);

        let report = FlowReport {
            input: InputDescriptor {
                width: w,
                height: h,
            },
            workers: self.params.workers,
            iterations: self.params.iterations,
            policy: self.params.policy,
            lambda: self.params.flow.lambda,
            step: self.params.flow.step,
            strips,
            stats: FlowStats::from_field(&field),
            needles: needle_map.needles,
            timings,
        };
        if report.stats.non_finite > 0 {
            warn!(
                "FlowEstimator::estimate diverged: {} non-finite pixels (lambda={} step={})",
                report.stats.non_finite, report.lambda, report.step
            );
        }
        debug!(
            "FlowEstimator::estimate done total_ms={:.3} needles={}",
            report.timings.total_ms, report.needles
        );

        Ok(FlowEstimate {
            derivatives,
            field,
            needle_map,
            report,
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
