//! Serializable run report: input description, partition, timings and a few
//! statistics of the resulting flow field.
use crate::flow::{FlowField, Strip, SweepPolicy};
use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Elapsed time of the first stage named `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
}

/// Magnitude statistics of the current slot of a flow field.
///
/// A diverged run shows up as NaN means and maxima plus a non-zero
/// `non_finite` count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStats {
    pub mean_u: f32,
    pub mean_v: f32,
    pub mean_magnitude: f32,
    pub max_magnitude: f32,
    /// Pixels whose `u` or `v` is NaN or infinite.
    pub non_finite: usize,
}

impl FlowStats {
    pub fn from_field(field: &FlowField) -> Self {
        let cur = field.current();
        let n = cur.u.data.len();
        if n == 0 {
            return Self::default();
        }
        let (mut su, mut sv, mut sm, mut max) = (0.0f64, 0.0f64, 0.0f64, 0.0f32);
        let mut non_finite = 0usize;
        for (&u, &v) in cur.u.data.iter().zip(&cur.v.data) {
            if !u.is_finite() || !v.is_finite() {
                non_finite += 1;
            }
            let m = (u * u + v * v).sqrt();
            su += f64::from(u);
            sv += f64::from(v);
            sm += f64::from(m);
            // `f32::max` would drop NaN; keep it sticky instead.
            if m.is_nan() || m > max {
                max = m;
            }
        }
        let n = n as f64;
        Self {
            mean_u: (su / n) as f32,
            mean_v: (sv / n) as f32,
            mean_magnitude: (sm / n) as f32,
            max_magnitude: max,
            non_finite,
        }
    }
}

/// Everything worth recording about a finished estimation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub input: InputDescriptor,
    pub workers: usize,
    pub iterations: usize,
    pub policy: SweepPolicy,
    pub lambda: f32,
    pub step: f32,
    pub strips: Vec<Strip>,
    pub stats: FlowStats,
    pub needles: usize,
    pub timings: TimingBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_uniform_field() {
        let mut field = FlowField::new(2, 2);
        {
            let cur = field.current_mut();
            cur.u.fill(3.0);
            cur.v.fill(4.0);
        }
        let stats = FlowStats::from_field(&field);
        assert_eq!(stats.mean_u, 3.0);
        assert_eq!(stats.mean_v, 4.0);
        assert_eq!(stats.mean_magnitude, 5.0);
        assert_eq!(stats.max_magnitude, 5.0);
    }

    #[test]
    fn diverged_field_is_not_reported_as_still() {
        let mut field = FlowField::new(3, 1);
        {
            let cur = field.current_mut();
            cur.u.set(0, 0, f32::NAN);
            cur.u.set(1, 0, 2.0);
            cur.v.set(2, 0, f32::INFINITY);
        }
        let stats = FlowStats::from_field(&field);
        assert!(stats.max_magnitude.is_nan());
        assert!(stats.mean_u.is_nan());
        assert_eq!(stats.non_finite, 2);
    }

    #[test]
    fn timing_lookup_by_label() {
        let mut t = TimingBreakdown::default();
        t.push("derivatives", 1.5);
        t.push("relaxation", 4.0);
        assert_eq!(t.stage_ms("relaxation"), Some(4.0));
        assert_eq!(t.stage_ms("missing"), None);
    }
}
