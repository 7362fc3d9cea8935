//! Relaxation drivers.
//!
//! [`relax_reference`] is the plain serial Jacobi iteration over the whole
//! image. [`StripWorker`] runs the same update on a private copy of one column
//! strip, padded with a ghost column on each side that the caller refreshes
//! between steps.
use super::average::{local_average, neighborhood_average};
use super::derivatives::DerivativeSet;
use super::field::{FlowField, Slot};
use super::params::{FlowParams, SweepPolicy};
use super::partition::Strip;
use super::update::update_pixel;
use crate::error::{FlowError, Result};
use log::debug;

/// Serial reference: `iterations` full sweeps over `[1, W-1) × [1, H-1)` in
/// row-major order with one slot swap per sweep.
pub fn relax_reference(
    derivatives: &DerivativeSet,
    params: &FlowParams,
    iterations: usize,
) -> FlowField {
    let (w, h) = (derivatives.width(), derivatives.height());
    let mut field = FlowField::new(w, h);
    for _ in 0..iterations {
        let (cur, next) = field.split();
        for y in 1..h.saturating_sub(1) {
            for x in 1..w.saturating_sub(1) {
                let u_avg = local_average(cur.u, x, y);
                let v_avg = local_average(cur.v, x, y);
                let (u, v) = update_pixel(params, derivatives.at(x, y), u_avg, v_avg);
                next.u.set(x, y, u);
                next.v.set(x, y, v);
            }
        }
        field.swap();
    }
    field
}

/// Lifecycle of a strip worker. `Done` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running { completed: usize },
    Done,
}

/// Left and right edge columns of a strip's current slot.
#[derive(Clone, Debug, Default)]
pub struct EdgeColumns {
    pub left_u: Vec<f32>,
    pub left_v: Vec<f32>,
    pub right_u: Vec<f32>,
    pub right_v: Vec<f32>,
}

impl EdgeColumns {
    pub fn new(h: usize) -> Self {
        Self {
            left_u: vec![0.0; h],
            left_v: vec![0.0; h],
            right_u: vec![0.0; h],
            right_v: vec![0.0; h],
        }
    }
}

/// Relaxation driver for one full-height column strip.
///
/// The private field is `strip.width() + 2` columns wide: local column 0
/// mirrors global `start_x - 1`, local column `width + 1` mirrors global
/// `end_x`. Only the strip's own columns are ever written by the update.
pub struct StripWorker {
    strip: Strip,
    image_w: usize,
    image_h: usize,
    iterations: usize,
    policy: SweepPolicy,
    params: FlowParams,
    field: FlowField,
    state: WorkerState,
    row_cursor: usize,
}

impl StripWorker {
    /// Create an `Idle` worker for `strip` of a `image_w × image_h` image.
    ///
    /// The strip must be non-empty, lie inside the image and span its full
    /// height.
    pub fn new(
        strip: Strip,
        image_w: usize,
        image_h: usize,
        iterations: usize,
        policy: SweepPolicy,
        params: FlowParams,
    ) -> Result<Self> {
        let fits = strip.start_x < strip.end_x
            && strip.end_x <= image_w
            && strip.start_y == 0
            && strip.end_y == image_h
            && image_h > 0;
        if !fits {
            return Err(FlowError::InvalidStrip {
                start_x: strip.start_x,
                end_x: strip.end_x,
                start_y: strip.start_y,
                end_y: strip.end_y,
                width: image_w,
                height: image_h,
            });
        }
        Ok(Self {
            strip,
            image_w,
            image_h,
            iterations,
            policy,
            params,
            field: FlowField::new(strip.width() + 2, image_h),
            state: WorkerState::Idle,
            row_cursor: 0,
        })
    }

    pub fn strip(&self) -> Strip {
        self.strip
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Private field including the two ghost columns.
    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Run all steps, calling `after_step(self, step)` once the slots of each
    /// step have been swapped. Does nothing once the worker is `Done`.
    pub fn run<F>(&mut self, derivatives: &DerivativeSet, mut after_step: F)
    where
        F: FnMut(&mut Self, usize),
    {
        if self.state == WorkerState::Done {
            return;
        }
        debug!(
            "StripWorker start x={}..{} steps={} policy={:?}",
            self.strip.start_x, self.strip.end_x, self.iterations, self.policy
        );
        self.state = WorkerState::Running { completed: 0 };
        for step in 0..self.iterations {
            self.step(derivatives);
            self.state = WorkerState::Running {
                completed: step + 1,
            };
            after_step(self, step);
        }
        self.state = WorkerState::Done;
        debug!(
            "StripWorker done x={}..{}",
            self.strip.start_x, self.strip.end_x
        );
    }

    fn step(&mut self, derivatives: &DerivativeSet) {
        let cols = self.strip.update_columns(self.image_w);
        let all_rows = self.strip.update_rows(self.image_h);
        let rows = match self.policy {
            SweepPolicy::PerSweep => all_rows,
            SweepPolicy::PerRow if all_rows.is_empty() => all_rows,
            SweepPolicy::PerRow => {
                let y = all_rows.start + self.row_cursor;
                self.row_cursor = (self.row_cursor + 1) % all_rows.len();
                y..y + 1
            }
        };

        // global x -> local x
        let shift = self.strip.start_x;
        let params = self.params;
        let (cur, next) = self.field.split();
        for y in rows {
            for x in cols.clone() {
                let lx = x + 1 - shift;
                let u_avg = neighborhood_average(cur.u, lx, y);
                let v_avg = neighborhood_average(cur.v, lx, y);
                let (u, v) = update_pixel(&params, derivatives.at(x, y), u_avg, v_avg);
                next.u.set(lx, y, u);
                next.v.set(lx, y, v);
            }
        }
        self.field.swap();
    }

    /// Copy the first and last owned columns of the current slot into `out`.
    pub fn read_edges(&self, out: &mut EdgeColumns) {
        let cur = self.field.current();
        let last = self.strip.width();
        cur.u.read_column(1, &mut out.left_u);
        cur.v.read_column(1, &mut out.left_v);
        cur.u.read_column(last, &mut out.right_u);
        cur.v.read_column(last, &mut out.right_v);
    }

    /// Refresh the ghost columns of the current slot. `left` holds the right
    /// edge of the western neighbor, `right` the left edge of the eastern one.
    pub fn write_ghosts(
        &mut self,
        left: Option<(&[f32], &[f32])>,
        right: Option<(&[f32], &[f32])>,
    ) {
        let ghost_right = self.strip.width() + 1;
        let cur = self.field.current_mut();
        if let Some((u, v)) = left {
            cur.u.write_column(0, u);
            cur.v.write_column(0, v);
        }
        if let Some((u, v)) = right {
            cur.u.write_column(ghost_right, u);
            cur.v.write_column(ghost_right, v);
        }
    }

    /// Copy the owned columns of both slots into `global` at the strip's
    /// position and align the global current slot with this worker's.
    pub fn write_into(&self, global: &mut FlowField) {
        for slot in [Slot::Odd, Slot::Even] {
            let src = self.field.slot(slot);
            let dst = global.slot_mut(slot);
            dst.u
                .copy_columns_from(src.u, 1, self.strip.start_x, self.strip.width());
            dst.v
                .copy_columns_from(src.v, 1, self.strip.start_x, self.strip.width());
        }
        global.set_current(self.field.current_slot());
    }
}
