//! Strip-parallel relaxation with ghost-column exchange.
//!
//! Every worker owns a private double-buffered copy of its column strip plus
//! one ghost column per side. After each step the workers publish their edge
//! columns, meet at a barrier, and copy their neighbors' edges into their
//! ghosts. A worker therefore only ever reads neighbor values from the
//! previous step, which keeps the parallel result identical to the serial
//! reference under [`SweepPolicy::PerSweep`].
//!
//! Mailboxes are indexed by step parity. A worker cannot write the mailbox of
//! step `s + 2` before every worker has passed the barrier of step `s + 1`,
//! i.e. finished reading the mailbox of step `s`, so one barrier per step is
//! enough and the locks are never contended.
use super::derivatives::DerivativeSet;
use super::field::FlowField;
use super::params::{SolverParams, SweepPolicy};
use super::partition::partition_columns;
use super::relax::{EdgeColumns, StripWorker};
use crate::error::Result;
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Barrier;
use std::thread;

/// Run the relaxation on `params.workers` column strips and reassemble the
/// flow field.
///
/// Fails before any work starts when the parameters are invalid or the image
/// cannot be split into the requested number of strips.
pub fn relax_parallel(derivatives: &DerivativeSet, params: &SolverParams) -> Result<FlowField> {
    params.validate()?;
    let (w, h) = (derivatives.width(), derivatives.height());
    let strips = partition_columns(w, h, params.workers)?;
    if params.policy != SweepPolicy::PerSweep {
        warn!(
            "relax_parallel policy={:?} diverges from the serial reference",
            params.policy
        );
    }
    debug!(
        "relax_parallel w={} h={} workers={} iterations={}",
        w, h, params.workers, params.iterations
    );

    let mut workers: Vec<StripWorker> = strips
        .into_iter()
        .map(|strip| {
            StripWorker::new(
                strip,
                w,
                h,
                params.iterations,
                params.policy,
                params.flow,
            )
        })
        .collect::<Result<_>>()?;

    if workers.len() == 1 {
        workers[0].run(derivatives, |_, _| {});
    } else {
        let exchange = GhostExchange::new(workers.len(), h);
        workers = thread::scope(|s| {
            let handles: Vec<_> = workers
                .into_iter()
                .enumerate()
                .map(|(index, mut worker)| {
                    let exchange = &exchange;
                    s.spawn(move || {
                        worker.run(derivatives, |wk, step| exchange.sync(index, wk, step));
                        worker
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });
    }

    let mut field = FlowField::new(w, h);
    for worker in &workers {
        worker.write_into(&mut field);
    }
    Ok(field)
}

struct GhostExchange {
    barrier: Barrier,
    mailboxes: [Vec<RwLock<EdgeColumns>>; 2],
}

impl GhostExchange {
    fn new(workers: usize, h: usize) -> Self {
        let boxes = || {
            (0..workers)
                .map(|_| RwLock::new(EdgeColumns::new(h)))
                .collect::<Vec<_>>()
        };
        Self {
            barrier: Barrier::new(workers),
            mailboxes: [boxes(), boxes()],
        }
    }

    fn sync(&self, index: usize, worker: &mut StripWorker, step: usize) {
        let boxes = &self.mailboxes[step % 2];
        worker.read_edges(&mut boxes[index].write());

        self.barrier.wait();

        let west = index.checked_sub(1).map(|i| boxes[i].read());
        let east = boxes.get(index + 1).map(|b| b.read());
        worker.write_ghosts(
            west.as_deref()
                .map(|e| (e.right_u.as_slice(), e.right_v.as_slice())),
            east.as_deref()
                .map(|e| (e.left_u.as_slice(), e.left_v.as_slice())),
        );
    }
}
