//! Horn–Schunck relaxation: derivatives, the update rule, the double-buffered
//! flow field and the serial and strip-parallel drivers.
//!
//! Pipeline
//! - [`compute_derivatives`] turns two 8-bit frames into `Idx`, `Idy`, `Idt`
//!   using forward differences over a 2×2×2 cube.
//! - [`relax_reference`] runs T Jacobi sweeps over the whole update region and
//!   is the numerical reference.
//! - [`relax_parallel`] splits the columns into strips
//!   ([`partition_columns`]) and runs one [`StripWorker`] per strip, exchanging
//!   one ghost column per side after every step. With
//!   [`SweepPolicy::PerSweep`] its result matches the reference bit for bit.
//!
//! Border handling
//! - Derivatives are zero on the last row and column.
//! - Pixels on the outer frame of the image are never updated and stay zero in
//!   both flow slots; [`local_average`] returns 0 there.

pub mod average;
pub mod derivatives;
pub mod field;
pub mod parallel;
pub mod params;
pub mod partition;
pub mod relax;
pub mod update;

pub use average::{local_average, neighborhood_average};
pub use derivatives::{compute_derivatives, DerivativeSet};
pub use field::{FlowField, Slot};
pub use parallel::relax_parallel;
pub use partition::{partition_columns, Strip};
pub use params::{FlowParams, SolverParams, SweepPolicy};
pub use relax::{relax_reference, StripWorker, WorkerState};
pub use update::{alpha, update_pixel};
