//! Single-trial simulation
//!
//! A trial flips the coin until either the running heads frequency enters the
//! critical band after more than `threshold` flips, or `max_flips` is reached.
//!
//! ```text
//!            ┌──────────── flip ────────────┐
//!            v                              │
//!   [n < max_flips] ──> n > threshold && in band? ──no──┘
//!            │                   │
//!          n == max            yes
//!            v                   v
//!    NoCriticalPoint      Critical { flip_count: n }
//! ```

mod record;
mod runner;

pub use record::{TrialOutcome, TrialRecord};
pub use runner::TrialRunner;
