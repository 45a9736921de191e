//! Domain logic for the Upsolve backend.
//!
//! This crate holds the two pieces of the system that are pure computation:
//! random problem selection over the Codeforces catalog (tag + rating
//! filtering with a nearest-band fallback) and the per-user statistics
//! aggregation. Everything here is side-effect free so it can be tested
//! without a database or network.

pub mod problem;
pub mod selection;
pub mod stats;

pub use problem::Problem;
pub use selection::{RATING_WINDOW, filter_candidates, pick};
pub use stats::{AttemptRecord, ChartData, UserStatistics, aggregate, chart_series};
