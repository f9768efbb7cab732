//! `mmv-continuity` — which fetched states form a playable window.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`cache`]   | `StateCache` (sorted, unique by order, keep-list pruning)  |
//! | [`window`]  | `ContinuityWindow`, `StateBound`, `CurrentState`           |
//! | [`tracker`] | `ContinuityTracker` (run detection, fetch-ahead decision)  |
//! | [`error`]   | `ContinuityError`, `ContinuityResult<T>`                   |
//!
//! # Per-frame use
//!
//! ```rust,ignore
//! cache.extend(fetched);
//! let window = tracker.compute(&cache, wanted, &bounds);
//! if window.should_request_more_states {
//!     request(window.known_orders(&cache));
//! }
//! let states = window.continuous_states(&cache);
//! ```

pub mod cache;
pub mod error;
pub mod tracker;
pub mod window;


pub use cache::{Inserted, StateCache};
pub use error::{ContinuityError, ContinuityResult};
pub use tracker::{ContinuityTracker, DEFAULT_FETCH_MARGIN, links};
pub use window::{ContinuityWindow, CurrentState, StateBound};
