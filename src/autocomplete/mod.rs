//! Building blocks for incremental tag autocomplete.
//!
//! The interactive widget lives in `ui::components::tag_autocomplete`; this
//! module holds the parts that have nothing to do with rendering.

mod debounce;
mod highlight;
mod query;

pub use debounce::Debouncer;
pub use highlight::{highlight, Segment};
pub use query::Query;

/// Default quiet period before a lookup is issued, in milliseconds.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 300;

/// A tag lookup issued for one active token.
///
/// `id` increases monotonically per autocomplete instance; only the
/// completion carrying the latest id may update the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Monotonic request identity.
    pub id: u64,
    /// The active token being looked up.
    pub token: String,
}
