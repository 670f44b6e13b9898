//! Query cache: deduplicated, cached reads keyed by [`QueryKey`].
//!
//! [`QueryKey`]: planhaus_core::cache::QueryKey

mod cache;
mod entry;
mod retry;

pub use cache::{CacheEvent, InvalidateMode, QueryCache, QueryOptions, Subscription};
pub use entry::{QueryState, QueryStatus};
pub use retry::RetryPolicy;
