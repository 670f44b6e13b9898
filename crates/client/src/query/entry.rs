use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, Shared};
use tokio::time::Instant;

use crate::error::{ClientError, Result};

/// Cached data, type-erased. Handed out as `Arc<T>` so callers can read but
/// never mutate it in place.
pub(crate) type AnyData = Arc<dyn Any + Send + Sync>;

pub(crate) type SharedFetch = Shared<BoxFuture<'static, Result<AnyData>>>;

/// Lifecycle of a cached query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched, or the last fetch was abandoned before finishing.
    #[default]
    Idle,
    Fetching,
    Success,
    Error,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub status: QueryStatus,
    pub has_data: bool,
    /// When the current data was stored.
    pub data_updated_at: Option<Instant>,
    pub retry_count: u32,
    pub error: Option<ClientError>,
    pub is_stale: bool,
    pub is_fetching: bool,
    pub observers: usize,
}

/// The one fetch allowed per key at a time.
pub(crate) struct InFlight {
    pub id: u64,
    pub fetch: SharedFetch,
    pub waiters: usize,
}

pub(crate) struct Entry {
    pub data: Option<AnyData>,
    pub status: QueryStatus,
    pub updated_at: Option<Instant>,
    /// Last time the entry settled or was created; drives garbage collection.
    pub touched_at: Instant,
    pub stale_time: Duration,
    pub gc_time: Duration,
    pub retry_count: u32,
    pub error: Option<ClientError>,
    pub invalidated: bool,
    pub observers: usize,
    pub in_flight: Option<InFlight>,
}

impl Entry {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            updated_at: None,
            touched_at: Instant::now(),
            stale_time,
            gc_time,
            retry_count: 0,
            error: None,
            invalidated: false,
            observers: 0,
            in_flight: None,
        }
    }

    /// Data is fresh while less than `stale_time` has passed since it was
    /// stored and nothing invalidated it.
    pub fn is_stale(&self, now: Instant) -> bool {
        match (&self.data, self.updated_at) {
            (Some(_), Some(at)) if !self.invalidated => {
                now.saturating_duration_since(at) >= self.stale_time
            }
            _ => true,
        }
    }

    /// Entries that are observed or fetching must stay in the cache.
    pub fn is_pinned(&self) -> bool {
        self.observers > 0 || self.in_flight.is_some()
    }

    /// Status to fall back to when a fetch is detached.
    pub fn resting_status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    /// Forgets the running fetch so the next read starts a new one. The
    /// caller decides when to drop the returned handle.
    pub fn detach_fetch(&mut self) -> Option<InFlight> {
        let in_flight = self.in_flight.take();
        self.status = self.resting_status();
        in_flight
    }

    pub fn settle(&mut self, result: Result<AnyData>) {
        let now = Instant::now();
        self.in_flight = None;
        self.touched_at = now;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.updated_at = Some(now);
                self.status = QueryStatus::Success;
                self.error = None;
                self.retry_count = 0;
                self.invalidated = false;
            }
            Err(e) => {
                self.status = QueryStatus::Error;
                self.error = Some(e);
            }
        }
    }

    pub fn state(&self, now: Instant) -> QueryState {
        QueryState {
            status: self.status,
            has_data: self.data.is_some(),
            data_updated_at: self.updated_at,
            retry_count: self.retry_count,
            error: self.error.clone(),
            is_stale: self.is_stale(now),
            is_fetching: self.in_flight.is_some(),
            observers: self.observers,
        }
    }
}
