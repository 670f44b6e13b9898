//! Resource hooks: typed reads and writes over the API client and the query
//! cache.
//!
//! Reads go through the cache, keyed by the resource's [`QueryKey`], and use
//! the key's path as the request path. Writes validate their input, send it,
//! and on success invalidate the keys the mutation can have changed.

mod auth;
mod budget;
mod dashboard;
mod guests;
mod projects;
mod tasks;
mod vendors;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use planhaus_core::cache::{invalidation_for, MutationTarget, QueryKey};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{ApiClient, AuthRecovery, RequestBody};
use crate::query::{InvalidateMode, QueryCache, QueryStatus};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};

pub use auth::AuthResource;
pub use budget::{BudgetOverview, BudgetResource};
pub use dashboard::DashboardResource;
pub use guests::GuestsResource;
pub use projects::ProjectsResource;
pub use tasks::TasksResource;
pub use vendors::VendorsResource;

/// What a view renders from: the cached data plus its fetch state.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: Option<Arc<T>>,
    /// No data yet and a fetch is running.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub error: Option<ClientError>,
    pub is_stale: bool,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetching: false,
            error: None,
            is_stale: true,
        }
    }
}

impl<T: Send + Sync + 'static> QueryResult<T> {
    fn from_cache(cache: &QueryCache, key: &QueryKey) -> Self {
        let Some(state) = cache.query_state(key) else {
            return Self::default();
        };
        let data = cache.get_query_data::<T>(key);
        Self {
            is_loading: data.is_none() && state.status == QueryStatus::Fetching,
            is_fetching: state.is_fetching,
            error: state.error,
            is_stale: state.is_stale,
            data,
        }
    }
}

/// Entry point to every resource: the API client and the query cache the
/// hooks share.
#[derive(Debug, Clone)]
pub struct Planner {
    api: ApiClient,
    cache: QueryCache,
    pending: Arc<AtomicUsize>,
}

impl Planner {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self {
            api,
            cache,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wires a planner from configuration: a file-backed session when a
    /// path is set, and demo recovery unless the fallback is turned off.
    ///
    /// Also starts periodic garbage collection every `gc_time`, so it must
    /// be called inside a Tokio runtime. The gc task stops once the last
    /// handle to the cache is dropped.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let sessions: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        let recovery = if config.demo_fallback {
            AuthRecovery::DemoLogin
        } else {
            AuthRecovery::Disabled
        };
        let api = ApiClient::builder(config.base_url.clone())
            .session_store(sessions)
            .recovery(recovery)
            .build()?;
        let cache = QueryCache::new(config.cache_max_entries, config.query_options());
        if !config.gc_time().is_zero() {
            cache.spawn_gc(config.gc_time());
        }
        Ok(Self::new(api, cache))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// True while any mutation started through this planner is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn auth(&self) -> AuthResource {
        AuthResource::new(self.clone())
    }

    pub fn projects(&self) -> ProjectsResource {
        ProjectsResource::new(self.clone())
    }

    pub fn budget(&self, project_id: Uuid) -> BudgetResource {
        BudgetResource::new(self.clone(), project_id)
    }

    pub fn vendors(&self, project_id: Uuid) -> VendorsResource {
        VendorsResource::new(self.clone(), project_id)
    }

    pub fn guests(&self, project_id: Uuid) -> GuestsResource {
        GuestsResource::new(self.clone(), project_id)
    }

    pub fn tasks(&self, project_id: Uuid) -> TasksResource {
        TasksResource::new(self.clone(), project_id)
    }

    pub fn dashboard(&self, project_id: Uuid) -> DashboardResource {
        DashboardResource::new(self.clone(), project_id)
    }

    /// Reads `key` through the cache, fetching its path on a miss.
    pub(crate) async fn read<T>(&self, key: QueryKey) -> Result<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.cache.fetch_query(key.clone(), self.fetcher::<T>(&key), None).await
    }

    /// Like [`read`](Self::read), abandoned when `cancel` fires.
    pub(crate) async fn read_with_cancel<T>(
        &self,
        key: QueryKey,
        cancel: &CancellationToken,
    ) -> Result<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let fetcher = self.fetcher::<T>(&key);
        self.cache
            .fetch_query_with_cancel(key, fetcher, None, cancel)
            .await
    }

    pub(crate) fn prefetch<T>(&self, key: QueryKey) -> JoinHandle<()>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let fetcher = self.fetcher::<T>(&key);
        self.cache.prefetch(key, fetcher, None)
    }

    pub(crate) fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryResult<T> {
        QueryResult::from_cache(&self.cache, key)
    }

    fn fetcher<T>(
        &self,
        key: &QueryKey,
    ) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<T>> + Send + Sync + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        use futures_util::FutureExt;

        let api = self.api.clone();
        let path = key.to_path();
        move || {
            let api = api.clone();
            let path = path.clone();
            async move { api.get::<T>(&path).await }.boxed()
        }
    }

    /// Runs a mutation and, once it succeeds, marks every key it may have
    /// changed as stale. Failed mutations invalidate nothing.
    pub(crate) async fn mutate<T, Fut>(&self, target: MutationTarget, send: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let _pending = PendingGuard::new(&self.pending);
        let value = send.await?;
        let filters = invalidation_for(target);
        let touched = self.cache.invalidate(&filters, InvalidateMode::MarkStale);
        debug!(?target, touched, "Mutation succeeded, invalidated queries");
        Ok(value)
    }

    /// Sends a JSON body and decodes the response.
    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        self.api
            .request(method, path, RequestBody::json(body)?, None)
            .await
    }

    pub(crate) async fn send_delete(&self, path: &str) -> Result<()> {
        self.api
            .send_empty(Method::DELETE, path, RequestBody::Empty)
            .await
    }
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
