use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::query::key::QueryKey;
use crate::services::error::ApiError;

/// Resource tags link read queries to the mutations that stale them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceTag {
    Product,
    Category,
}

/// What a query consumer sees: `idle -> loading -> success | error`, and back
/// to `loading` on argument change or tag invalidation.
#[derive(Clone, Debug, Default)]
pub struct QueryState {
    pub data: Option<Value>,
    pub error: Option<ApiError>,
    pub is_loading: bool,
}

impl QueryState {
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

type QueryFuture = Pin<Box<dyn Future<Output = Result<Value, ApiError>>>>;
type QueryFetcher = Rc<dyn Fn() -> QueryFuture>;
type ChangeListener = Rc<dyn Fn(QueryState)>;

struct CacheEntry {
    data: Option<Value>,
    error: Option<ApiError>,
    is_loading: bool,
    /// Stale entries are refetched on the next subscription or invalidation.
    stale: bool,
    tags: Vec<ResourceTag>,
}

impl CacheEntry {
    fn new(tags: Vec<ResourceTag>) -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            stale: false,
            tags,
        }
    }

    fn state(&self) -> QueryState {
        QueryState {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
        }
    }

    fn needs_fetch(&self) -> bool {
        self.stale || (self.data.is_none() && self.error.is_none())
    }
}

struct Subscriber {
    id: u64,
    fetcher: QueryFetcher,
    on_change: ChangeListener,
}

struct Inner {
    cache: RefCell<HashMap<QueryKey, CacheEntry>>,
    in_flight: RefCell<HashSet<QueryKey>>,
    /// Keys invalidated while their fetch was already in flight; the landing
    /// response must not be recorded as fresh.
    pending_refetch: RefCell<HashSet<QueryKey>>,
    subscribers: RefCell<HashMap<QueryKey, Vec<Subscriber>>>,
    next_id: Cell<u64>,
}

/// Per-endpoint cache with request deduplication and tag-based invalidation.
#[derive(Clone)]
pub struct QueryClient {
    inner: Rc<Inner>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                cache: RefCell::new(HashMap::new()),
                in_flight: RefCell::new(HashSet::new()),
                pending_refetch: RefCell::new(HashSet::new()),
                subscribers: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Subscribe a typed read query. The subscriber immediately receives the
    /// current cache state, then every update for its key; the fetch only
    /// goes out when the cache has nothing fresh and no identical request is
    /// already in flight. Dropping the returned subscription unsubscribes,
    /// so a late response is never delivered to a consumer that is gone.
    pub fn subscribe_query<T, Fut, Fetch, Change>(
        &self,
        key: QueryKey,
        tags: &[ResourceTag],
        fetch: Fetch,
        on_change: Change,
    ) -> QuerySubscription
    where
        T: Serialize + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
        Fetch: Fn() -> Fut + 'static,
        Change: Fn(QueryState) + 'static,
    {
        let fetcher: QueryFetcher = Rc::new(move || {
            let fut = fetch();
            Box::pin(async move {
                let value = fut.await?;
                serde_json::to_value(value)
                    .map_err(|e| ApiError::Network(format!("Serialization error: {}", e)))
            })
        });
        self.subscribe(key, tags, fetcher, Rc::new(on_change))
    }

    fn subscribe(
        &self,
        key: QueryKey,
        tags: &[ResourceTag],
        fetcher: QueryFetcher,
        on_change: ChangeListener,
    ) -> QuerySubscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        self.inner
            .cache
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(tags.to_vec()));

        self.inner
            .subscribers
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .push(Subscriber {
                id,
                fetcher: fetcher.clone(),
                on_change: on_change.clone(),
            });

        // Initial snapshot so the consumer can render the cached state
        on_change(self.state(&key));

        let needs_fetch = self
            .inner
            .cache
            .borrow()
            .get(&key)
            .map(|entry| entry.needs_fetch())
            .unwrap_or(true);
        if needs_fetch && self.begin_fetch(&key) {
            self.spawn_fetch(key.clone(), fetcher);
        }

        QuerySubscription {
            client: self.clone(),
            key,
            id,
        }
    }

    /// Run a mutation; its tag invalidation is applied only after the
    /// mutation itself resolved successfully.
    pub fn mutate<T, Fut, Done>(&self, invalidates: Vec<ResourceTag>, operation: Fut, on_done: Done)
    where
        T: 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
        Done: FnOnce(Result<T, ApiError>) + 'static,
    {
        let client = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = operation.await;
            if result.is_ok() {
                for tag in &invalidates {
                    client.invalidate(*tag);
                }
            }
            on_done(result);
        });
    }

    /// Mark every entry carrying `tag` stale and refetch the ones that still
    /// have active subscribers.
    pub fn invalidate(&self, tag: ResourceTag) {
        let refetch = self.invalidate_collect(tag);
        log::info!("🔄 Invalidated tag {:?}: {} subscribed queries refetch", tag, refetch.len());
        for (key, fetcher) in refetch {
            if self.begin_fetch(&key) {
                self.spawn_fetch(key, fetcher);
            } else {
                // Same key already fetching: that response predates the
                // mutation, so queue a refetch for when it lands
                self.inner.pending_refetch.borrow_mut().insert(key);
            }
        }
    }

    /// Current state for a key (idle default when the key is unknown)
    pub fn state(&self, key: &QueryKey) -> QueryState {
        self.inner
            .cache
            .borrow()
            .get(key)
            .map(|entry| entry.state())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Cache bookkeeping. Kept synchronous and separate from the spawned
    // futures so the dedup/invalidation rules are directly testable.
    // ------------------------------------------------------------------

    /// Claim the in-flight slot for a key. Returns false when an identical
    /// request is already running (request deduplication).
    fn begin_fetch(&self, key: &QueryKey) -> bool {
        if !self.inner.in_flight.borrow_mut().insert(key.clone()) {
            return false;
        }
        {
            let mut cache = self.inner.cache.borrow_mut();
            let entry = cache
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(Vec::new()));
            entry.is_loading = true;
            entry.error = None;
        }
        self.notify(key);
        true
    }

    /// Record a fetch result and push it to every subscriber of the key.
    /// Returns true when an invalidation raced this fetch and the caller
    /// should re-issue it for the key's subscribers.
    fn complete_fetch(&self, key: &QueryKey, result: Result<Value, ApiError>) -> bool {
        self.inner.in_flight.borrow_mut().remove(key);
        let refetch_queued = self.inner.pending_refetch.borrow_mut().remove(key);
        {
            let mut cache = self.inner.cache.borrow_mut();
            let entry = cache
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(Vec::new()));
            entry.is_loading = false;
            match result {
                Ok(value) => {
                    entry.data = Some(value);
                    entry.error = None;
                    // A queued invalidation means this data predates the
                    // mutation: keep the entry stale until the refetch lands
                    entry.stale = refetch_queued;
                }
                Err(error) => {
                    // Keep the last data, but stale-mark so the next
                    // subscriber (or re-render) retries.
                    entry.error = Some(error);
                    entry.stale = true;
                }
            }
        }
        self.notify(key);
        refetch_queued && self.inner.subscribers.borrow().contains_key(key)
    }

    /// Stale-mark entries for a tag; returns the subscribed keys to refetch.
    fn invalidate_collect(&self, tag: ResourceTag) -> Vec<(QueryKey, QueryFetcher)> {
        let mut tagged: Vec<QueryKey> = Vec::new();
        {
            let mut cache = self.inner.cache.borrow_mut();
            for (key, entry) in cache.iter_mut() {
                if entry.tags.contains(&tag) {
                    entry.stale = true;
                    tagged.push(key.clone());
                }
            }
        }
        let subscribers = self.inner.subscribers.borrow();
        tagged
            .into_iter()
            .filter_map(|key| {
                subscribers
                    .get(&key)
                    .and_then(|subs| subs.first())
                    .map(|sub| (key.clone(), sub.fetcher.clone()))
            })
            .collect()
    }

    fn spawn_fetch(&self, key: QueryKey, fetcher: QueryFetcher) {
        let client = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetcher().await;
            if client.complete_fetch(&key, result) && client.begin_fetch(&key) {
                client.spawn_fetch(key, fetcher);
            }
        });
    }

    fn notify(&self, key: &QueryKey) {
        let state = self.state(key);
        // Snapshot listeners before calling out: a callback may re-render
        // and subscribe/unsubscribe
        let listeners: Vec<ChangeListener> = self
            .inner
            .subscribers
            .borrow()
            .get(key)
            .map(|subs| subs.iter().map(|s| s.on_change.clone()).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(state.clone());
        }
    }

    fn unsubscribe(&self, key: &QueryKey, id: u64) {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        if let Some(subs) = subscribers.get_mut(key) {
            subs.retain(|s| s.id != id);
            if subs.is_empty() {
                subscribers.remove(key);
            }
        }
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Active query registration. Dropping it detaches the consumer, which is
/// what keeps a pending response from updating state that no longer exists.
pub struct QuerySubscription {
    client: QueryClient,
    key: QueryKey,
    id: u64,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.client.unsubscribe(&self.key, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(offset: usize) -> QueryKey {
        #[derive(Serialize)]
        struct Args {
            offset: usize,
        }
        QueryKey::new("getProducts", &Args { offset })
    }

    fn seed_entry(client: &QueryClient, key: &QueryKey, tags: Vec<ResourceTag>) {
        client
            .inner
            .cache
            .borrow_mut()
            .insert(key.clone(), CacheEntry::new(tags));
    }

    #[test]
    fn identical_in_flight_requests_are_deduplicated() {
        let client = QueryClient::new();
        let k = key(0);
        seed_entry(&client, &k, vec![ResourceTag::Product]);

        assert!(client.begin_fetch(&k));
        // Second identical request while the first is in flight: no-op
        assert!(!client.begin_fetch(&k));

        client.complete_fetch(&k, Ok(serde_json::json!([])));
        // Slot is free again once the fetch resolved
        assert!(client.begin_fetch(&k));
    }

    #[test]
    fn state_machine_idle_loading_success() {
        let client = QueryClient::new();
        let k = key(0);
        seed_entry(&client, &k, vec![ResourceTag::Product]);

        let idle = client.state(&k);
        assert!(!idle.is_loading && idle.data.is_none() && idle.error.is_none());

        client.begin_fetch(&k);
        assert!(client.state(&k).is_loading);

        client.complete_fetch(&k, Ok(serde_json::json!(["p1"])));
        let done = client.state(&k);
        assert!(!done.is_loading);
        assert_eq!(done.data, Some(serde_json::json!(["p1"])));
        assert!(done.error.is_none());
    }

    #[test]
    fn errors_keep_last_data_and_stale_mark_the_entry() {
        let client = QueryClient::new();
        let k = key(0);
        seed_entry(&client, &k, vec![ResourceTag::Product]);

        client.begin_fetch(&k);
        client.complete_fetch(&k, Ok(serde_json::json!(["p1"])));
        client.begin_fetch(&k);
        client.complete_fetch(&k, Err(ApiError::Server("boom".to_string())));

        let state = client.state(&k);
        assert_eq!(state.data, Some(serde_json::json!(["p1"])));
        assert_eq!(state.error, Some(ApiError::Server("boom".to_string())));
        assert!(client.inner.cache.borrow()[&k].needs_fetch());
    }

    #[test]
    fn invalidation_targets_only_matching_tags_with_subscribers() {
        let client = QueryClient::new();
        let products = key(0);
        let categories = QueryKey::bare("getCategories");
        seed_entry(&client, &products, vec![ResourceTag::Product]);
        seed_entry(&client, &categories, vec![ResourceTag::Category]);

        let fetcher: QueryFetcher = Rc::new(|| Box::pin(async { Ok(serde_json::json!([])) }));
        client
            .inner
            .subscribers
            .borrow_mut()
            .entry(products.clone())
            .or_default()
            .push(Subscriber {
                id: 1,
                fetcher,
                on_change: Rc::new(|_| {}),
            });

        let refetch = client.invalidate_collect(ResourceTag::Product);
        let keys: Vec<QueryKey> = refetch.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![products.clone()]);
        assert!(client.inner.cache.borrow()[&products].stale);
        assert!(!client.inner.cache.borrow()[&categories].stale);

        // Category tag has no subscribers: nothing to refetch
        assert!(client.invalidate_collect(ResourceTag::Category).is_empty());
        assert!(client.inner.cache.borrow()[&categories].stale);
    }

    #[test]
    fn invalidation_during_inflight_fetch_is_preserved() {
        let client = QueryClient::new();
        let k = key(0);
        seed_entry(&client, &k, vec![ResourceTag::Product]);

        let fetcher: QueryFetcher = Rc::new(|| Box::pin(async { Ok(serde_json::json!([])) }));
        client
            .inner
            .subscribers
            .borrow_mut()
            .entry(k.clone())
            .or_default()
            .push(Subscriber {
                id: 1,
                fetcher,
                on_change: Rc::new(|_| {}),
            });

        // A delete mutation lands while the page fetch is still out
        assert!(client.begin_fetch(&k));
        client.invalidate(ResourceTag::Product);

        // The pre-mutation response must not be recorded as fresh, and the
        // key must be refetched for its subscriber
        let refetch = client.complete_fetch(&k, Ok(serde_json::json!(["pre-mutation"])));
        assert!(refetch);
        assert!(client.inner.cache.borrow()[&k].needs_fetch());

        // The re-issued fetch lands with post-mutation data: fresh again
        assert!(client.begin_fetch(&k));
        assert!(!client.complete_fetch(&k, Ok(serde_json::json!(["post-mutation"]))));
        assert!(!client.inner.cache.borrow()[&k].needs_fetch());
    }

    #[test]
    fn unsubscribed_listener_is_not_notified() {
        let client = QueryClient::new();
        let k = key(0);
        seed_entry(&client, &k, vec![ResourceTag::Product]);

        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();
        let fetcher: QueryFetcher = Rc::new(|| Box::pin(async { Ok(serde_json::json!([])) }));
        client
            .inner
            .subscribers
            .borrow_mut()
            .entry(k.clone())
            .or_default()
            .push(Subscriber {
                id: 42,
                fetcher,
                on_change: Rc::new(move |_| calls_clone.set(calls_clone.get() + 1)),
            });

        client.begin_fetch(&k);
        assert_eq!(calls.get(), 1);

        client.unsubscribe(&k, 42);
        client.complete_fetch(&k, Ok(serde_json::json!([])));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn decode_round_trips_typed_data() {
        let state = QueryState {
            data: Some(serde_json::json!(["a", "b"])),
            error: None,
            is_loading: false,
        };
        let decoded: Vec<String> = state.decode().expect("decode");
        assert_eq!(decoded, vec!["a".to_string(), "b".to_string()]);
    }
}
