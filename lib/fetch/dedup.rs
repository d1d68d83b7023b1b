//! Concurrent de-duplication of fetch outcomes.
//!
//! Given a key and an async fetch closure, [`FetchCache`] ensures the fetch
//! runs at most once per key. Concurrent callers for the same key await the
//! already-in-flight fetch via a [`Shared`] future rather than issuing a
//! duplicate request, and later callers get the remembered outcome. Outcomes
//! are remembered whatever they are — a `Result::Err` is as final as an
//! `Ok` — and entries never expire: the cache lives exactly as long as one
//! repository-viewing session.

use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt as _;
use futures::future::Shared;

/// A shared in-flight fetch. `None` signals that the fetch panicked and was
/// caught by `catch_unwind`.
type SharedFetch<V> = Shared<Pin<Box<dyn Future<Output = Option<V>> + Send>>>;

/// Two-state slot: `Pending` while the fetch is running, `Done` afterwards.
enum Slot<V: Clone + Send + 'static> {
    Pending(SharedFetch<V>),
    Done(V),
}

/// Deduplicating fetch cache.
///
/// If [`get_or_fetch`](Self::get_or_fetch) is called concurrently for the
/// same key, only one fetch runs; every caller receives a clone of its
/// outcome.
pub struct FetchCache<K, V: Clone + Send + 'static> {
    slots: scc::HashMap<K, Slot<V>>,
}

impl<K, V> Default for FetchCache<K, V>
where
    K: Eq + Hash,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self {
            slots: scc::HashMap::default(),
        }
    }
}

impl<K, V> FetchCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the remembered outcome for `key`, running `fetch` if there is
    /// none and no fetch is in flight.
    ///
    /// If the fetch panics, the slot is discarded so the next caller starts
    /// over with a fresh fetch.
    ///
    /// # Panics
    ///
    /// Panics when this caller joined an in-flight fetch that itself
    /// panicked — the panic is propagated rather than invented into a value.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        // Fast path: outcome already remembered, or a fetch is in flight.
        if let Some(value) = self.lookup(&key).await {
            return value;
        }

        // Slow path: atomic check-and-insert of a fresh fetch.
        let shared = match self.slots.entry_async(key.clone()).await {
            scc::hash_map::Entry::Occupied(occupied) => match occupied.get() {
                Slot::Done(value) => return value.clone(),
                Slot::Pending(shared) => shared.clone(),
            },
            scc::hash_map::Entry::Vacant(vacant) => {
                let shared = Self::spawn_shared(fetch);
                let ret = shared.clone();
                vacant.insert_entry(Slot::Pending(shared));
                ret
            }
        };

        match self.settle(&key, shared).await {
            Some(value) => value,
            None => panic!("deduplicated fetch panicked"),
        }
    }

    /// The remembered outcome for `key`, if any. Awaits an in-flight fetch;
    /// returns `None` for absent keys and for fetches that panicked.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.lookup(key).await
    }

    /// Number of slots, pending and done.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the cache holds no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    async fn lookup(&self, key: &K) -> Option<V> {
        let found = self
            .slots
            .read_async(key, |_, slot| match slot {
                Slot::Done(value) => Ok(value.clone()),
                Slot::Pending(shared) => Err(shared.clone()),
            })
            .await?;

        match found {
            Ok(value) => Some(value),
            Err(shared) => self.settle(key, shared).await,
        }
    }

    /// Await an in-flight fetch, promote its slot to `Done`, and recover
    /// from panics by discarding the poisoned slot.
    async fn settle(&self, key: &K, shared: SharedFetch<V>) -> Option<V> {
        match shared.await {
            Some(value) => {
                self.slots
                    .update_async(key, |_, slot| {
                        if matches!(slot, Slot::Pending(_)) {
                            *slot = Slot::Done(value.clone());
                        }
                    })
                    .await;
                Some(value)
            }
            None => {
                drop(
                    self.slots
                        .remove_if_sync(key, |slot| matches!(slot, Slot::Pending(_))),
                );
                None
            }
        }
    }

    /// Wrap a fetch in `catch_unwind`, producing a `Shared` whose `None`
    /// output marks a panic.
    fn spawn_shared<F, Fut>(fetch: F) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let caught = AssertUnwindSafe(fetch()).catch_unwind();
        let boxed: Pin<Box<dyn Future<Output = Option<V>> + Send>> =
            Box::pin(async move { caught.await.ok() });
        boxed.shared()
    }
}
