//! Thread-safe decrypted key table with single-flight population.
//!
//! Each identity is decrypted at most once at a time. The first caller to
//! miss registers an in-flight task; later callers await the same shared
//! result. The task runs on the tokio runtime, so a caller that stops
//! waiting does not stop the work others are waiting on.

use crate::error::{KeyError, KeyResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::oneshot;

type Flight<V> = Shared<BoxFuture<'static, KeyResult<V>>>;

struct TableState<K, V> {
    ready: HashMap<K, V>,
    pending: HashMap<K, Flight<V>>,
    /// Bumped by `clear`; flights started under an older generation do not
    /// write back.
    generation: u64,
}

/// Decrypted key table keyed by identity.
///
/// A retaining table keeps every successful result until [`KeyTable::clear`].
/// A non-retaining table only de-duplicates concurrent work.
pub(crate) struct KeyTable<K, V> {
    state: Arc<RwLock<TableState<K, V>>>,
    retain: bool,
}

impl<K, V> KeyTable<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn retaining() -> Self {
        Self::with_retention(true)
    }

    pub fn single_flight_only() -> Self {
        Self::with_retention(false)
    }

    fn with_retention(retain: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(TableState {
                ready: HashMap::new(),
                pending: HashMap::new(),
                generation: 0,
            })),
            retain,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TableState<K, V>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableState<K, V>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a completed entry without starting any work.
    pub fn get(&self, key: &K) -> Option<V> {
        self.read().ready.get(key).cloned()
    }

    /// Returns the entry for `key`, running `work` to produce it if nobody
    /// has yet.
    ///
    /// `work` is only invoked on a miss with no flight in progress. Its
    /// future is spawned onto the tokio runtime.
    pub async fn get_or_run<F, Fut>(&self, key: K, work: F) -> KeyResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = KeyResult<V>> + Send + 'static,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let (flight, start) = {
            let mut state = self.write();
            if let Some(value) = state.ready.get(&key) {
                return Ok(value.clone());
            }
            match state.pending.get(&key) {
                Some(flight) => (flight.clone(), None),
                None => {
                    let (sender, receiver) = oneshot::channel();
                    let flight = Self::flight(receiver);
                    state.pending.insert(key.clone(), flight.clone());
                    (flight, Some((state.generation, sender)))
                }
            }
        };

        // Must run unlocked: a shutting-down runtime drops the task, and with
        // it the guard, inside `spawn`.
        if let Some((generation, sender)) = start {
            let guard = FlightGuard {
                state: Arc::clone(&self.state),
                key,
                generation,
            };
            self.spawn_flight(guard, work(), sender);
        }

        flight.await
    }

    fn flight(receiver: oneshot::Receiver<KeyResult<V>>) -> Flight<V> {
        async move {
            receiver.await.unwrap_or_else(|_| {
                Err(KeyError::Internal(
                    "key task ended without a result".to_string(),
                ))
            })
        }
        .boxed()
        .shared()
    }

    fn spawn_flight<Fut>(
        &self,
        guard: FlightGuard<K, V>,
        work: Fut,
        sender: oneshot::Sender<KeyResult<V>>,
    ) where
        Fut: Future<Output = KeyResult<V>> + Send + 'static,
    {
        let retain = self.retain;
        tokio::spawn(async move {
            let result = work.await;
            if retain {
                if let Ok(value) = &result {
                    guard.store(value.clone());
                }
            }
            drop(guard);
            let _ = sender.send(result);
        });
    }

    /// Drops every entry and forgets in-flight work.
    pub fn clear(&self) {
        let mut state = self.write();
        state.ready.clear();
        state.pending.clear();
        state.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.read().ready.len()
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.read().pending.len()
    }
}

/// Unregisters a flight when its task ends, including by panic or by the
/// runtime dropping the task. Does nothing if the table was cleared since.
struct FlightGuard<K: Eq + Hash, V> {
    state: Arc<RwLock<TableState<K, V>>>,
    key: K,
    generation: u64,
}

impl<K: Eq + Hash + Clone, V> FlightGuard<K, V> {
    fn store(&self, value: V) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.ready.insert(self.key.clone(), value);
        }
    }
}

impl<K: Eq + Hash, V> Drop for FlightGuard<K, V> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.pending.remove(&self.key);
        }
    }
}
