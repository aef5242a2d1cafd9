//! Secret cache.
//!
//! Holds the current [`Snapshot`] and rebuilds it on demand. The cache moves
//! through three states:
//!
//! ```text
//!   Empty ──query──▶ Loading ──ok──▶ Loaded ──rebuild──▶ Loading
//!     ▲                 │                                   │
//!     └─────failed──────┘            Loaded ◀──failed───────┘
//! ```
//!
//! Only one rebuild runs at a time. Callers that arrive while one is running
//! wait for it and receive its result, success or failure, instead of starting
//! their own. While a forced rebuild replaces an existing snapshot, readers
//! keep getting the previous one until the new one is installed whole.
//!
//! A failed rebuild leaves the previous state in place and is not cached, so
//! the next query after it tries again from scratch.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::armor;
use crate::core::cipher::{encrypt_index, Cipher};
use crate::core::domain::{SecretId, Snapshot};
use crate::core::store::Store;
use crate::core::types::Armored;
use crate::error::{Error, Result};

/// Rebuild behaviour knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// Sort index records instead of keeping directory walk order.
    pub sort_index: bool,
}

/// Externally visible cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Loaded,
}

impl CacheState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
        }
    }
}

/// Point-in-time description of the cache, for health checks.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub state: CacheState,
    /// Secrets in the snapshot currently being served, if any.
    pub secrets: Option<usize>,
    pub built_at: Option<DateTime<Utc>>,
    /// Rebuilds started since the cache was created.
    pub attempts: u64,
}

/// Lazily loaded, shared view of a password store.
pub struct SecretCache {
    store: Store,
    cipher: Arc<dyn Cipher>,
    options: CacheOptions,
    inner: Mutex<Inner>,
    settled: Condvar,
}

struct Inner {
    state: State,
    next_attempt: u64,
    last: Option<Outcome>,
}

enum State {
    Empty,
    Loading {
        attempt: u64,
        previous: Option<Arc<Snapshot>>,
    },
    Loaded(Arc<Snapshot>),
}

/// Result of the most recent finished rebuild, kept for callers that waited
/// on it.
struct Outcome {
    attempt: u64,
    result: std::result::Result<Arc<Snapshot>, Arc<Error>>,
}

enum Next {
    Ready(Arc<Snapshot>),
    Join(u64),
    Start,
}

impl State {
    /// Snapshot readers should see right now.
    fn serving(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            Self::Loading { previous, .. } => previous.as_ref(),
            Self::Empty => None,
        }
    }

    fn loading_attempt(&self) -> Option<u64> {
        match self {
            Self::Loading { attempt, .. } => Some(*attempt),
            _ => None,
        }
    }
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("store", &self.store)
            .field("cipher", &self.cipher.name())
            .field("options", &self.options)
            .field("state", &self.status().state)
            .finish()
    }
}

impl SecretCache {
    /// Create an empty cache. Nothing is read until the first query.
    pub fn new(store: Store, cipher: Arc<dyn Cipher>) -> Self {
        Self {
            store,
            cipher,
            options: CacheOptions::default(),
            inner: Mutex::new(Inner {
                state: State::Empty,
                next_attempt: 0,
                last: None,
            }),
            settled: Condvar::new(),
        }
    }

    /// Replace the rebuild options.
    pub fn with_options(mut self, options: CacheOptions) -> Self {
        self.options = options;
        self
    }

    /// The store this cache reads.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Armored, encrypted index of every secret.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if the store cannot be loaded.
    pub fn list(&self) -> Result<Armored> {
        Ok(self.snapshot()?.index().to_string())
    }

    /// Armored ciphertext of one secret.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `id` is not in the snapshot and
    /// `Error::Unavailable` if the store cannot be loaded.
    pub fn lookup(&self, id: &SecretId) -> Result<Armored> {
        let snapshot = self.snapshot()?;
        snapshot
            .get(id)
            .map(str::to_string)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Current snapshot, loading one first if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if the load fails.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        let inner = self.lock();
        let next = match &inner.state {
            State::Empty => Next::Start,
            state => match state.serving() {
                Some(snapshot) => Next::Ready(Arc::clone(snapshot)),
                None => Next::Join(state.loading_attempt().unwrap_or_default()),
            },
        };

        match next {
            Next::Ready(snapshot) => Ok(snapshot),
            Next::Join(attempt) => self.join(inner, attempt),
            Next::Start => self.start(inner),
        }
    }

    /// Rebuild from disk regardless of the current state.
    ///
    /// If a rebuild is already running, waits for it instead of starting a
    /// second one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if the rebuild fails. Any previous snapshot
    /// stays in place.
    pub fn rebuild(&self) -> Result<Arc<Snapshot>> {
        let inner = self.lock();
        match inner.state.loading_attempt() {
            Some(attempt) => self.join(inner, attempt),
            None => self.start(inner),
        }
    }

    /// Describe the cache without triggering a load.
    pub fn status(&self) -> CacheStatus {
        let inner = self.lock();
        let state = match inner.state {
            State::Empty => CacheState::Empty,
            State::Loading { .. } => CacheState::Loading,
            State::Loaded(_) => CacheState::Loaded,
        };
        let serving = inner.state.serving();
        CacheStatus {
            state,
            secrets: serving.map(|s| s.len()),
            built_at: serving.map(|s| s.built_at()),
            attempts: inner.next_attempt,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a rebuild on this thread. The caller holds the lock and has seen
    /// that no rebuild is in flight.
    fn start(&self, mut inner: MutexGuard<'_, Inner>) -> Result<Arc<Snapshot>> {
        let attempt = inner.next_attempt;
        inner.next_attempt += 1;
        let previous = inner.state.serving().cloned();
        inner.state = State::Loading {
            attempt,
            previous: previous.clone(),
        };
        drop(inner);

        debug!(attempt, "rebuilding secret cache");

        let mut loading = Loading {
            cache: self,
            attempt,
            previous,
            finished: false,
        };
        let result = self.build().map(Arc::new).map_err(Arc::new);
        if let Err(e) = &result {
            warn!(attempt, error = %e, "failed to load password store");
        }
        loading.finish(result.clone());

        result.map_err(Error::Unavailable)
    }

    /// Wait for `attempt` to finish and share its result.
    fn join(&self, mut inner: MutexGuard<'_, Inner>, attempt: u64) -> Result<Arc<Snapshot>> {
        debug!(attempt, "waiting for rebuild in progress");

        while inner.state.loading_attempt() == Some(attempt) {
            inner = self
                .settled
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }

        match &inner.last {
            Some(outcome) if outcome.attempt >= attempt => {
                outcome.result.clone().map_err(Error::Unavailable)
            }
            // unreachable while `finish` records an outcome before leaving Loading
            _ => Err(Error::Unavailable(Arc::new(Error::Io(io::Error::other(
                "rebuild finished without an outcome",
            ))))),
        }
    }

    /// Walk, read, armor and encrypt. Touches no shared state.
    fn build(&self) -> Result<Snapshot> {
        let started = Instant::now();

        let files = self.store.discover()?;
        let mut items = Vec::with_capacity(files.len());
        let mut secrets = HashMap::with_capacity(files.len());
        for secret in files {
            let raw = secret.read()?;
            secrets.insert(secret.item.id(), armor::encode(&raw));
            items.push(secret.item);
        }

        if self.options.sort_index {
            items.sort_by(|a, b| {
                (&a.domain, &a.path, &a.username).cmp(&(&b.domain, &b.path, &b.username))
            });
        }

        let recipients = self.store.recipients()?;
        let index = encrypt_index(self.cipher.as_ref(), &items, &recipients)?;

        info!(
            secrets = secrets.len(),
            recipients = recipients.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "password store loaded"
        );

        Ok(Snapshot::new(index, secrets))
    }
}

/// Marks a rebuild as in flight. Installs the outcome on `finish`, or
/// restores the previous state if the rebuild unwinds.
struct Loading<'a> {
    cache: &'a SecretCache,
    attempt: u64,
    previous: Option<Arc<Snapshot>>,
    finished: bool,
}

impl Loading<'_> {
    fn finish(&mut self, result: std::result::Result<Arc<Snapshot>, Arc<Error>>) {
        let mut inner = self.cache.lock();

        inner.state = match &result {
            Ok(snapshot) => State::Loaded(Arc::clone(snapshot)),
            Err(_) => match self.previous.take() {
                Some(previous) => State::Loaded(previous),
                None => State::Empty,
            },
        };
        inner.last = Some(Outcome {
            attempt: self.attempt,
            result,
        });
        self.finished = true;

        drop(inner);
        self.cache.settled.notify_all();
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.finish(Err(Arc::new(Error::Io(io::Error::other(
                "rebuild aborted",
            )))));
        }
    }
}
