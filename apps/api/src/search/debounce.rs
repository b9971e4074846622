//! Debounced suggestion lookups.
//!
//! Every call takes a ticket from a per-client sequence counter. A call runs its fetch
//! only if no newer ticket was issued during the quiet period, and its result is
//! dropped if a newer ticket was issued while the fetch was in flight. A slow, stale
//! response can therefore never overwrite a fresh one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

/// Upper bound on tracked clients. Idle debouncers are evicted first; past that,
/// new clients get an untracked debouncer.
const MAX_TRACKED_CLIENTS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Debounced<T> {
    Fresh(T),
    Superseded,
}

pub struct SuggestionDebouncer {
    latest: AtomicU64,
    quiet_period: Duration,
}

impl SuggestionDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            latest: AtomicU64::new(0),
            quiet_period,
        }
    }

    pub async fn run<F, Fut, T>(&self, fetch: F) -> Debounced<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.quiet_period).await;
        if self.is_stale(ticket) {
            debug!("Suggestion request {ticket} superseded during quiet period");
            return Debounced::Superseded;
        }

        let result = fetch().await;
        if self.is_stale(ticket) {
            debug!("Suggestion request {ticket} superseded while in flight");
            return Debounced::Superseded;
        }

        Debounced::Fresh(result)
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) != ticket
    }
}

/// One debouncer per client id.
pub struct SuggestionSessions {
    clients: Mutex<HashMap<String, Arc<SuggestionDebouncer>>>,
    quiet_period: Duration,
    capacity: usize,
}

impl SuggestionSessions {
    pub fn new(quiet_period: Duration) -> Self {
        Self::with_capacity(quiet_period, MAX_TRACKED_CLIENTS)
    }

    pub fn with_capacity(quiet_period: Duration, capacity: usize) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            quiet_period,
            capacity,
        }
    }

    pub fn debouncer(&self, client_id: &str) -> Arc<SuggestionDebouncer> {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = clients.get(client_id) {
            return existing.clone();
        }

        if clients.len() >= self.capacity {
            // Keep only debouncers with a request in flight.
            clients.retain(|_, d| Arc::strong_count(d) > 1);
        }

        let debouncer = Arc::new(SuggestionDebouncer::new(self.quiet_period));
        if clients.len() >= self.capacity {
            // Every tracked client is busy. Serve this one without supersede tracking.
            warn!(
                "Suggestion sessions full ({} clients); {client_id} is untracked",
                clients.len()
            );
            return debouncer;
        }
        clients.insert(client_id.to_string(), debouncer.clone());
        debouncer
    }

    #[cfg(test)]
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
