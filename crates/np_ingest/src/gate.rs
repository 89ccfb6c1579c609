use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for the gate; injectable so tests can control expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Time-boxed freshness flag per fetch scope. A fresh scope means the last
/// sweep is recent enough that a new one would be redundant. Check-then-mark
/// is best effort; a race costs at most one duplicate fetch, and store
/// inserts are idempotent on URL.
pub struct RefreshGate {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    marked: Mutex<HashMap<String, Instant>>,
}

/// Matches the upstream fetch schedule of one sweep every six hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

impl RefreshGate {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            marked: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_fresh(&self, scope: &str) -> bool {
        let marked = self.marked.lock().unwrap();
        match marked.get(scope) {
            Some(at) => self.clock.now().duration_since(*at) < self.ttl,
            None => false,
        }
    }

    pub fn mark_fetched(&self, scope: &str) {
        self.marked
            .lock()
            .unwrap()
            .insert(scope.to_string(), self.clock.now());
    }

    pub fn global_scope() -> String {
        "global".to_string()
    }

    /// Scope key for a local sweep, built from the input coordinates
    /// rounded to two decimals so nearby requests share a gate entry.
    pub fn local_scope(lat: f64, lon: f64) -> String {
        format!("local:{:.2},{:.2}", lat, lon)
    }
}
