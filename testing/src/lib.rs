//! # EcoWear Testing
//!
//! Testing utilities and helpers for the EcoWear storefront architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (`FixedClock`, `InMemoryStorage`)
//! - A fluent Given-When-Then builder for reducer tests ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use ecowear_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(AppReducer)
//!     .with_env(test_environment())
//!     .given_state(AppState::default())
//!     .when_action(AppAction::Session(SessionAction::Logout))
//!     .then_state(|state| {
//!         assert!(state.session.current_user.is_none());
//!     })
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use ecowear_core::environment::{Clock, Storage};


pub use mocks::{FixedClock, InMemoryStorage, test_clock};
pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Storage, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ecowear_testing::mocks::FixedClock;
    /// use ecowear_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory storage fake for the durable key-value port
    ///
    /// Stands in for the JSON-blob persistence in tests and lets them
    /// inspect what was written (for example, that the session blob never
    /// contains a password).
    #[derive(Debug, Default)]
    pub struct InMemoryStorage {
        entries: Mutex<HashMap<String, String>>,
    }

    impl InMemoryStorage {
        /// Create an empty in-memory storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage pre-populated with the given entries
        #[must_use]
        pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
            Self {
                entries: Mutex::new(entries.into_iter().collect()),
            }
        }

        /// Number of keys currently stored
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        /// Whether the storage holds no keys
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn is_empty(&self) -> bool {
            self.entries.lock().unwrap().is_empty()
        }
    }

    impl Storage for InMemoryStorage {
        #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable in tests
        fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        #[allow(clippy::unwrap_used)]
        fn set(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }

        #[allow(clippy::unwrap_used)]
        fn remove(&self, key: &str) {
            self.entries.lock().unwrap().remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecowear_core::environment::Storage;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_in_memory_storage_roundtrip() {
        let storage = InMemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("missing"), None);

        storage.set("key", "value");
        assert_eq!(storage.get("key"), Some("value".to_string()));
        assert_eq!(storage.len(), 1);

        storage.set("key", "replaced");
        assert_eq!(storage.get("key"), Some("replaced".to_string()));

        storage.remove("key");
        assert_eq!(storage.get("key"), None);
    }
}
