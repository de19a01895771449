// Copyright (C) 2015-2025 The Neo Project.
//
// observer.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Listener for node status changes.
///
/// Callbacks run inline on the proxy's background thread, between status polls and
/// queued operations. They must return quickly.
pub trait NodeObserver: Send + Sync {
    fn peer_count_updated(&self, _count: usize) {}

    fn last_known_block_height_updated(&self, _height: u64) {}

    fn local_blockchain_updated(&self, _height: u64) {}
}

/// Registry of observers.
///
/// Only weak references are kept: the owner of an observer controls its lifetime and
/// is expected to remove it before dropping it. Observers that were dropped anyway are
/// skipped and pruned.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<Vec<Weak<dyn NodeObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `observer` is already registered.
    pub fn add(&self, observer: &Arc<dyn NodeObserver>) -> bool {
        let mut observers = self.observers.lock();
        let candidate = Arc::downgrade(observer);
        if observers.iter().any(|o| Weak::ptr_eq(o, &candidate)) {
            return false;
        }
        observers.push(candidate);
        true
    }

    /// Returns `false` if `observer` is not registered.
    pub fn remove(&self, observer: &Arc<dyn NodeObserver>) -> bool {
        let mut observers = self.observers.lock();
        let target = Arc::downgrade(observer);
        match observers.iter().position(|o| Weak::ptr_eq(o, &target)) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` on every live observer in registration order.
    ///
    /// The list is copied before fan-out so observers may add or remove registrations
    /// from inside a notification.
    pub fn notify<F>(&self, f: F)
    where
        F: Fn(&dyn NodeObserver),
    {
        let live: Vec<Arc<dyn NodeObserver>> = {
            let mut observers = self.observers.lock();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        for observer in live {
            f(observer.as_ref());
        }
    }

    pub fn peer_count_updated(&self, count: usize) {
        self.notify(|o| o.peer_count_updated(count));
    }

    pub fn last_known_block_height_updated(&self, height: u64) {
        self.notify(|o| o.last_known_block_height_updated(height));
    }

    pub fn local_blockchain_updated(&self, height: u64) {
        self.notify(|o| o.local_blockchain_updated(height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl NodeObserver for Recorder {
        fn peer_count_updated(&self, count: usize) {
            self.events.lock().push(format!("peers:{count}"));
        }

        fn last_known_block_height_updated(&self, height: u64) {
            self.events.lock().push(format!("known:{height}"));
        }
    }

    fn observer() -> (Arc<Recorder>, Arc<dyn NodeObserver>) {
        let recorder = Arc::new(Recorder::default());
        let handle: Arc<dyn NodeObserver> = recorder.clone();
        (recorder, handle)
    }

    #[test]
    fn add_twice_fails() {
        let registry = ObserverRegistry::new();
        let (_recorder, handle) = observer();
        assert!(registry.add(&handle));
        assert!(!registry.add(&handle));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_unregistered_fails() {
        let registry = ObserverRegistry::new();
        let (_a, first) = observer();
        let (_b, second) = observer();
        assert!(!registry.remove(&first));
        assert!(registry.add(&first));
        assert!(!registry.remove(&second));
        assert!(registry.remove(&first));
        assert!(!registry.remove(&first));
        assert!(registry.is_empty());
    }

    #[test]
    fn each_observer_notified_once_per_event() {
        let registry = ObserverRegistry::new();
        let (first, first_handle) = observer();
        let (second, second_handle) = observer();
        registry.add(&first_handle);
        registry.add(&second_handle);

        registry.peer_count_updated(4);
        registry.last_known_block_height_updated(120);

        for recorder in [&first, &second] {
            assert_eq!(*recorder.events.lock(), vec!["peers:4", "known:120"]);
        }
    }

    #[test]
    fn removed_observer_stops_receiving() {
        let registry = ObserverRegistry::new();
        let (recorder, handle) = observer();
        registry.add(&handle);
        registry.peer_count_updated(1);
        registry.remove(&handle);
        registry.peer_count_updated(2);
        assert_eq!(*recorder.events.lock(), vec!["peers:1"]);
    }

    #[test]
    fn dropped_observer_is_skipped() {
        let registry = ObserverRegistry::new();
        let (recorder, handle) = observer();
        registry.add(&handle);
        drop(handle);
        drop(recorder);
        registry.peer_count_updated(3);
        assert!(registry.is_empty());
    }

    struct SelfRemoving {
        registry: Arc<ObserverRegistry>,
        me: Mutex<Option<Arc<dyn NodeObserver>>>,
        calls: Mutex<u32>,
    }

    impl NodeObserver for SelfRemoving {
        fn peer_count_updated(&self, _count: usize) {
            *self.calls.lock() += 1;
            if let Some(me) = self.me.lock().take() {
                self.registry.remove(&me);
            }
        }
    }

    #[test]
    fn observer_may_unregister_during_notification() {
        let registry = Arc::new(ObserverRegistry::new());
        let observer = Arc::new(SelfRemoving {
            registry: Arc::clone(&registry),
            me: Mutex::new(None),
            calls: Mutex::new(0),
        });
        let handle: Arc<dyn NodeObserver> = observer.clone();
        *observer.me.lock() = Some(Arc::clone(&handle));
        registry.add(&handle);

        registry.peer_count_updated(1);
        registry.peer_count_updated(2);
        assert_eq!(*observer.calls.lock(), 1);
        assert!(registry.is_empty());
    }
}
