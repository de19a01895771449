// Copyright (C) 2015-2025 The Neo Project.
//
// lifecycle.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use parking_lot::Mutex;
use std::fmt;

/// Proxy lifecycle stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotInitialized,
    Initializing,
    Initialized,
    ShuttingDown,
    ShutDown,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::NotInitialized => write!(f, "not initialized"),
            LifecycleState::Initializing => write!(f, "initializing"),
            LifecycleState::Initialized => write!(f, "initialized"),
            LifecycleState::ShuttingDown => write!(f, "shutting down"),
            LifecycleState::ShutDown => write!(f, "shut down"),
        }
    }
}

/// Guarded transitions between [`LifecycleState`]s.
///
/// Every transition is a compare-and-set under one lock, so concurrent `init` and
/// `shutdown` callers see a single winner.
#[derive(Debug)]
pub struct InitState {
    state: Mutex<LifecycleState>,
}

impl Default for InitState {
    fn default() -> Self {
        Self::new()
    }
}

impl InitState {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::NotInitialized),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub fn initialized(&self) -> bool {
        self.state() == LifecycleState::Initialized
    }

    /// `NotInitialized | ShutDown -> Initializing`
    pub fn begin_init(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            LifecycleState::NotInitialized | LifecycleState::ShutDown => {
                *state = LifecycleState::Initializing;
                true
            }
            _ => false,
        }
    }

    /// `Initializing -> Initialized`, performed by the background thread once it owns the
    /// transport.
    pub fn end_init(&self) -> bool {
        self.transition(LifecycleState::Initializing, LifecycleState::Initialized)
    }

    /// `Initializing -> NotInitialized` when the background thread could not start.
    pub fn abort_init(&self) -> bool {
        self.transition(LifecycleState::Initializing, LifecycleState::NotInitialized)
    }

    /// `Initialized -> ShuttingDown`
    pub fn begin_shutdown(&self) -> bool {
        self.transition(LifecycleState::Initialized, LifecycleState::ShuttingDown)
    }

    /// `ShuttingDown -> ShutDown`, after the background thread has been joined.
    pub fn end_shutdown(&self) -> bool {
        self.transition(LifecycleState::ShuttingDown, LifecycleState::ShutDown)
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        let mut state = self.state.lock();
        if *state != from {
            return false;
        }
        *state = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn full_cycle_and_restart() {
        let state = InitState::new();
        assert!(state.begin_init());
        assert!(!state.initialized());
        assert!(state.end_init());
        assert!(state.initialized());
        assert!(state.begin_shutdown());
        assert!(state.end_shutdown());
        assert_eq!(state.state(), LifecycleState::ShutDown);

        // Re-init after shutdown starts over.
        assert!(state.begin_init());
        assert!(state.end_init());
        assert!(state.initialized());
    }

    #[test]
    fn init_is_refused_while_busy() {
        let state = InitState::new();
        assert!(state.begin_init());
        assert!(!state.begin_init());
        assert!(state.end_init());
        assert!(!state.begin_init());
        assert!(state.begin_shutdown());
        assert!(!state.begin_init());
    }

    #[test]
    fn shutdown_requires_initialized() {
        let state = InitState::new();
        assert!(!state.begin_shutdown());
        assert!(state.begin_init());
        assert!(!state.begin_shutdown());
        assert!(state.end_init());
        assert!(state.begin_shutdown());
        assert!(!state.begin_shutdown());
        assert!(!state.end_init());
    }

    #[test]
    fn abort_init_returns_to_not_initialized() {
        let state = InitState::new();
        assert!(!state.abort_init());
        assert!(state.begin_init());
        assert!(state.abort_init());
        assert_eq!(state.state(), LifecycleState::NotInitialized);
        assert!(!state.end_init());
    }

    #[test]
    fn concurrent_begin_init_has_one_winner() {
        let state = Arc::new(InitState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || state.begin_init())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
