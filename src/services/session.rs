use std::sync::{Arc, Mutex, PoisonError};

use crate::models::SessionState;

type Notifier = dyn Fn(&SessionState) + Send + Sync;

/// Shared container for the active session. Pure state: no I/O, no
/// validation. The controller and the typing renderer are the only writers.
///
/// Every `update` runs the change notifier with a snapshot taken after the
/// mutation, which is how the webview hears about state changes. The lock is
/// never held across an await point.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    notifier: Arc<Notifier>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_notifier(|_| {})
    }

    pub fn with_notifier(notifier: impl Fn(&SessionState) + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            notifier: Arc::new(notifier),
        }
    }

    /// Clone out the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mutate the state under the lock, then notify with the result.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut SessionState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let result = mutate(&mut state);
            (result, state.clone())
        };
        (self.notifier)(&snapshot);
        result
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
