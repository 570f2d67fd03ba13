use super::*;
use crate::config::BreakerConfig;
use crate::logging;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// `StateChangeListener` listens on the state change events of the breakers in a `BreakerManager`.
/// Listeners run synchronously while the breaker is locked, they must not call back into it.
/// Transitions caused by a panicking request are not dispatched to the listeners.
pub trait StateChangeListener: Sync + Send {
    /// `on_transform_to_closed` is triggered when circuit breaker state transformed to Closed.
    fn on_transform_to_closed(&self, name: &str, prev: State);

    /// `on_transform_to_open` is triggered when circuit breaker state transformed to Open.
    fn on_transform_to_open(&self, name: &str, prev: State);

    /// `on_transform_to_half_open` is triggered when circuit breaker state transformed to HalfOpen.
    fn on_transform_to_half_open(&self, name: &str, prev: State);
}

type Listeners = Arc<RwLock<Vec<Arc<dyn StateChangeListener>>>>;

/// `BreakerManager` keeps the breakers of a process by name, and dispatches their state
/// changes to the registered listeners.
#[derive(Default)]
pub struct BreakerManager {
    breakers: RwLock<HashMap<String, CircuitBreaker>>,
    listeners: Listeners,
}

lazy_static! {
    static ref DEFAULT_MANAGER: BreakerManager = BreakerManager::new();
}

/// `default_manager` returns the process-wide manager filled by the `init_*` APIs.
pub fn default_manager() -> &'static BreakerManager {
    &DEFAULT_MANAGER
}

/// `register_state_change_listeners` registers listeners on the default manager.
pub fn register_state_change_listeners(listeners: Vec<Arc<dyn StateChangeListener>>) {
    DEFAULT_MANAGER.register_state_change_listeners(listeners);
}

/// `clear_state_change_listeners` clears the listeners of the default manager.
pub fn clear_state_change_listeners() {
    DEFAULT_MANAGER.clear_state_change_listeners();
}

impl BreakerManager {
    pub fn new() -> Self {
        BreakerManager::default()
    }

    pub fn register_state_change_listeners(&self, mut listeners: Vec<Arc<dyn StateChangeListener>>) {
        if listeners.is_empty() {
            return;
        }
        self.listeners.write().append(&mut listeners);
    }

    pub fn clear_state_change_listeners(&self) {
        self.listeners.write().clear();
    }

    /// `get_or_create` returns the breaker named `settings.name`, it is built from `settings`
    /// if absent. The settings are ignored for an existing breaker.
    pub fn get_or_create(&self, settings: Settings) -> CircuitBreaker {
        self.get_or_insert(settings).0
    }

    // the flag tells whether the breaker was built by this call
    fn get_or_insert(&self, settings: Settings) -> (CircuitBreaker, bool) {
        if let Some(cb) = self.breakers.read().get(&settings.name) {
            return (cb.clone(), false);
        }
        let mut breakers = self.breakers.write();
        if let Some(cb) = breakers.get(&settings.name) {
            return (cb.clone(), false);
        }
        let name = settings.name.clone();
        let cb = CircuitBreaker::new(self.notify_listeners(settings));
        breakers.insert(name.clone(), cb.clone());
        logging::info!("[BreakerManager] Circuit breaker was created, name {}", name);
        (cb, true)
    }

    pub fn get(&self, name: &str) -> Option<CircuitBreaker> {
        self.breakers.read().get(name).cloned()
    }

    /// `remove` drops the breaker from the manager, handles held elsewhere keep working.
    pub fn remove(&self, name: &str) -> bool {
        self.breakers.write().remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.breakers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.breakers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.read().is_empty()
    }

    pub fn clear(&self) {
        self.breakers.write().clear();
    }

    /// `load_configs` builds the breakers declared in `configs`.
    /// Invalid configs are ignored, and existing breakers are kept as is.
    /// The number of newly built breakers is returned.
    pub fn load_configs(&self, configs: Vec<BreakerConfig>) -> usize {
        let mut loaded = 0;
        for config in configs {
            if let Err(err) = config.check() {
                logging::warn!(
                    "[BreakerManager load_configs] Ignoring invalid breaker config {:?}, reason: {:?}",
                    config,
                    err
                );
                continue;
            }
            if self.get_or_insert(config.to_settings()).1 {
                loaded += 1;
            } else {
                logging::info!(
                    "[BreakerManager load_configs] Breaker {} exists, so ignore the config",
                    config.name
                );
            }
        }
        loaded
    }

    // chains the listeners after the notifier of the settings
    fn notify_listeners(&self, settings: Settings) -> Settings {
        let listeners = Arc::clone(&self.listeners);
        let on_state_change = settings.on_state_change.clone();
        settings.with_on_state_change(move |name, prev, state| {
            if let Some(on_state_change) = &on_state_change {
                on_state_change(name, prev, state);
            }
            let listeners = listeners.read().clone();
            for listener in &listeners {
                match state {
                    State::Closed => listener.on_transform_to_closed(name, prev),
                    State::Open => listener.on_transform_to_open(name, prev),
                    State::HalfOpen => listener.on_transform_to_half_open(name, prev),
                }
            }
        })
    }
}

impl fmt::Debug for BreakerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerManager")
            .field("breakers", &self.names())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
