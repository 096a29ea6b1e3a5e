//! Configuration resolution
//!
//! Parameters are looked up by name against the active configuration scope,
//! falling back to the default scope. Switching the active scope broadcasts a
//! [`ScopeChangeEvent`] so components caching scope-derived state can
//! resynchronize.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::constants::DEFAULT_SCOPE;
use crate::error::AppError;
use crate::models::SiteAccess;

/// Named parameter lookup against the active configuration scope.
pub trait ConfigResolver: Send + Sync {
    /// Resolve a parameter in the active scope, falling back to the default
    /// scope. Unknown parameters are a configuration error.
    fn get_parameter(&self, name: &str) -> Result<String, AppError>;

    fn has_parameter(&self, name: &str) -> bool;

    /// Name of the currently active scope.
    fn current_scope(&self) -> String;
}

/// Broadcast when the active configuration scope changes.
#[derive(Debug, Clone)]
pub struct ScopeChangeEvent {
    pub site_access: SiteAccess,
}

impl ScopeChangeEvent {
    pub fn new(site_access: SiteAccess) -> Self {
        Self { site_access }
    }
}

/// Implemented by components that cache scope-derived state.
pub trait ScopeChangeSubscriber: Send + Sync {
    fn on_scope_change(&self, event: &ScopeChangeEvent);
}

/// Fans a scope change out to registered subscribers.
#[derive(Default)]
pub struct ScopeChangeDispatcher {
    subscribers: Vec<Arc<dyn ScopeChangeSubscriber>>,
}

impl ScopeChangeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn ScopeChangeSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn notify(&self, event: &ScopeChangeEvent) {
        tracing::debug!(
            scope = %event.site_access.name,
            subscribers = self.subscribers.len(),
            "Configuration scope changed"
        );
        for subscriber in &self.subscribers {
            subscriber.on_scope_change(event);
        }
    }
}

/// In-memory resolver with one parameter table per scope.
pub struct ScopedConfigResolver {
    scopes: HashMap<String, HashMap<String, String>>,
    active: RwLock<String>,
}

impl ScopedConfigResolver {
    pub fn new(scopes: HashMap<String, HashMap<String, String>>) -> Self {
        Self {
            scopes,
            active: RwLock::new(DEFAULT_SCOPE.to_string()),
        }
    }

    /// Switch the active scope. Callers are expected to notify subscribers
    /// through a [`ScopeChangeDispatcher`] afterwards.
    pub fn set_scope(&self, scope: impl Into<String>) {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = scope.into();
    }

    fn lookup(&self, scope: &str, name: &str) -> Option<&String> {
        self.scopes.get(scope).and_then(|params| params.get(name))
    }
}

impl ConfigResolver for ScopedConfigResolver {
    fn get_parameter(&self, name: &str) -> Result<String, AppError> {
        let scope = self.current_scope();
        self.lookup(&scope, name)
            .or_else(|| self.lookup(DEFAULT_SCOPE, name))
            .cloned()
            .ok_or_else(|| {
                AppError::Config(format!("Parameter '{}' not found in scope '{}'", name, scope))
            })
    }

    fn has_parameter(&self, name: &str) -> bool {
        let scope = self.current_scope();
        self.lookup(&scope, name).is_some() || self.lookup(DEFAULT_SCOPE, name).is_some()
    }

    fn current_scope(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
