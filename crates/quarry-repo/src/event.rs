//! Before-events with deferred results.
//!
//! A listener running ahead of a destructive operation may supply the
//! operation's result, in which case the operation itself is skipped. The
//! result is tri-state: not computed, computed with no outcome, or computed
//! with a value. Reading a result that was never computed is a usage error.

use quarry_core::models::{Location, TrashItem};
use quarry_core::AppError;

/// Deferred result of an intercepted operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult<T> {
    NotComputed,
    Computed(Option<T>),
}

impl<T> EventResult<T> {
    /// Read the computed result. [`AppError::InvalidState`] while nothing
    /// has been computed; `Ok(None)` when the computation produced no value.
    pub fn get(&self) -> Result<Option<&T>, AppError> {
        match self {
            EventResult::NotComputed => Err(AppError::InvalidState(
                "Result is not set. Check is_set() or call set() before reading it.".to_string(),
            )),
            EventResult::Computed(value) => Ok(value.as_ref()),
        }
    }

    pub fn set(&mut self, value: Option<T>) {
        *self = EventResult::Computed(value);
    }

    pub fn reset(&mut self) {
        *self = EventResult::NotComputed;
    }

    /// True once a result has been supplied, even a `None` one.
    pub fn is_set(&self) -> bool {
        matches!(self, EventResult::Computed(_))
    }

    /// True only when a non-empty result has been supplied.
    pub fn has_value(&self) -> bool {
        matches!(self, EventResult::Computed(Some(_)))
    }

    pub fn into_computed(self) -> Option<T> {
        match self {
            EventResult::NotComputed => None,
            EventResult::Computed(value) => value,
        }
    }
}

impl<T> Default for EventResult<T> {
    fn default() -> Self {
        EventResult::NotComputed
    }
}

/// Fired before a location is moved to trash. Listeners may supply (or
/// clear) the trash item that would otherwise be produced by the operation.
#[derive(Debug, Clone)]
pub struct BeforeTrashEvent {
    location: Location,
    result: EventResult<TrashItem>,
    stopped: bool,
}

impl BeforeTrashEvent {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            result: EventResult::NotComputed,
            stopped: false,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The supplied result. Fails with [`AppError::InvalidState`] until a
    /// listener has called [`set_result`](Self::set_result).
    pub fn result(&self) -> Result<Option<&TrashItem>, AppError> {
        self.result.get()
    }

    pub fn set_result(&mut self, result: Option<TrashItem>) {
        self.result.set(result);
    }

    pub fn reset_result(&mut self) {
        self.result.reset();
    }

    pub fn is_result_set(&self) -> bool {
        self.result.is_set()
    }

    pub fn has_trash_item(&self) -> bool {
        self.result.has_value()
    }

    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn into_result(self) -> Option<TrashItem> {
        self.result.into_computed()
    }
}
