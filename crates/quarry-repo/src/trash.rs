//! Trash service.
//!
//! Moving a location to trash is interceptable: listeners receive a
//! [`BeforeTrashEvent`] and may supply the result themselves, in which case
//! the gateway is never invoked.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use quarry_core::models::{Location, TrashItem};
use quarry_core::AppError;
use uuid::Uuid;

use crate::event::BeforeTrashEvent;

/// Persistence seam for the content tree and its trash holding area.
#[async_trait]
pub trait LocationGateway: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Location, AppError>;

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Location>, AppError>;

    /// Remove the location (and its subtree) from the tree and park it in
    /// the trash holding area.
    async fn move_to_trash(&self, location: &Location) -> Result<TrashItem, AppError>;

    /// Put a trashed location back into the tree.
    async fn recover(&self, trash_item: &TrashItem) -> Result<Location, AppError>;

    /// Drop a trash item permanently.
    async fn purge(&self, trash_item: &TrashItem) -> Result<(), AppError>;

    async fn trash_items(&self) -> Result<Vec<TrashItem>, AppError>;
}

/// In-memory content tree, keyed by location id.
#[derive(Default)]
pub struct MemoryLocationGateway {
    locations: RwLock<HashMap<Uuid, Location>>,
    trash: RwLock<HashMap<Uuid, TrashItem>>,
}

impl MemoryLocationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, location: Location) {
        let mut locations = self.locations.write().unwrap_or_else(|e| e.into_inner());
        locations.insert(location.id, location);
    }

    pub fn contains(&self, id: Uuid) -> bool {
        let locations = self.locations.read().unwrap_or_else(|e| e.into_inner());
        locations.contains_key(&id)
    }
}

#[async_trait]
impl LocationGateway for MemoryLocationGateway {
    async fn load(&self, id: Uuid) -> Result<Location, AppError> {
        let locations = self.locations.read().unwrap_or_else(|e| e.into_inner());
        locations
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Location '{}' does not exist", id)))
    }

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Location>, AppError> {
        let locations = self.locations.read().unwrap_or_else(|e| e.into_inner());
        Ok(locations
            .values()
            .filter(|location| location.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn move_to_trash(&self, location: &Location) -> Result<TrashItem, AppError> {
        let subtree_prefix = format!("{}/", location.path);
        let mut locations = self.locations.write().unwrap_or_else(|e| e.into_inner());

        locations
            .remove(&location.id)
            .ok_or_else(|| AppError::NotFound(format!("Location '{}' does not exist", location.id)))?;
        locations.retain(|_, candidate| !candidate.path.starts_with(&subtree_prefix));

        let item = TrashItem::new(location.clone());
        let mut trash = self.trash.write().unwrap_or_else(|e| e.into_inner());
        trash.insert(item.id, item.clone());

        tracing::info!(location = %location.id, path = %location.path, "Location moved to trash");
        Ok(item)
    }

    async fn recover(&self, trash_item: &TrashItem) -> Result<Location, AppError> {
        let mut trash = self.trash.write().unwrap_or_else(|e| e.into_inner());
        let item = trash.remove(&trash_item.id).ok_or_else(|| {
            AppError::NotFound(format!("Trash item '{}' does not exist", trash_item.id))
        })?;
        drop(trash);

        let location = item.location;
        self.insert(location.clone());

        tracing::info!(location = %location.id, "Location recovered from trash");
        Ok(location)
    }

    async fn purge(&self, trash_item: &TrashItem) -> Result<(), AppError> {
        let mut trash = self.trash.write().unwrap_or_else(|e| e.into_inner());
        trash.remove(&trash_item.id).ok_or_else(|| {
            AppError::NotFound(format!("Trash item '{}' does not exist", trash_item.id))
        })?;
        Ok(())
    }

    async fn trash_items(&self) -> Result<Vec<TrashItem>, AppError> {
        let trash = self.trash.read().unwrap_or_else(|e| e.into_inner());
        Ok(trash.values().cloned().collect())
    }
}

/// Listener running ahead of the trash operation.
pub trait TrashEventListener: Send + Sync {
    fn on_before_trash(&self, event: &mut BeforeTrashEvent);
}

pub struct TrashService {
    gateway: Arc<dyn LocationGateway>,
    listeners: Vec<Arc<dyn TrashEventListener>>,
}

impl TrashService {
    pub fn new(gateway: Arc<dyn LocationGateway>) -> Self {
        Self {
            gateway,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn TrashEventListener>) {
        self.listeners.push(listener);
    }

    /// Move a location to trash.
    ///
    /// Listeners run first; when one of them supplies a result the gateway
    /// is skipped and that result (possibly none) is returned as is.
    pub async fn trash(&self, location: Location) -> Result<Option<TrashItem>, AppError> {
        let mut event = BeforeTrashEvent::new(location);
        for listener in &self.listeners {
            listener.on_before_trash(&mut event);
            if event.is_propagation_stopped() {
                break;
            }
        }

        if event.is_result_set() {
            tracing::debug!(
                location = %event.location().id,
                has_item = event.has_trash_item(),
                "Trash result supplied by listener"
            );
            return Ok(event.into_result());
        }

        let item = self.gateway.move_to_trash(event.location()).await?;
        Ok(Some(item))
    }

    pub async fn recover(&self, trash_item: &TrashItem) -> Result<Location, AppError> {
        self.gateway.recover(trash_item).await
    }

    /// Purge every trash item. Returns how many were dropped.
    pub async fn empty_trash(&self) -> Result<usize, AppError> {
        let items = self.gateway.trash_items().await?;
        for item in &items {
            self.gateway.purge(item).await?;
        }
        tracing::info!(purged = items.len(), "Trash emptied");
        Ok(items.len())
    }
}
