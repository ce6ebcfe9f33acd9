//! Entity Registry
//!
//! Maps dynamic entities to the views that draw them. Registration takes a
//! view from the grid view's pool; every tick syncs position, animation and
//! visibility from the entity; disposal hands the view back.
//!
//! The registry owns only the mapping. Entities stay in `DynamicModels`,
//! views stay in the `ViewPool`.

use std::collections::HashMap;

use macroquad::color::Color;
use thiserror::Error;

use super::entity::Entity;
use crate::model::{Activity, DynamicModels};
use crate::view::{ViewId, ViewPool};

/// Registration class of an entity view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum EntityCategory {
    /// Dynamic, visible-while-active entities
    Dynamic = 1,
}

impl EntityCategory {
    /// Tint applied to views of this category.
    pub fn tint(self) -> Color {
        match self {
            EntityCategory::Dynamic => Color::new(0.95, 0.35, 0.25, 1.0),
        }
    }
}

/// Contract violations when registering or waking entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("entity {0} is already registered")]
    AlreadyRegistered(Entity),
    #[error("entity {0} was woken but never registered")]
    NotRegistered(Entity),
    #[error("entity {0} does not exist")]
    UnknownEntity(Entity),
}

/// One entity's view binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub view: ViewId,
    pub category: EntityCategory,
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    records: HashMap<Entity, Registration>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity: Entity) -> Option<&Registration> {
        self.records.get(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bind a freshly spawned entity to a pooled view.
    ///
    /// The view starts hidden at the entity's position; the next `tick`
    /// shows it.
    pub fn register(
        &mut self,
        entity: Entity,
        category: EntityCategory,
        models: &DynamicModels,
        views: &mut ViewPool,
    ) -> Result<ViewId, RegistryError> {
        if self.records.contains_key(&entity) {
            return Err(RegistryError::AlreadyRegistered(entity));
        }
        let model = models.get(entity).ok_or(RegistryError::UnknownEntity(entity))?;

        let view = views.acquire();
        if let Some(sprite) = views.get_mut(view) {
            sprite.position = model.position();
            sprite.tint = category.tint();
        }
        self.records.insert(entity, Registration { view, category });
        tracing::debug!(
            "registered {} from {} -> view {} ({:?})",
            entity,
            model.owner(),
            view.index(),
            category
        );
        Ok(view)
    }

    /// Bring back the view of a dormant entity that was woken.
    pub fn reactivate(
        &mut self,
        entity: Entity,
        models: &DynamicModels,
        views: &mut ViewPool,
    ) -> Result<(), RegistryError> {
        let record = self.records.get(&entity).ok_or(RegistryError::NotRegistered(entity))?;
        let model = models.get(entity).ok_or(RegistryError::UnknownEntity(entity))?;

        if let Some(sprite) = views.get_mut(record.view) {
            sprite.position = model.position();
            sprite.visible = model.is_active();
            sprite.restart_animation();
        }
        tracing::debug!("reactivated {}", entity);
        Ok(())
    }

    /// Sync every view with its entity. Entities that are disposed (or gone)
    /// release their view and lose their record. Returns how many were dropped.
    pub fn tick(&mut self, dt: f32, models: &DynamicModels, views: &mut ViewPool) -> usize {
        let mut retired = Vec::new();

        for (&entity, record) in &self.records {
            let Some(model) = models.get(entity) else {
                retired.push(entity);
                continue;
            };
            let Some(sprite) = views.get_mut(record.view) else { continue };
            match model.activity() {
                Activity::Active => {
                    sprite.position = model.position();
                    sprite.visible = true;
                    sprite.animate(dt);
                }
                Activity::Dormant => sprite.visible = false,
                Activity::Disposed => retired.push(entity),
            }
        }

        for entity in &retired {
            if let Some(record) = self.records.remove(entity) {
                views.release(record.view);
                tracing::debug!("released view {} of {}", record.view.index(), entity);
            }
        }
        retired.len()
    }
}
