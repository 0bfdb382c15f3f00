//! Ordered area registry
//!
//! The registry is the instance's owning collection of areas. It is kept in
//! ascending numeric area-id order at all times: insertion places the area
//! at its sorted position rather than appending and re-sorting, so any
//! walk over the registry (display, cross-area fan-out, shutdown) is
//! deterministic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = AreaRegistry::new();
//! registry.insert(area)?;
//!
//! if let Some(area) = registry.lookup(AreaId::new(1)) {
//!     println!("{}", area.summary());
//! }
//! ```

use crate::area::{Area, AreaId};
use crate::error::{Error, Result};

/// Areas of one instance, sorted by identifier
#[derive(Debug, Default)]
pub struct AreaRegistry {
    areas: Vec<Area>,
}

impl AreaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an area at its sorted position
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Area)`: the area, now owned by the registry
    /// - `Err(Error::DuplicateArea)`: an area with the same id is present;
    ///   the rejected area is dropped
    pub fn insert(&mut self, area: Area) -> Result<&mut Area> {
        let id = area.id();
        let index = self.areas.partition_point(|a| a.id() < id);

        if self.areas.get(index).is_some_and(|a| a.id() == id) {
            return Err(Error::DuplicateArea(id));
        }

        self.areas.insert(index, area);
        Ok(&mut self.areas[index])
    }

    /// Find an area by identifier
    pub fn lookup(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id() == id)
    }

    /// Find an area by identifier, mutably
    pub fn lookup_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.id() == id)
    }

    /// Detach an area without destroying it
    pub fn remove(&mut self, id: AreaId) -> Option<Area> {
        let index = self.areas.iter().position(|a| a.id() == id)?;
        Some(self.areas.remove(index))
    }

    /// Iterate in ascending identifier order
    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> Vec<AreaId> {
        self.areas.iter().map(Area::id).collect()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
