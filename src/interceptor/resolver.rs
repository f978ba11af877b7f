use crate::core::{FillError, Result};
use crate::metadata::MapperRegistry;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Statement id -> entity type, memoized.
///
/// Resolution is pure, so two threads missing on the same id may both
/// compute it; the first insert wins.
#[derive(Default)]
pub struct EntityTypeResolver {
    cache: RwLock<HashMap<String, Option<Arc<str>>>>,
}

impl EntityTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity type bound by the mapper owning `statement_id`.
    ///
    /// `Ok(None)` when the mapper binds no entity. A malformed id or an
    /// unknown mapper is a configuration error and is not cached.
    pub fn resolve(&self, statement_id: &str, mappers: &MapperRegistry) -> Result<Option<Arc<str>>> {
        if let Some(entity) = self.cache.read()?.get(statement_id) {
            return Ok(entity.clone());
        }

        let owner = Self::owner_of(statement_id)?;
        let entity: Option<Arc<str>> = mappers.resolve_entity(owner)?.map(Arc::from);
        debug!("resolved statement '{}' -> entity {:?}", statement_id, entity);

        let mut cache = self.cache.write()?;
        Ok(cache
            .entry(statement_id.to_string())
            .or_insert(entity)
            .clone())
    }

    pub fn cached_len(&self) -> Result<usize> {
        Ok(self.cache.read()?.len())
    }

    fn owner_of(statement_id: &str) -> Result<&str> {
        match statement_id.rsplit_once('.') {
            Some((owner, method)) if !owner.is_empty() && !method.is_empty() => Ok(owner),
            _ => Err(FillError::EntityResolution(format!(
                "Malformed statement id '{}', expected '<mapper>.<method>'",
                statement_id
            ))),
        }
    }
}
