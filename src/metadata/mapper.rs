use crate::core::{FillError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Declaration of a mapper (persistence contract) type.
///
/// `entity` is the first type argument bound by the declaration; a mapper
/// that leaves it open inherits the binding from `parent`.
#[derive(Debug, Clone)]
pub struct MapperDefinition {
    pub name: String,
    pub entity: Option<String>,
    pub parent: Option<String>,
}

impl MapperDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity: None,
            parent: None,
        }
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Mapper type name -> declaration. Copy-on-write like `TableInfoRegistry`.
#[derive(Clone, Default)]
pub struct MapperRegistry {
    mappers: Arc<HashMap<String, MapperDefinition>>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapper(self, mapper: MapperDefinition) -> Result<Self> {
        if self.mappers.contains_key(&mapper.name) {
            return Err(FillError::Config(format!(
                "Mapper '{}' already registered",
                mapper.name
            )));
        }

        let mut new_mappers = (*self.mappers).clone();
        new_mappers.insert(mapper.name.clone(), mapper);

        Ok(Self {
            mappers: Arc::new(new_mappers),
        })
    }

    pub fn get(&self, name: &str) -> Option<&MapperDefinition> {
        self.mappers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mappers.contains_key(name)
    }

    /// Entity type bound by `owner`, following `extends` links.
    ///
    /// `Ok(None)` when the chain ends without binding an entity. A missing
    /// mapper anywhere on the chain, or a cycle, is an error.
    pub fn resolve_entity(&self, owner: &str) -> Result<Option<String>> {
        let mut visited = HashSet::new();
        let mut current = owner;

        loop {
            let mapper = self
                .get(current)
                .ok_or_else(|| FillError::MapperNotFound(current.to_string()))?;

            if let Some(entity) = &mapper.entity {
                return Ok(Some(entity.clone()));
            }

            if !visited.insert(current) {
                return Err(FillError::EntityResolution(format!(
                    "Cyclic mapper hierarchy at '{}'",
                    current
                )));
            }

            match &mapper.parent {
                Some(parent) => current = parent,
                None => return Ok(None),
            }
        }
    }
}
