use crate::handler::MetaObjectHandler;
use crate::metadata::{MapperRegistry, TableInfoRegistry};
use std::sync::Arc;

/// Framework-wide settings visible to interceptors
#[derive(Clone, Default)]
pub struct Configuration {
    pub mappers: MapperRegistry,
    pub tables: TableInfoRegistry,
    pub meta_object_handler: Option<Arc<dyn MetaObjectHandler>>,
}

impl Configuration {
    pub fn new(mappers: MapperRegistry, tables: TableInfoRegistry) -> Self {
        Self {
            mappers,
            tables,
            meta_object_handler: None,
        }
    }

    pub fn meta_object_handler(mut self, handler: Arc<dyn MetaObjectHandler>) -> Self {
        self.meta_object_handler = Some(handler);
        self
    }
}

pub struct ExecutionContext<'a> {
    pub config: &'a Configuration,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    pub fn meta_object_handler(&self) -> Option<&Arc<dyn MetaObjectHandler>> {
        self.config.meta_object_handler.as_ref()
    }
}
