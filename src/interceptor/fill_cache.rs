use crate::core::Result;
use crate::metadata::{TableId, TableInfo};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// One update-fill property and the column it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillColumn {
    pub property: String,
    pub column: String,
}

/// Update-fill columns per table metadata instance, in declaration order
#[derive(Default)]
pub struct FillFieldCache {
    cache: RwLock<HashMap<TableId, Arc<[FillColumn]>>>,
}

impl FillFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty slice means auto-fill has nothing to do for this entity
    pub fn fillable_fields(&self, table: &TableInfo) -> Result<Arc<[FillColumn]>> {
        if let Some(fields) = self.cache.read()?.get(&table.id()) {
            return Ok(Arc::clone(fields));
        }

        let fields = Self::find_auto_fill_fields(table);
        debug!(
            "update-fill columns of '{}' ({}): {:?}",
            table.entity(),
            table.id(),
            fields.iter().map(|f| f.column.as_str()).collect::<Vec<_>>()
        );

        let mut cache = self.cache.write()?;
        Ok(Arc::clone(cache.entry(table.id()).or_insert(fields)))
    }

    pub fn cached_len(&self) -> Result<usize> {
        Ok(self.cache.read()?.len())
    }

    fn find_auto_fill_fields(table: &TableInfo) -> Arc<[FillColumn]> {
        table
            .fields()
            .iter()
            .filter(|f| f.is_with_update_fill())
            .map(|f| FillColumn {
                property: f.property.clone(),
                column: f.column.clone(),
            })
            .collect()
    }
}
