use crate::core::{DataType, FillError, Result, is_valid_identifier};
use super::EntityObject;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one `TableInfo` instance. Two metadata objects describing the
/// same entity still get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(u64);

impl TableId {
    fn next() -> Self {
        Self(NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// When the fill-value provider is allowed to populate a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldFill {
    #[default]
    Default,
    Insert,
    Update,
    InsertUpdate,
}

impl FieldFill {
    pub fn is_update_fill(&self) -> bool {
        matches!(self, Self::Update | Self::InsertUpdate)
    }

    pub fn is_insert_fill(&self) -> bool {
        matches!(self, Self::Insert | Self::InsertUpdate)
    }
}

/// Property -> column mapping of one entity field
#[derive(Debug, Clone)]
pub struct TableFieldInfo {
    pub property: String,
    pub column: String,
    pub data_type: DataType,
    pub fill: FieldFill,
}

impl TableFieldInfo {
    /// Column defaults to the property name
    pub fn new(property: impl Into<String>, data_type: DataType) -> Self {
        let property = property.into();
        Self {
            column: property.clone(),
            property,
            data_type,
            fill: FieldFill::Default,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn fill(mut self, fill: FieldFill) -> Self {
        self.fill = fill;
        self
    }

    pub fn is_with_update_fill(&self) -> bool {
        self.fill.is_update_fill()
    }

    pub fn is_with_insert_fill(&self) -> bool {
        self.fill.is_insert_fill()
    }
}

/// Table metadata of one entity type
#[derive(Debug)]
pub struct TableInfo {
    id: TableId,
    entity: String,
    table_name: String,
    fields: Vec<TableFieldInfo>,
}

impl TableInfo {
    pub fn new(entity: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            id: TableId::next(),
            entity: entity.into(),
            table_name: table_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: TableFieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[TableFieldInfo] {
        &self.fields
    }

    pub fn find_field_index(&self, property: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.property == property)
    }

    pub fn get_field(&self, property: &str) -> Option<&TableFieldInfo> {
        self.find_field_index(property).map(|idx| &self.fields[idx])
    }

    pub fn with_update_fill(&self) -> bool {
        self.fields.iter().any(TableFieldInfo::is_with_update_fill)
    }

    pub fn with_insert_fill(&self) -> bool {
        self.fields.iter().any(TableFieldInfo::is_with_insert_fill)
    }

    /// Zero-valued instance of this entity: every property is NULL
    pub fn new_instance(self: &Arc<Self>) -> EntityObject {
        EntityObject::new(Arc::clone(self))
    }

    fn validate(&self) -> Result<()> {
        if !is_valid_identifier(&self.table_name) {
            return Err(FillError::InvalidIdentifier(format!(
                "table name '{}' of entity '{}'",
                self.table_name, self.entity
            )));
        }

        for (idx, field) in self.fields.iter().enumerate() {
            if !is_valid_identifier(&field.column) {
                return Err(FillError::InvalidIdentifier(format!(
                    "column '{}' of entity '{}'",
                    field.column, self.entity
                )));
            }
            if self.fields[..idx].iter().any(|f| f.property == field.property) {
                return Err(FillError::Config(format!(
                    "Property '{}' declared twice on entity '{}'",
                    field.property, self.entity
                )));
            }
        }

        Ok(())
    }
}

/// Entity type name -> table metadata.
/// Immutable once built; `with_table` returns a new registry.
#[derive(Clone, Default)]
pub struct TableInfoRegistry {
    tables: Arc<HashMap<String, Arc<TableInfo>>>,
}

impl TableInfoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add metadata - returns a NEW registry
    pub fn with_table(self, info: TableInfo) -> Result<Self> {
        info.validate()?;

        let entity = info.entity().to_string();
        if self.tables.contains_key(&entity) {
            return Err(FillError::Config(format!(
                "Table metadata for entity '{}' already registered",
                entity
            )));
        }

        let mut new_tables = (*self.tables).clone();
        new_tables.insert(entity, Arc::new(info));

        Ok(Self {
            tables: Arc::new(new_tables),
        })
    }

    pub fn get(&self, entity: &str) -> Option<Arc<TableInfo>> {
        self.tables.get(entity).cloned()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.tables.contains_key(entity)
    }
}
