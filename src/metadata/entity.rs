use crate::core::{DataType, FillError, Result, Value};
use super::TableInfo;
use std::sync::Arc;

/// Property access by name over an entity-shaped object.
///
/// This is the handle a `MetaObjectHandler` receives: it never sees the
/// concrete entity, only named properties.
pub trait FieldAccessor {
    /// Entity type name of the underlying object
    fn entity_type(&self) -> &str;

    fn has_property(&self, property: &str) -> bool;

    /// Declared type of a property, `None` if unknown
    fn property_type(&self, property: &str) -> Option<DataType>;

    fn get_value(&self, property: &str) -> Result<&Value>;

    /// Type-checked against the declared property type
    fn set_value(&mut self, property: &str, value: Value) -> Result<()>;
}

/// Dynamically shaped entity instance backed by its table metadata
#[derive(Debug, Clone)]
pub struct EntityObject {
    table: Arc<TableInfo>,
    values: Vec<Value>,
}

impl EntityObject {
    pub fn new(table: Arc<TableInfo>) -> Self {
        let values = vec![Value::Null; table.fields().len()];
        Self { table, values }
    }

    /// Builder-style setter, handy when assembling an explicit entity parameter
    pub fn with(mut self, property: &str, value: impl Into<Value>) -> Result<Self> {
        self.set_value(property, value.into())?;
        Ok(self)
    }

    pub fn table(&self) -> &Arc<TableInfo> {
        &self.table
    }

    /// (property, value) pairs in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.table
            .fields()
            .iter()
            .map(|f| f.property.as_str())
            .zip(self.values.iter())
    }

    fn index_of(&self, property: &str) -> Result<usize> {
        self.table.find_field_index(property).ok_or_else(|| {
            FillError::PropertyNotFound(property.to_string(), self.table.entity().to_string())
        })
    }
}

impl FieldAccessor for EntityObject {
    fn entity_type(&self) -> &str {
        self.table.entity()
    }

    fn has_property(&self, property: &str) -> bool {
        self.table.find_field_index(property).is_some()
    }

    fn property_type(&self, property: &str) -> Option<DataType> {
        self.table.get_field(property).map(|f| f.data_type)
    }

    fn get_value(&self, property: &str) -> Result<&Value> {
        let idx = self.index_of(property)?;
        Ok(&self.values[idx])
    }

    fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
        let idx = self.index_of(property)?;
        let data_type = self.table.fields()[idx].data_type;

        if !data_type.is_compatible(&value) {
            return Err(FillError::TypeMismatch(format!(
                "Property '{}.{}' expects type {}, got {}",
                self.table.entity(),
                property,
                data_type,
                value.type_name()
            )));
        }

        self.values[idx] = value;
        Ok(())
    }
}
