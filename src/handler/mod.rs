use crate::core::{Result, Value};
use crate::metadata::FieldAccessor;
use log::trace;

/// Pluggable fill-value provider.
///
/// Receives a property handle over an entity-shaped object and decides which
/// audit properties to populate. Implementations usually call the `strict_*`
/// helpers so that a value already present is never overwritten.
pub trait MetaObjectHandler: Send + Sync {
    /// Called before an INSERT. No-op unless overridden.
    fn insert_fill(&self, _meta: &mut dyn FieldAccessor) -> Result<()> {
        Ok(())
    }

    /// Called before an UPDATE
    fn update_fill(&self, meta: &mut dyn FieldAccessor) -> Result<()>;

    /// Set `property` to `value` only if the property exists, accepts the
    /// value's type and is still NULL
    fn strict_update_fill(
        &self,
        meta: &mut dyn FieldAccessor,
        property: &str,
        value: Value,
    ) -> Result<()> {
        self.fill_strategy(meta, property, value)
    }

    fn strict_insert_fill(
        &self,
        meta: &mut dyn FieldAccessor,
        property: &str,
        value: Value,
    ) -> Result<()> {
        self.fill_strategy(meta, property, value)
    }

    /// Default strategy: unknown property, NULL value, incompatible type or an
    /// already populated property all leave the object untouched
    fn fill_strategy(&self, meta: &mut dyn FieldAccessor, property: &str, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let Some(data_type) = meta.property_type(property) else {
            trace!("fill skipped: '{}' has no property '{}'", meta.entity_type(), property);
            return Ok(());
        };

        if !data_type.is_compatible(&value) {
            trace!(
                "fill skipped: '{}.{}' is {}, provider offered {}",
                meta.entity_type(),
                property,
                data_type,
                value.type_name()
            );
            return Ok(());
        }

        if !meta.get_value(property)?.is_null() {
            return Ok(());
        }

        meta.set_value(property, value)
    }
}
