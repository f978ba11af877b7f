use super::FillColumn;
use crate::core::{Result, Value};
use crate::handler::MetaObjectHandler;
use crate::metadata::{FieldAccessor, TableInfo};
use std::sync::Arc;

/// Fill value produced for one column; `None` when the provider left it unset
#[derive(Debug, Clone)]
pub struct MaterializedField<'a> {
    pub field: &'a FillColumn,
    pub value: Option<Value>,
}

/// Run the provider's update hook against a throwaway instance of `table`
/// and read back `fields`. The instance is dropped before returning.
pub fn materialize<'a>(
    table: &Arc<TableInfo>,
    fields: &[&'a FillColumn],
    handler: &dyn MetaObjectHandler,
) -> Result<Vec<MaterializedField<'a>>> {
    let mut carrier = table.new_instance();
    handler.update_fill(&mut carrier)?;

    fields
        .iter()
        .map(|&field| {
            let value = carrier.get_value(&field.property)?;
            Ok(MaterializedField {
                field,
                value: (!value.is_null()).then(|| value.clone()),
            })
        })
        .collect()
}
