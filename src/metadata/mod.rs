pub mod entity;
pub mod mapper;
pub mod table;

pub use entity::{EntityObject, FieldAccessor};
pub use mapper::{MapperDefinition, MapperRegistry};
pub use table::{FieldFill, TableFieldInfo, TableId, TableInfo, TableInfoRegistry};
