// ============================================================================
// Auto-fill interceptor for wrapper-built UPDATE statements
// ============================================================================

pub mod core;
pub mod handler;
pub mod interceptor;
pub mod metadata;
pub mod statement;
pub mod wrapper;

// Re-export main types for convenience
pub use crate::core::{DataType, FillError, Result, Value};
pub use handler::MetaObjectHandler;
pub use interceptor::{AutoFillConfig, AutoFillUpdateInterceptor, InnerInterceptor, InterceptorPipeline};
pub use metadata::{
    EntityObject, FieldAccessor, FieldFill, MapperDefinition, MapperRegistry, TableFieldInfo,
    TableInfo, TableInfoRegistry,
};
pub use statement::{
    Configuration, ExecutionContext, MappedStatement, ParamMap, ParamValue, ParameterObject,
    SqlCommandType,
};
pub use wrapper::{PlaceholderStyle, UpdateWrapper, WrapperParam};

/// Install the auto-fill interceptor into an update pipeline
///
/// # Examples
///
/// ```
/// use autofill_interceptor::statement::WRAPPER;
/// use autofill_interceptor::wrapper::AssignmentClause;
/// use autofill_interceptor::{
///     AutoFillConfig, Configuration, DataType, ExecutionContext, FieldAccessor, FieldFill,
///     InterceptorPipeline, MappedStatement, MapperDefinition, MapperRegistry, MetaObjectHandler,
///     ParamMap, ParameterObject, Result, SqlCommandType, TableFieldInfo, TableInfo,
///     TableInfoRegistry, UpdateWrapper, Value, WrapperParam, install,
/// };
/// use std::sync::Arc;
///
/// struct AuditHandler;
///
/// impl MetaObjectHandler for AuditHandler {
///     fn update_fill(&self, meta: &mut dyn FieldAccessor) -> Result<()> {
///         self.strict_update_fill(meta, "updatedBy", Value::from("admin"))
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let tables = TableInfoRegistry::new().with_table(
///     TableInfo::new("User", "users")
///         .field(TableFieldInfo::new("name", DataType::Text))
///         .field(
///             TableFieldInfo::new("updatedBy", DataType::Text)
///                 .column("updated_by")
///                 .fill(FieldFill::Update),
///         ),
/// )?;
/// let mappers = MapperRegistry::new()
///     .with_mapper(MapperDefinition::new("app.UserMapper").entity("User"))?;
/// let config = Configuration::new(mappers, tables).meta_object_handler(Arc::new(AuditHandler));
///
/// let mut pipeline = InterceptorPipeline::new();
/// install(&mut pipeline, AutoFillConfig::default())?;
///
/// let ms = MappedStatement::new("app.UserMapper.update", SqlCommandType::Update);
/// let mut parameter = ParameterObject::Map(
///     ParamMap::new().with(WRAPPER, UpdateWrapper::new().set_sql("name = 'Alice'")),
/// );
/// pipeline.before_update(&ms, &mut parameter, &ExecutionContext::new(&config))?;
///
/// let map = parameter.as_map().unwrap();
/// let wrapper = map.wrapper().and_then(WrapperParam::as_update).unwrap();
/// assert_eq!(
///     wrapper.sql_set().as_deref(),
///     Some("name = 'Alice', updated_by = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}")
/// );
/// # Ok(())
/// # }
/// ```
pub fn install(pipeline: &mut InterceptorPipeline, config: AutoFillConfig) -> Result<()> {
    pipeline.add_inner_interceptor(Box::new(AutoFillUpdateInterceptor::with_config(config)?));
    Ok(())
}
