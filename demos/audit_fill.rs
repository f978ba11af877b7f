//! Wrapper-driven update with audit columns filled by the interceptor.
//!
//! Run with: cargo run --example audit_fill

use autofill_interceptor::statement::WRAPPER;
use autofill_interceptor::wrapper::{AssignmentClause, ConditionClause};
use autofill_interceptor::{
    AutoFillConfig, Configuration, DataType, ExecutionContext, FieldAccessor, FieldFill,
    InterceptorPipeline, MappedStatement, MapperDefinition, MapperRegistry, MetaObjectHandler,
    ParamMap, ParameterObject, SqlCommandType, TableFieldInfo, TableInfo, TableInfoRegistry,
    UpdateWrapper, Value, install,
};
use chrono::Utc;
use std::sync::Arc;

struct AuditMetaObjectHandler;

impl MetaObjectHandler for AuditMetaObjectHandler {
    fn insert_fill(&self, meta: &mut dyn FieldAccessor) -> autofill_interceptor::Result<()> {
        self.strict_insert_fill(meta, "createdTime", Value::from(Utc::now()))?;
        self.strict_insert_fill(meta, "createdBy", Value::from("admin"))
    }

    fn update_fill(&self, meta: &mut dyn FieldAccessor) -> autofill_interceptor::Result<()> {
        self.strict_update_fill(meta, "updatedTime", Value::from(Utc::now()))?;
        self.strict_update_fill(meta, "updatedBy", Value::from("admin"))
    }
}

fn main() -> anyhow::Result<()> {
    let users = TableInfo::new("User", "users")
        .field(TableFieldInfo::new("id", DataType::Integer))
        .field(TableFieldInfo::new("name", DataType::Text))
        .field(TableFieldInfo::new("createdTime", DataType::Timestamp).column("created_time").fill(FieldFill::Insert))
        .field(TableFieldInfo::new("createdBy", DataType::Text).column("created_by").fill(FieldFill::Insert))
        .field(TableFieldInfo::new("updatedTime", DataType::Timestamp).column("updated_time").fill(FieldFill::Update))
        .field(TableFieldInfo::new("updatedBy", DataType::Text).column("updated_by").fill(FieldFill::Update));

    let config = Configuration::new(
        MapperRegistry::new().with_mapper(MapperDefinition::new("demo.mapper.UserMapper").entity("User"))?,
        TableInfoRegistry::new().with_table(users)?,
    )
    .meta_object_handler(Arc::new(AuditMetaObjectHandler));

    let mut pipeline = InterceptorPipeline::new();
    install(&mut pipeline, AutoFillConfig::default())?;

    // UPDATE users SET name = ? WHERE id = ?
    let wrapper = UpdateWrapper::new().set("name", "123").eq("id", 1);
    let mut parameter = ParameterObject::Map(ParamMap::new().with(WRAPPER, wrapper));
    let ms = MappedStatement::new("demo.mapper.UserMapper.update", SqlCommandType::Update);

    pipeline.before_update(&ms, &mut parameter, &ExecutionContext::new(&config))?;

    let wrapper = parameter
        .as_map()
        .and_then(|m| m.wrapper())
        .and_then(|w| w.as_update())
        .ok_or_else(|| anyhow::anyhow!("update wrapper missing"))?;

    println!(
        "UPDATE users SET {} WHERE {}",
        wrapper.sql_set().unwrap_or_default(),
        wrapper.sql_segment()
    );
    let mut params: Vec<_> = wrapper.param_name_value_pairs().iter().collect();
    params.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in params {
        println!("  {} = {}", name, value);
    }

    Ok(())
}
