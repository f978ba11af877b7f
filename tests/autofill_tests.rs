/// Auto-fill interceptor tests
///
/// End-to-end behaviour of the interceptor installed in a pipeline
/// Run with: cargo test --test autofill_tests

use autofill_interceptor::statement::{ENTITY, WRAPPER};
use autofill_interceptor::wrapper::{
    AssignmentClause, ChainUpdateWrapper, ConditionClause, QueryWrapper, UpdateClause,
};
use autofill_interceptor::{
    AutoFillConfig, AutoFillUpdateInterceptor, Configuration, DataType, ExecutionContext,
    FieldAccessor, FieldFill, FillError, InnerInterceptor, InterceptorPipeline, MappedStatement,
    MapperDefinition, MapperRegistry, MetaObjectHandler, ParamMap, ParamValue, ParameterObject,
    PlaceholderStyle, Result, SqlCommandType, TableFieldInfo, TableInfo, TableInfoRegistry,
    UpdateWrapper, Value, install,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const USER_UPDATE: &str = "app.mapper.UserMapper.update";

struct AuditHandler {
    calls: AtomicUsize,
}

impl AuditHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0) })
    }
}

impl MetaObjectHandler for AuditHandler {
    fn update_fill(&self, meta: &mut dyn FieldAccessor) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.strict_update_fill(meta, "updatedBy", Value::from("admin"))?;
        self.strict_update_fill(
            meta,
            "updatedAt",
            Value::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        )
    }
}

/// Fills nothing but `updatedBy`
struct PartialHandler;

impl MetaObjectHandler for PartialHandler {
    fn update_fill(&self, meta: &mut dyn FieldAccessor) -> Result<()> {
        self.strict_update_fill(meta, "updatedBy", Value::from("system"))
    }
}

fn user_table() -> TableInfo {
    TableInfo::new("User", "users")
        .field(TableFieldInfo::new("id", DataType::Integer))
        .field(TableFieldInfo::new("name", DataType::Text))
        .field(
            TableFieldInfo::new("updatedBy", DataType::Text)
                .column("updated_by")
                .fill(FieldFill::Update),
        )
        .field(
            TableFieldInfo::new("updatedAt", DataType::Timestamp)
                .column("updated_at")
                .fill(FieldFill::InsertUpdate),
        )
}

fn configuration(handler: Option<Arc<dyn MetaObjectHandler>>) -> Configuration {
    let tables = TableInfoRegistry::new()
        .with_table(user_table())
        .unwrap()
        .with_table(TableInfo::new("Tag", "tags").field(TableFieldInfo::new("label", DataType::Text)))
        .unwrap();
    let mappers = MapperRegistry::new()
        .with_mapper(MapperDefinition::new("app.mapper.UserMapper").entity("User"))
        .unwrap()
        .with_mapper(MapperDefinition::new("app.mapper.TagMapper").entity("Tag"))
        .unwrap()
        .with_mapper(MapperDefinition::new("app.mapper.AuditMapper").entity("User"))
        .unwrap()
        .with_mapper(MapperDefinition::new("app.mapper.AdminUserMapper").extends("app.mapper.AuditMapper"))
        .unwrap();

    Configuration {
        mappers,
        tables,
        meta_object_handler: handler,
    }
}

fn wrapper_param(wrapper: UpdateWrapper) -> ParameterObject {
    ParameterObject::Map(ParamMap::new().with(WRAPPER, wrapper))
}

fn update_clause(parameter: &ParameterObject) -> &dyn UpdateClause {
    parameter
        .as_map()
        .and_then(|m| m.wrapper())
        .and_then(|w| w.as_update())
        .expect("plain update wrapper")
}

fn run(
    interceptor: &AutoFillUpdateInterceptor,
    config: &Configuration,
    id: &str,
    parameter: &mut ParameterObject,
) -> Result<()> {
    let ms = MappedStatement::new(id, SqlCommandType::Update);
    interceptor.before_update(&ms, parameter, &ExecutionContext::new(config))
}

#[test]
fn test_named_placeholders_follow_caller_assignments() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::with_config(AutoFillConfig::new().param_prefix("p")).unwrap();
    let mut parameter = wrapper_param(
        UpdateWrapper::new()
            .with_style(PlaceholderStyle::Named)
            .set_sql("name = 'Alice'"),
    );

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(
        wrapper.sql_set().as_deref(),
        Some("name = 'Alice', updated_by = :p0, updated_at = :p1")
    );
    let params = wrapper.param_name_value_pairs();
    assert_eq!(params.get("p0"), Some(&Value::from("admin")));
    assert_eq!(
        params.get("p1"),
        Some(&Value::from(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn test_default_qualified_placeholders() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set("name", "Bob").eq("id", 1));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(
        wrapper.sql_set().as_deref(),
        Some(
            "name = #{ew.paramNameValuePairs.MPGENVAL1}, \
             updated_by = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}, \
             updated_at = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY1}"
        )
    );
    assert_eq!(wrapper.sql_segment(), "id = #{ew.paramNameValuePairs.MPGENVAL2}");
    assert_eq!(wrapper.param_name_value_pairs().len(), 4);
}

#[test]
fn test_caller_assigned_column_is_not_duplicated() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set("UPDATED_BY", "alice").set("name", "x"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let sql_set = update_clause(&parameter).sql_set().unwrap();
    assert_eq!(sql_set.matches("updated_by").count() + sql_set.matches("UPDATED_BY").count(), 1);
    assert!(sql_set.ends_with("updated_at = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}"));
}

#[test]
fn test_case_sensitive_matching_can_be_enabled() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor =
        AutoFillUpdateInterceptor::with_config(AutoFillConfig::new().case_insensitive_columns(false)).unwrap();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("UPDATED_BY = 'alice'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    assert!(update_clause(&parameter).sql_set().unwrap().contains("updated_by = "));
}

#[test]
fn test_all_columns_assigned_skips_provider() {
    let handler = AuditHandler::new();
    let config = configuration(Some(handler.clone()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(
        UpdateWrapper::new().set_sql("updated_by = 'x', updated_at = NOW()"),
    );

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    assert_eq!(
        update_clause(&parameter).sql_set().as_deref(),
        Some("updated_by = 'x', updated_at = NOW()")
    );
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_literal_comma_does_not_hide_columns() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Smith, updated_by = 1'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert!(wrapper.sql_set().unwrap().contains("updated_by = #{"));
    assert_eq!(wrapper.param_name_value_pairs().len(), 2);
}

#[test]
fn test_rerun_is_idempotent() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();
    let first = update_clause(&parameter).sql_set();
    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(wrapper.sql_set(), first);
    assert_eq!(wrapper.param_name_value_pairs().len(), 2);
}

#[test]
fn test_partial_fill_then_rerun_never_rebinds() {
    let config = configuration(Some(Arc::new(PartialHandler)));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();
    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(
        wrapper.sql_set().as_deref(),
        Some("name = 'Alice', updated_by = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}")
    );
    // updated_at was left unset by the provider: no NULL assignment, no parameter
    assert!(!wrapper.sql_set().unwrap().contains("updated_at"));
    assert_eq!(
        wrapper.param_name_value_pairs().get("AUTO_FILL_VALUE_KEY0"),
        Some(&Value::from("system"))
    );
    assert_eq!(wrapper.param_name_value_pairs().len(), 1);
}

#[test]
fn test_explicit_entity_passes_through() {
    let handler = AuditHandler::new();
    let config = configuration(Some(handler.clone()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let entity = config
        .tables
        .get("User")
        .unwrap()
        .new_instance()
        .with("name", "Carol")
        .unwrap();
    let mut parameter = ParameterObject::Map(
        ParamMap::new()
            .with(ENTITY, entity)
            .with(WRAPPER, UpdateWrapper::new().set_sql("name = 'Alice'")),
    );

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    assert_eq!(update_clause(&parameter).sql_set().as_deref(), Some("name = 'Alice'"));
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_null_entity_key_still_fills() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = ParameterObject::Map(
        ParamMap::new()
            .with(ENTITY, ParamValue::Null)
            .with(WRAPPER, UpdateWrapper::new().set_sql("name = 'Alice'")),
    );

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    assert_eq!(update_clause(&parameter).param_name_value_pairs().len(), 2);
}

#[test]
fn test_non_update_statements_pass_through() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();

    for command in [SqlCommandType::Insert, SqlCommandType::Delete, SqlCommandType::Select] {
        let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));
        let ms = MappedStatement::new(USER_UPDATE, command);
        interceptor
            .before_update(&ms, &mut parameter, &ExecutionContext::new(&config))
            .unwrap();
        assert_eq!(update_clause(&parameter).sql_set().as_deref(), Some("name = 'Alice'"));
    }
}

#[test]
fn test_single_parameter_passes_through() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = ParameterObject::Single(ParamValue::from(UpdateWrapper::new().set_sql("name = 'A'")));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let ParameterObject::Single(ParamValue::Wrapper(wrapper)) = &parameter else {
        panic!("parameter shape changed");
    };
    assert_eq!(wrapper.as_update().unwrap().sql_set().as_deref(), Some("name = 'A'"));
}

#[test]
fn test_chain_wrapper_skips_metadata_resolution() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = ParameterObject::Map(ParamMap::new().with(
        WRAPPER,
        ChainUpdateWrapper::new(42, UpdateWrapper::new().set_sql("name = 'Alice'")),
    ));

    // unknown mapper would be fatal if resolution ran
    run(&interceptor, &config, "app.mapper.GhostMapper.update", &mut parameter).unwrap();

    assert_eq!(interceptor.entity_types().cached_len().unwrap(), 0);
    let map = parameter.as_map().unwrap();
    let Some(autofill_interceptor::WrapperParam::Chain(chain)) = map.wrapper() else {
        panic!("expected chain wrapper");
    };
    assert_eq!(chain.session(), 42);
    assert_eq!(chain.wrapper().sql_set().as_deref(), Some("name = 'Alice'"));
}

#[test]
fn test_query_wrapper_and_missing_handler_pass_through() {
    let interceptor = AutoFillUpdateInterceptor::new();

    let config = configuration(Some(AuditHandler::new()));
    let mut parameter = ParameterObject::Map(ParamMap::new().with(WRAPPER, QueryWrapper::new().eq("id", 1)));
    run(&interceptor, &config, "app.mapper.GhostMapper.update", &mut parameter).unwrap();

    let config = configuration(None);
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));
    run(&interceptor, &config, "app.mapper.GhostMapper.update", &mut parameter).unwrap();
    assert_eq!(update_clause(&parameter).sql_set().as_deref(), Some("name = 'Alice'"));

    let mut parameter = ParameterObject::Map(ParamMap::new());
    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();
    assert_eq!(interceptor.entity_types().cached_len().unwrap(), 0);
}

#[test]
fn test_entity_without_fill_fields_is_untouched() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set("label", "rust"));
    let before = update_clause(&parameter).sql_set();

    run(&interceptor, &config, "app.mapper.TagMapper.update", &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(wrapper.sql_set(), before);
    assert_eq!(wrapper.param_name_value_pairs().len(), 1);
}

#[test]
fn test_inherited_mapper_entity() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Root'"));

    run(&interceptor, &config, "app.mapper.AdminUserMapper.update", &mut parameter).unwrap();

    assert_eq!(update_clause(&parameter).param_name_value_pairs().len(), 2);
}

#[test]
fn test_unknown_mapper_is_fatal() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();

    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));
    let err = run(&interceptor, &config, "app.mapper.GhostMapper.update", &mut parameter).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(update_clause(&parameter).sql_set().as_deref(), Some("name = 'Alice'"));

    let err = run(&interceptor, &config, "update", &mut parameter).unwrap_err();
    assert!(matches!(err, FillError::EntityResolution(_)));
}

#[test]
fn test_disabled_interceptor_is_inert() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::with_config(AutoFillConfig::new().enabled(false)).unwrap();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("name = 'Alice'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    assert_eq!(update_clause(&parameter).sql_set().as_deref(), Some("name = 'Alice'"));
}

#[test]
fn test_invalid_prefix_is_rejected_at_install() {
    let hostile = AutoFillConfig::new().param_prefix("x}, name = (SELECT pw FROM admin) #{");

    let mut pipeline = InterceptorPipeline::new();
    let err = install(&mut pipeline, hostile.clone()).unwrap_err();
    assert!(matches!(err, FillError::Config(_)));
    assert!(pipeline.list_interceptors().is_empty());

    assert!(matches!(
        AutoFillUpdateInterceptor::with_config(hostile),
        Err(FillError::Config(_))
    ));

    let mut config = AutoFillConfig::new();
    config.param_prefix = "ew.p".to_string();
    assert!(AutoFillUpdateInterceptor::with_config(config).is_err());

    install(&mut pipeline, AutoFillConfig::new().param_prefix("AUDIT_")).unwrap();
    assert_eq!(pipeline.list_interceptors(), vec!["AUTO_FILL_UPDATE"]);
}

#[test]
fn test_table_qualified_caller_column_is_not_duplicated() {
    let config = configuration(Some(AuditHandler::new()));
    let interceptor = AutoFillUpdateInterceptor::new();
    let mut parameter = wrapper_param(UpdateWrapper::new().set_sql("users.updated_by = 'bob'"));

    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();

    let wrapper = update_clause(&parameter);
    assert_eq!(
        wrapper.sql_set().as_deref(),
        Some("users.updated_by = 'bob', updated_at = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}")
    );
    assert_eq!(wrapper.param_name_value_pairs().len(), 1);

    let mut parameter =
        wrapper_param(UpdateWrapper::new().set_sql("`users`.[Updated_At] = NOW(), name = 'x'"));
    run(&interceptor, &config, USER_UPDATE, &mut parameter).unwrap();
    let sql_set = update_clause(&parameter).sql_set().unwrap();
    assert!(!sql_set.contains(" updated_at = "));
    assert!(sql_set.ends_with("updated_by = #{ew.paramNameValuePairs.AUTO_FILL_VALUE_KEY0}"));
}

#[test]
fn test_pipeline_runs_interceptors_in_order() {
    struct Marker;

    impl InnerInterceptor for Marker {
        fn name(&self) -> &'static str {
            "MARKER"
        }

        fn before_update(
            &self,
            _ms: &MappedStatement,
            parameter: &mut ParameterObject,
            _ctx: &ExecutionContext<'_>,
        ) -> Result<()> {
            if let Some(wrapper) = parameter
                .as_map_mut()
                .and_then(|m| m.wrapper_mut())
                .and_then(|w| w.as_update_mut())
            {
                wrapper.append_set_sql("version = version + 1");
            }
            Ok(())
        }
    }

    let config = configuration(Some(AuditHandler::new()));
    let mut pipeline = InterceptorPipeline::new();
    pipeline.add_inner_interceptor(Box::new(Marker));
    pipeline.add_inner_interceptor(Box::new(Arc::clone(AutoFillUpdateInterceptor::global())));
    assert_eq!(pipeline.list_interceptors(), vec!["MARKER", "AUTO_FILL_UPDATE"]);

    let ms = MappedStatement::new(USER_UPDATE, SqlCommandType::Update);
    let mut parameter = wrapper_param(UpdateWrapper::new());
    pipeline
        .before_update(&ms, &mut parameter, &ExecutionContext::new(&config))
        .unwrap();

    let sql_set = update_clause(&parameter).sql_set().unwrap();
    assert!(sql_set.starts_with("version = version + 1, updated_by = "));
}
