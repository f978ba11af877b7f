use super::{
    AutoFillConfig, EntityTypeResolver, FillColumn, FillFieldCache, InnerInterceptor, injector,
    materializer, scanner,
};
use crate::core::Result;
use crate::statement::{ENTITY, ExecutionContext, MappedStatement, ParameterObject, SqlCommandType};
use crate::wrapper::{AssignmentClause, WrapperParam};
use lazy_static::lazy_static;
use log::{debug, trace, warn};
use std::sync::Arc;
use tracing::debug_span;

lazy_static! {
    static ref GLOBAL_INTERCEPTOR: Arc<AutoFillUpdateInterceptor> =
        Arc::new(AutoFillUpdateInterceptor::new());
}

/// Adds update-fill assignments to wrapper-driven UPDATE statements.
///
/// A wrapper update carries no entity, so the provider's update hook never
/// runs for it. This interceptor runs the hook against a throwaway entity and
/// copies the produced values into the wrapper as bound `SET` fragments,
/// skipping columns the caller already assigns.
pub struct AutoFillUpdateInterceptor {
    config: AutoFillConfig,
    entity_types: EntityTypeResolver,
    fill_fields: FillFieldCache,
}

impl AutoFillUpdateInterceptor {
    pub fn new() -> Self {
        Self::build(AutoFillConfig::default())
    }

    /// Validate `config` and build an interceptor from it.
    ///
    /// The prefix is spliced into placeholder text, so an invalid one is
    /// rejected here rather than at fill time.
    pub fn with_config(config: AutoFillConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: AutoFillConfig) -> Self {
        Self {
            config,
            entity_types: EntityTypeResolver::new(),
            fill_fields: FillFieldCache::new(),
        }
    }

    /// Shared instance with default configuration
    pub fn global() -> &'static Arc<AutoFillUpdateInterceptor> {
        &GLOBAL_INTERCEPTOR
    }

    pub fn config(&self) -> &AutoFillConfig {
        &self.config
    }

    pub fn entity_types(&self) -> &EntityTypeResolver {
        &self.entity_types
    }

    pub fn fill_fields(&self) -> &FillFieldCache {
        &self.fill_fields
    }

    fn fill_field(
        &self,
        ms: &MappedStatement,
        parameter: &mut ParameterObject,
        ctx: &ExecutionContext<'_>,
    ) -> Result<()> {
        let Some(map) = parameter.as_map_mut() else {
            trace!("{}: parameter is not a map", ms.id());
            return Ok(());
        };

        if map.contains_non_null(ENTITY) {
            trace!("{}: explicit entity present, framework fill applies", ms.id());
            return Ok(());
        }

        let Some(wrapper) = map.wrapper_mut() else {
            return Ok(());
        };
        if wrapper.is_chain() {
            trace!("{}: chain wrapper skipped", ms.id());
            return Ok(());
        }

        let Some(handler) = ctx.meta_object_handler() else {
            return Ok(());
        };

        let WrapperParam::Plain(update) = wrapper else {
            trace!("{}: wrapper has no assignment capability", ms.id());
            return Ok(());
        };

        let Some(entity) = self.entity_types.resolve(ms.id(), &ctx.config.mappers)? else {
            return Ok(());
        };
        let Some(table) = ctx.config.tables.get(&entity) else {
            warn!("{}: no table metadata for entity '{}'", ms.id(), entity);
            return Ok(());
        };
        if !table.with_update_fill() {
            return Ok(());
        }

        let fill_fields = self.fill_fields.fillable_fields(&table)?;

        let case_insensitive = self.config.case_insensitive_columns;
        let existing = scanner::already_assigned_columns(update.sql_set().as_deref(), case_insensitive);
        let needed: Vec<&FillColumn> = fill_fields
            .iter()
            .filter(|f| !existing.contains(&scanner::normalize_column(&f.column, case_insensitive)))
            .collect();
        if needed.is_empty() {
            trace!("{}: all update-fill columns already assigned", ms.id());
            return Ok(());
        }

        let values = materializer::materialize(&table, &needed, &**handler)?;
        let injected = injector::inject(&mut **update, &values, &self.config.param_prefix);
        debug!("{}: injected {} auto-fill assignment(s)", ms.id(), injected.len());

        Ok(())
    }
}

impl Default for AutoFillUpdateInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl InnerInterceptor for AutoFillUpdateInterceptor {
    fn name(&self) -> &'static str {
        "AUTO_FILL_UPDATE"
    }

    fn before_update(
        &self,
        ms: &MappedStatement,
        parameter: &mut ParameterObject,
        ctx: &ExecutionContext<'_>,
    ) -> Result<()> {
        if !self.config.enabled || ms.command() != SqlCommandType::Update {
            return Ok(());
        }

        let span = debug_span!("autofill.before_update", statement = %ms.id());
        let _enter = span.enter();

        self.fill_field(ms, parameter, ctx)
    }
}
