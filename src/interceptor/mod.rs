pub mod autofill;
pub mod config;
pub mod fill_cache;
pub mod injector;
pub mod materializer;
pub mod resolver;
pub mod scanner;

pub use autofill::AutoFillUpdateInterceptor;
pub use config::AutoFillConfig;
pub use fill_cache::{FillColumn, FillFieldCache};
pub use materializer::MaterializedField;
pub use resolver::EntityTypeResolver;

use crate::core::Result;
use crate::statement::{ExecutionContext, MappedStatement, ParameterObject};
use log::debug;

/// Hook run before a statement reaches the executor
pub trait InnerInterceptor: Send + Sync {
    /// Name for diagnostics
    fn name(&self) -> &'static str;

    /// May rewrite the parameter object of an INSERT/UPDATE/DELETE.
    /// An error aborts the statement.
    fn before_update(
        &self,
        ms: &MappedStatement,
        parameter: &mut ParameterObject,
        ctx: &ExecutionContext<'_>,
    ) -> Result<()>;
}

/// Ordered chain of inner interceptors; the framework's single install point
#[derive(Default)]
pub struct InterceptorPipeline {
    interceptors: Vec<Box<dyn InnerInterceptor>>,
}

impl InterceptorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_inner_interceptor(&mut self, interceptor: Box<dyn InnerInterceptor>) {
        debug!("registered inner interceptor: {}", interceptor.name());
        self.interceptors.push(interceptor);
    }

    /// Run every interceptor in registration order; the first error wins
    pub fn before_update(
        &self,
        ms: &MappedStatement,
        parameter: &mut ParameterObject,
        ctx: &ExecutionContext<'_>,
    ) -> Result<()> {
        for interceptor in &self.interceptors {
            interceptor.before_update(ms, parameter, ctx)?;
        }
        Ok(())
    }

    pub fn list_interceptors(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }
}

impl<T: InnerInterceptor + ?Sized> InnerInterceptor for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn before_update(
        &self,
        ms: &MappedStatement,
        parameter: &mut ParameterObject,
        ctx: &ExecutionContext<'_>,
    ) -> Result<()> {
        (**self).before_update(ms, parameter, ctx)
    }
}
