use super::{AssignmentClause, ParamContext, condition_methods};
use crate::core::Value;

/// Fluent builder for a conditional partial UPDATE.
///
/// ```
/// use autofill_interceptor::wrapper::{UpdateWrapper, AssignmentClause, ConditionClause};
///
/// let wrapper = UpdateWrapper::new().set("name", "Alice").eq("id", 1);
/// assert_eq!(
///     wrapper.sql_set().as_deref(),
///     Some("name = #{ew.paramNameValuePairs.MPGENVAL1}")
/// );
/// assert_eq!(wrapper.sql_segment(), "id = #{ew.paramNameValuePairs.MPGENVAL2}");
/// ```
#[derive(Debug, Clone)]
pub struct UpdateWrapper {
    ctx: ParamContext,
    conditions: Vec<String>,
    sql_set: Vec<String>,
}

impl UpdateWrapper {
    pub fn new() -> Self {
        Self {
            ctx: ParamContext::new(),
            conditions: Vec::new(),
            sql_set: Vec::new(),
        }
    }

    /// `column = <bound value>`
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        let placeholder = self.ctx.bind(value.into());
        self.sql_set.push(format!("{} = {}", column, placeholder));
        self
    }

    /// Raw assignment fragment, taken as is
    pub fn set_sql(mut self, sql: &str) -> Self {
        self.append_set_sql(sql);
        self
    }
}

impl Default for UpdateWrapper {
    fn default() -> Self {
        Self::new()
    }
}

condition_methods!(UpdateWrapper);

impl AssignmentClause for UpdateWrapper {
    fn sql_set(&self) -> Option<String> {
        if self.sql_set.is_empty() {
            None
        } else {
            Some(self.sql_set.join(", "))
        }
    }

    fn append_set_sql(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            self.sql_set.push(fragment.to_string());
        }
    }

    fn placeholder(&self, param_name: &str) -> String {
        self.ctx.placeholder(param_name)
    }
}
