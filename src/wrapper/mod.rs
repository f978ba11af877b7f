pub mod chain;
pub mod query;
pub mod update;

pub use chain::{ChainUpdateWrapper, SessionId};
pub use query::QueryWrapper;
pub use update::UpdateWrapper;

use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Alias the wrapper is bound under in the parameter map
pub const DEFAULT_PARAM_ALIAS: &str = "ew";
/// Path segment between the alias and a parameter name in a qualified placeholder
pub const WRAPPER_PARAM_MIDDLE: &str = ".paramNameValuePairs.";

/// How a bound parameter is referenced from SQL text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaceholderStyle {
    /// `#{ew.paramNameValuePairs.NAME}`
    #[default]
    Qualified,
    /// `:NAME`
    Named,
}

impl PlaceholderStyle {
    pub fn render(&self, alias: &str, param_name: &str) -> String {
        match self {
            Self::Qualified => format!("#{{{}{}{}}}", alias, WRAPPER_PARAM_MIDDLE, param_name),
            Self::Named => format!(":{}", param_name),
        }
    }
}

/// WHERE-side capability of a condition builder
pub trait ConditionClause {
    /// Condition text, empty when there are no conditions
    fn sql_segment(&self) -> String;

    fn param_alias(&self) -> &str;

    fn param_name_value_pairs(&self) -> &HashMap<String, Value>;

    fn param_name_value_pairs_mut(&mut self) -> &mut HashMap<String, Value>;
}

/// SET-side capability of a condition builder
pub trait AssignmentClause {
    /// Raw `col = expr, ...` text, `None` when nothing is assigned yet
    fn sql_set(&self) -> Option<String>;

    /// Append one `col = expr` fragment after the existing ones
    fn append_set_sql(&mut self, fragment: &str);

    /// SQL reference to a parameter registered in this builder
    fn placeholder(&self, param_name: &str) -> String;
}

/// Builder with both capabilities
pub trait UpdateClause: ConditionClause + AssignmentClause + Send + Sync + fmt::Debug {}

impl<T> UpdateClause for T where T: ConditionClause + AssignmentClause + Send + Sync + fmt::Debug {}

/// Builder with the condition capability only
pub trait QueryClause: ConditionClause + Send + Sync + fmt::Debug {}

impl<T> QueryClause for T where T: ConditionClause + Send + Sync + fmt::Debug {}

/// Builder found under the wrapper key, tagged by what it can do
#[derive(Debug)]
pub enum WrapperParam {
    /// Conditions plus assignments, detached from any session
    Plain(Box<dyn UpdateClause>),
    /// Bound to a live session; its parameter context is not ours to touch
    Chain(ChainUpdateWrapper),
    /// No assignment capability
    Other(Box<dyn QueryClause>),
}

impl WrapperParam {
    pub fn is_chain(&self) -> bool {
        matches!(self, Self::Chain(_))
    }

    pub fn as_update(&self) -> Option<&dyn UpdateClause> {
        match self {
            Self::Plain(wrapper) => Some(wrapper.as_ref()),
            _ => None,
        }
    }

    pub fn as_update_mut(&mut self) -> Option<&mut dyn UpdateClause> {
        match self {
            Self::Plain(wrapper) => Some(wrapper.as_mut()),
            _ => None,
        }
    }
}

impl From<UpdateWrapper> for WrapperParam {
    fn from(wrapper: UpdateWrapper) -> Self {
        Self::Plain(Box::new(wrapper))
    }
}

impl From<QueryWrapper> for WrapperParam {
    fn from(wrapper: QueryWrapper) -> Self {
        Self::Other(Box::new(wrapper))
    }
}

impl From<ChainUpdateWrapper> for WrapperParam {
    fn from(wrapper: ChainUpdateWrapper) -> Self {
        Self::Chain(wrapper)
    }
}

/// Parameter bookkeeping shared by the concrete wrappers
#[derive(Debug, Clone)]
pub(crate) struct ParamContext {
    alias: String,
    style: PlaceholderStyle,
    seq: usize,
    params: HashMap<String, Value>,
}

impl ParamContext {
    const GEN_PARAM_PREFIX: &'static str = "MPGENVAL";

    pub(crate) fn new() -> Self {
        Self {
            alias: DEFAULT_PARAM_ALIAS.to_string(),
            style: PlaceholderStyle::default(),
            seq: 0,
            params: HashMap::new(),
        }
    }

    /// Register `value` under a fresh name and return its placeholder
    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.seq += 1;
        let name = format!("{}{}", Self::GEN_PARAM_PREFIX, self.seq);
        let placeholder = self.placeholder(&name);
        self.params.insert(name, value);
        placeholder
    }

    pub(crate) fn placeholder(&self, param_name: &str) -> String {
        self.style.render(&self.alias, param_name)
    }
}

/// Comparison helpers shared by `UpdateWrapper` and `QueryWrapper`.
/// Both expose `ctx: ParamContext` and `conditions: Vec<String>`.
macro_rules! condition_methods {
    ($ty:ty) => {
        impl $ty {
            pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
                self.ctx.alias = alias.into();
                self
            }

            pub fn with_style(mut self, style: $crate::wrapper::PlaceholderStyle) -> Self {
                self.ctx.style = style;
                self
            }

            pub fn eq(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, "=", value.into())
            }

            pub fn ne(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, "<>", value.into())
            }

            pub fn gt(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, ">", value.into())
            }

            pub fn ge(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, ">=", value.into())
            }

            pub fn lt(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, "<", value.into())
            }

            pub fn le(self, column: &str, value: impl Into<$crate::core::Value>) -> Self {
                self.compare(column, "<=", value.into())
            }

            pub fn is_null(mut self, column: &str) -> Self {
                self.conditions.push(format!("{} IS NULL", column));
                self
            }

            fn compare(mut self, column: &str, op: &str, value: $crate::core::Value) -> Self {
                let placeholder = self.ctx.bind(value);
                self.conditions.push(format!("{} {} {}", column, op, placeholder));
                self
            }
        }

        impl $crate::wrapper::ConditionClause for $ty {
            fn sql_segment(&self) -> String {
                self.conditions.join(" AND ")
            }

            fn param_alias(&self) -> &str {
                &self.ctx.alias
            }

            fn param_name_value_pairs(&self) -> &std::collections::HashMap<String, $crate::core::Value> {
                &self.ctx.params
            }

            fn param_name_value_pairs_mut(
                &mut self,
            ) -> &mut std::collections::HashMap<String, $crate::core::Value> {
                &mut self.ctx.params
            }
        }
    };
}

pub(crate) use condition_methods;
