use super::{ParamContext, condition_methods};

/// Condition-only builder; carries no SET clause
#[derive(Debug, Clone)]
pub struct QueryWrapper {
    ctx: ParamContext,
    conditions: Vec<String>,
}

impl QueryWrapper {
    pub fn new() -> Self {
        Self {
            ctx: ParamContext::new(),
            conditions: Vec::new(),
        }
    }
}

impl Default for QueryWrapper {
    fn default() -> Self {
        Self::new()
    }
}

condition_methods!(QueryWrapper);
