pub mod context;
pub mod parameter;

pub use context::{Configuration, ExecutionContext};
pub use parameter::{ENTITY, ParamMap, ParamValue, ParameterObject, WRAPPER};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlCommandType {
    Unknown,
    Insert,
    Update,
    Delete,
    Select,
    Flush,
}

impl fmt::Display for SqlCommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Select => write!(f, "SELECT"),
            Self::Flush => write!(f, "FLUSH"),
        }
    }
}

/// A mapper method ready to run. `id` is `<mapper type>.<method>`.
#[derive(Debug, Clone)]
pub struct MappedStatement {
    id: String,
    command: SqlCommandType,
}

impl MappedStatement {
    pub fn new(id: impl Into<String>, command: SqlCommandType) -> Self {
        Self {
            id: id.into(),
            command,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn command(&self) -> SqlCommandType {
        self.command
    }
}
