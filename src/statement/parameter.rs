use crate::core::Value;
use crate::metadata::EntityObject;
use crate::wrapper::{ChainUpdateWrapper, QueryWrapper, UpdateWrapper, WrapperParam};
use std::collections::HashMap;

/// Key of an explicit entity in a parameter map
pub const ENTITY: &str = "et";
/// Key of a condition builder in a parameter map
pub const WRAPPER: &str = "ew";

#[derive(Debug)]
pub enum ParamValue {
    Null,
    Value(Value),
    Entity(EntityObject),
    Wrapper(WrapperParam),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Value(Value::Null))
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<EntityObject> for ParamValue {
    fn from(entity: EntityObject) -> Self {
        Self::Entity(entity)
    }
}

impl From<WrapperParam> for ParamValue {
    fn from(wrapper: WrapperParam) -> Self {
        Self::Wrapper(wrapper)
    }
}

impl From<UpdateWrapper> for ParamValue {
    fn from(wrapper: UpdateWrapper) -> Self {
        Self::Wrapper(wrapper.into())
    }
}

impl From<QueryWrapper> for ParamValue {
    fn from(wrapper: QueryWrapper) -> Self {
        Self::Wrapper(wrapper.into())
    }
}

impl From<ChainUpdateWrapper> for ParamValue {
    fn from(wrapper: ChainUpdateWrapper) -> Self {
        Self::Wrapper(wrapper.into())
    }
}

/// Named parameters of one statement execution
#[derive(Debug, Default)]
pub struct ParamMap {
    params: HashMap<String, ParamValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ParamValue> {
        self.params.get_mut(key)
    }

    /// Present and not NULL
    pub fn contains_non_null(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn wrapper(&self) -> Option<&WrapperParam> {
        match self.get(WRAPPER) {
            Some(ParamValue::Wrapper(wrapper)) => Some(wrapper),
            _ => None,
        }
    }

    pub fn wrapper_mut(&mut self) -> Option<&mut WrapperParam> {
        match self.get_mut(WRAPPER) {
            Some(ParamValue::Wrapper(wrapper)) => Some(wrapper),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Parameter object handed to a statement: a named map or a single value
#[derive(Debug)]
pub enum ParameterObject {
    Map(ParamMap),
    Single(ParamValue),
}

impl ParameterObject {
    pub fn as_map(&self) -> Option<&ParamMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Single(_) => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ParamMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Single(_) => None,
        }
    }
}

impl From<ParamMap> for ParameterObject {
    fn from(map: ParamMap) -> Self {
        Self::Map(map)
    }
}
