pub mod error;
pub mod types;
pub mod value;

pub use error::{FillError, Result};
pub use types::{DataType, is_valid_identifier};
pub use value::Value;
