//! Value objects - immutable domain primitives

mod permissions;
mod snowflake;
mod tree_path;

pub use permissions::PermAction;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use tree_path::{TreePath, TreePathError};
