mod builder;
mod row;

pub use builder::FormBuilder;
pub use row::{ModelChoice, PlayerRow, RowState, CUSTOM_OPTION};
