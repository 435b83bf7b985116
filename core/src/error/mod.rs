pub mod dispatch;
#[allow(clippy::module_inception)]
pub mod error;

pub use dispatch::{CatalogUnavailable, DispatchError, TransportError, ValidationError};
pub use error::CliError;
