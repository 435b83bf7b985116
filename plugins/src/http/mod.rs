mod client;
mod error;

pub use client::HttpBackend;
pub use error::{HttpError, HttpErrorKind};
