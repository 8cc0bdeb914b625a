pub mod api;
pub mod config;
pub mod documents;
pub mod library;
pub mod logging;
pub mod traits;
pub mod util;

mod status;
pub use status::Status;

mod tracing;
pub use crate::tracing::Tracing;
