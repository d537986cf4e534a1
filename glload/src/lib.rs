pub mod config;
pub mod error;
pub mod framework;
pub mod prelude;
pub mod render;
pub mod runtime;

pub use error::{GlloadError, Result};
pub use runtime::app::{run, run_with_channels};
