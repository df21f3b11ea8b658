pub mod config;
pub mod error;
pub mod format;

pub use error::{TextpartError, TextpartResult};
pub use format::PartFormat;
