//! Application-level helpers: input normalization and run reporting.

mod logging;
mod statistics;
mod url;

pub use logging::log_progress;
pub use statistics::print_drop_statistics;
pub use url::extract_hostname;
