pub mod error;
pub mod logger;
pub mod url_clean;
