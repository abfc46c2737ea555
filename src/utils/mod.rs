pub mod paths;
pub mod platform;
pub mod process;
pub mod sanitize;
