pub mod file;
pub mod id;
pub mod logging;
pub mod path;
pub mod toml;
