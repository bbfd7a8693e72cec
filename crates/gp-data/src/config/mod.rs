//! Loader settings: which file, which columns, which types and which cell
//! texts count as missing

pub mod file_config;
pub mod null_handling;

pub use file_config::{FileConfig, SerializableDataType};
pub use null_handling::NullConfig;
