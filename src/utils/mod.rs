pub mod file;
pub mod paths;
pub mod unicode;
