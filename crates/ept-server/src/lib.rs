// Library root: re-exports all modules so integration tests and the binary
// can reach the crate's public API.

pub mod config;
pub mod http_server;
pub mod static_files;
pub mod upstream;
