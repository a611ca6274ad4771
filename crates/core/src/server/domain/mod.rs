pub mod dispatch_error;
pub mod server_config;
