pub mod gateway;
pub mod http_client;
pub mod sinks;
pub mod source;
