mod consumer;
mod core;
mod destination;
mod health;
mod http;
mod server;

pub use consumer::ConsumerConfig;
pub use core::Config;
pub use destination::DestinationConfig;
pub use health::HealthConfig;
pub use http::HttpConfig;
pub use server::ServerConfig;
