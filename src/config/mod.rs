pub mod schema;

pub use schema::{
    Config, ConsumerConfig, DestinationConfig, HealthConfig, HttpConfig, ServerConfig,
};
