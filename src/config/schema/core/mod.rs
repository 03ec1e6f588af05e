mod env_overrides;
mod loader;
mod resolve;
mod types;
mod validate;


pub use types::Config;
