pub mod proxy;
pub mod traits;

pub use proxy::{ProxyConsumer, ProxyConsumerSettings};
pub use traits::MessageSource;
