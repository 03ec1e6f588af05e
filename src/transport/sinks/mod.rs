pub mod factory;
pub mod plain_http;
pub mod proxy;
pub mod traits;

pub use factory::create_sink;
pub use plain_http::PlainHttpSink;
pub use proxy::ProxySink;
pub use traits::{Sink, SinkConfig, SinkKind};
