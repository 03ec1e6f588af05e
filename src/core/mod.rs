pub mod consumer_loop;
pub mod enrich;
pub mod forwarder;
pub mod message;

pub use consumer_loop::{ConsumerLoop, ConsumerState, DispatchCounts, DispatchMode};
pub use forwarder::{ForwardOutcome, Forwarder};
pub use message::Message;
