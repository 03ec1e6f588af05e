use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the bridge.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the binary and the daemon wiring use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum BridgeError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Source queue ────────────────────────────────────────────────────
    #[error("consumer: {0}")]
    Consumer(#[from] ConsumerError),

    // ── Sink ────────────────────────────────────────────────────────────
    #[error("sink: {0}")]
    Sink(#[from] SinkError),

    // ── Connectivity probes ─────────────────────────────────────────────
    #[error("probe: {0}")]
    Probe(#[from] ProbeError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown sink kind {0:?} (expected \"proxy\" or \"plainHTTP\")")]
    UnknownSinkKind(String),

    #[error("unknown region {0:?} (expected \"eu\" or \"us\")")]
    UnknownRegion(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Source queue errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("request to {target} failed: {message}")]
    Transport { target: String, message: String },

    #[error("{target} responded with status {status}: {body}")]
    Status {
        target: String,
        status: u16,
        body: String,
    },

    #[error("could not decode proxy response: {0}")]
    Decode(String),

    #[error("consumer instance: {0}")]
    Instance(String),
}

// ─── Sink errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not build request for tid {transaction_id}: {message}")]
    Request {
        transaction_id: String,
        message: String,
    },

    #[error("error executing request for tid {transaction_id}: {message}")]
    Transport {
        transaction_id: String,
        message: String,
    },

    #[error("forwarding message with tid {transaction_id} was not successful, status: {status}")]
    Status { transaction_id: String, status: u16 },

    #[error("could not encode message: {0}")]
    Encode(String),
}

// ─── Connectivity probe errors ──────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("error executing GET request to {target}: {message}")]
    Transport { target: String, message: String },

    #[error("request to {target} was not successful, status: {status}")]
    Status { target: String, status: u16 },

    #[error("connection could be established to {target}, but the response could not be parsed: {message}")]
    Parse { target: String, message: String },

    #[error("connection could be established to {target}, but topic {topic} was not found")]
    TopicMissing { target: String, topic: String },

    #[error("no healthy address: {0}")]
    AllFailed(String),

    #[error("{check} did not answer within {secs}s")]
    TimedOut { check: String, secs: u64 },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;
