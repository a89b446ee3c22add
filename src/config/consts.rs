/// Default time an agent may take to handle a request portion (seconds)
pub const DEFAULT_AGENT_TIMEOUT_SECONDS: u64 = 10;
/// Default number of values kept per InfoItem by the in-memory store
pub const DEFAULT_HISTORY_LENGTH: usize = 50;
/// Default capacity of the request loop mailbox
pub const DEFAULT_REQUEST_BUFFER: usize = 64;
