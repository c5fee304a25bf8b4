pub mod batch_queue;
pub mod rate_limiter;

pub use batch_queue::{BatchQueue, QueuedBatch};
pub use rate_limiter::RateLimiter;
