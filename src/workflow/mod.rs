pub mod batch_ctx;
pub mod batch_flow;
pub mod retry;

pub use batch_ctx::BatchCtx;
pub use batch_flow::{BatchFlow, BatchOutcome};
pub use retry::{retry_or_fallback, RetryOutcome, RetryPolicy};
