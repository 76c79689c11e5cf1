//! Batch scheduling for tooltip screenshots: a shared rate limiter, a
//! retrying requester and the worker-pool dispatcher that ties them together.

pub mod dispatcher;
pub mod output;
pub mod rate_limiter;
pub mod requester;
pub mod retry;
pub mod scan;

pub use dispatcher::{BatchOutput, BatchSummary, DispatchOptions, Dispatcher};
pub use output::{ensure_txt_path, write_atomic, AggregateDocument, DEFAULT_OUTPUT_NAME};
pub use rate_limiter::{RateLimitPolicy, RateLimiter};
pub use requester::RetryingRequester;
pub use retry::{RetryPolicy, RetryState};
pub use scan::scan_folder;
