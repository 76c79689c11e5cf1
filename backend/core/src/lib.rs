pub mod error;
pub mod event;
pub mod fs;
pub mod traits;
pub mod types;

pub use error::{BatchError, FailureKind, ImageFailure, RequestError, UnknownCategory};
pub use fs::write_atomic;
pub use event::{ProgressEvent, ProgressStatus};
pub use traits::{RequestTemplate, VisionProvider, VisionRequest, VisionResponse};
pub use types::{
    Category, CleanedItem, ImageTask, RequestOutcome, TokenUsage, BLOCK_DELIMITER,
};
