pub mod encode;
pub mod prompt;
pub mod providers;

pub use encode::{detect_mime_type, encode_data_uri, encode_image_file};
pub use prompt::{request_template, SYSTEM_PROMPT, USER_PROMPT};
pub use providers::mock::MockVisionProvider;
pub use providers::openai_compat::OpenAiCompatProvider;
pub use providers::provider_from_config;
