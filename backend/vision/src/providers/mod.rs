pub mod mock;
pub mod openai_compat;

use std::sync::Arc;

use anyhow::Result;
use horadric_config::VisionConfig;
use horadric_core::VisionProvider;
use tracing::info;

/// Build the provider for a run from configuration.
pub fn provider_from_config(config: &VisionConfig) -> Result<Arc<dyn VisionProvider>> {
    let provider = openai_compat::OpenAiCompatProvider::from_config(config)?;
    info!(
        provider = provider.name(),
        endpoint = %config.endpoint,
        model = %config.model,
        "Configured vision provider"
    );
    Ok(Arc::new(provider))
}
