//! Provider registry - model-name dispatch with a guaranteed default.
//!
//! Built once at process start and passed into the pipeline; providers are
//! shared `Arc`s, so one long-lived HTTP client serves all requests for a
//! given backend.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::providers::{GatewayProvider, OpenAiProvider};
use crate::traits::provider::ChatModel;

/// Registry mapping model names to provider instances.
///
/// Resolution of an unknown name falls back to the designated default
/// rather than failing the request.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ChatModel>>,
    default_name: String,
}

impl ProviderRegistry {
    /// Create a registry whose default is the given provider.
    pub fn new(default_provider: Arc<dyn ChatModel>) -> Self {
        let default_name = default_provider.model_name().to_string();
        let mut providers = HashMap::new();
        providers.insert(default_name.clone(), default_provider);
        Self {
            providers,
            default_name,
        }
    }

    /// Register a provider under its model name.
    pub fn register(mut self, provider: Arc<dyn ChatModel>) -> Self {
        self.providers
            .insert(provider.model_name().to_string(), provider);
        self
    }

    /// Name of the fallback model.
    pub fn default_model(&self) -> &str {
        &self.default_name
    }

    /// Registered model names, unordered.
    pub fn model_names(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve a model name to a provider.
    ///
    /// Unknown or absent names resolve to the default provider.
    pub fn resolve(&self, model: Option<&str>) -> Arc<dyn ChatModel> {
        let name = model.unwrap_or(&self.default_name);
        match self.providers.get(name) {
            Some(provider) => Arc::clone(provider),
            None => {
                debug!(requested = name, default = %self.default_name, "unknown model, using default");
                Arc::clone(
                    self.providers
                        .get(&self.default_name)
                        .expect("default provider is always registered"),
                )
            }
        }
    }

    /// Build the standard registry: nano/mini on the direct backend,
    /// deployed models behind the gateway, defaulting to `gpt-4.1-nano`.
    pub fn standard(
        openai_key: impl Into<String>,
        gateway_endpoint: impl Into<String>,
        gateway_key: impl Into<String>,
    ) -> Self {
        let openai_key = openai_key.into();
        let endpoint = gateway_endpoint.into();
        let gateway_key = gateway_key.into();

        let gateway = |model: &str, deployment: &str| -> Arc<dyn ChatModel> {
            Arc::new(GatewayProvider::new(
                endpoint.clone(),
                gateway_key.clone(),
                model,
                deployment,
            ))
        };

        Self::new(Arc::new(OpenAiProvider::new(
            openai_key.clone(),
            "gpt-4.1-nano",
        )))
        .register(Arc::new(OpenAiProvider::new(openai_key, "gpt-4.1-mini")))
        .register(gateway("mistral-small", "mistral-small"))
        .register(gateway("mistral-nemo", "Mistral-Nemo"))
        .register(gateway("llama-3-8b-instruct", "Meta-Llama-3.1-8B-Instruct"))
        .register(gateway("gpt-4.1", "gpt-4.1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[test]
    fn test_resolve_known_name() {
        let registry = ProviderRegistry::new(Arc::new(MockModel::named("default-model")))
            .register(Arc::new(MockModel::named("other-model")));

        assert_eq!(
            registry.resolve(Some("other-model")).model_name(),
            "other-model"
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        let registry = ProviderRegistry::new(Arc::new(MockModel::named("default-model")));
        assert_eq!(
            registry.resolve(Some("no-such-model")).model_name(),
            "default-model"
        );
    }

    #[test]
    fn test_absent_name_resolves_default() {
        let registry = ProviderRegistry::new(Arc::new(MockModel::named("default-model")));
        assert_eq!(registry.resolve(None).model_name(), "default-model");
        assert_eq!(registry.default_model(), "default-model");
    }

    #[test]
    fn test_standard_registry_contents() {
        let registry = ProviderRegistry::standard("sk-test", "https://gw.example.com", "key");
        assert_eq!(registry.default_model(), "gpt-4.1-nano");
        let mut names = registry.model_names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "gpt-4.1",
                "gpt-4.1-mini",
                "gpt-4.1-nano",
                "llama-3-8b-instruct",
                "mistral-nemo",
                "mistral-small",
            ]
        );
    }
}
