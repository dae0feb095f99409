//! Concrete model providers and the registry that dispatches to them.

pub mod gateway;
pub mod openai;
pub mod registry;

pub use gateway::GatewayProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
