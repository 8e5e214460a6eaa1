// Registry and factory for model-specific splitter configurations.
// Splitters are handed out fresh per request; only configs are shared.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::{debug, warn};

use crate::{config::SplitterConfig, splitter::TagSplitter};

/// Registry of named splitter configurations with model pattern mappings.
#[derive(Clone)]
pub struct SplitterRegistry {
    /// Named configurations.
    configs: Arc<RwLock<HashMap<String, SplitterConfig>>>,
    /// Model pattern to config name mappings (pattern, config_name).
    patterns: Arc<RwLock<Vec<(String, String)>>>,
}

impl SplitterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            configs: Arc::new(RwLock::new(HashMap::new())),
            patterns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a configuration under a name.
    pub fn register_config(&self, name: &str, config: SplitterConfig) {
        let mut configs = self.configs.write().unwrap();
        configs.insert(name.to_string(), config);
    }

    /// Register a model pattern to config mapping.
    /// Patterns are checked in order, first match wins.
    pub fn register_pattern(&self, pattern: &str, config_name: &str) {
        let mut patterns = self.patterns.write().unwrap();
        patterns.push((pattern.to_string(), config_name.to_string()));
    }

    /// Check if a configuration with the given name is registered.
    pub fn has_config(&self, name: &str) -> bool {
        let configs = self.configs.read().unwrap();
        configs.contains_key(name)
    }

    /// Look up a configuration by exact name.
    pub fn config(&self, name: &str) -> Option<SplitterConfig> {
        let configs = self.configs.read().unwrap();
        configs.get(name).cloned()
    }

    /// Find the configuration for a model id by pattern matching.
    /// Matching is case-insensitive on the model id.
    pub fn config_for_model(&self, model_id: &str) -> Option<SplitterConfig> {
        let patterns = self.patterns.read().unwrap();
        let model_lower = model_id.to_lowercase();

        for (pattern, config_name) in patterns.iter() {
            if model_lower.contains(&pattern.to_lowercase()) {
                return self.config(config_name);
            }
        }
        None
    }

    /// Create a fresh splitter by exact config name.
    pub fn create(&self, name: &str) -> Option<TagSplitter> {
        self.config(name).map(TagSplitter::new)
    }

    /// Create a fresh splitter for a model id by pattern matching.
    pub fn create_for_model(&self, model_id: &str) -> Option<TagSplitter> {
        self.config_for_model(model_id).map(TagSplitter::new)
    }
}

impl Default for SplitterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory for creating splitters based on model id.
#[derive(Clone)]
pub struct SplitterFactory {
    registry: SplitterRegistry,
}

impl SplitterFactory {
    /// Create a new factory with the stock configurations registered.
    pub fn new() -> Self {
        let registry = SplitterRegistry::new();

        // XML think tags, the common case (Qwen3, GLM, R1 distills).
        registry.register_config("think", SplitterConfig::for_tag("think"));

        // Models that open a completion already inside reasoning, with no
        // opening marker.
        registry.register_config(
            "think_resumed",
            SplitterConfig::for_tag("think").with_start_in_reasoning(true),
        );

        // Kimi uses Unicode markers instead of XML tags.
        registry.register_config("kimi", SplitterConfig::new("◁think▷", "◁/think▷"));

        registry.register_config("passthrough", SplitterConfig::passthrough());

        registry.register_pattern("deepseek-r1", "think_resumed");
        registry.register_pattern("qwen3-thinking", "think_resumed");
        registry.register_pattern("qwen-thinking", "think_resumed");
        registry.register_pattern("qwen3", "think");
        registry.register_pattern("qwen", "think");
        registry.register_pattern("glm", "think");
        registry.register_pattern("kimi", "kimi");
        registry.register_pattern("step3", "think_resumed");

        Self { registry }
    }

    /// Create a fresh splitter for the given model id.
    /// Unrecognized models fall back to a passthrough splitter.
    pub fn create(&self, model_id: &str) -> TagSplitter {
        if let Some(splitter) = self.registry.create_for_model(model_id) {
            return splitter;
        }
        debug!(
            "No splitter configuration matched model '{}', using passthrough",
            model_id
        );
        TagSplitter::new(SplitterConfig::passthrough())
    }

    /// Resolve a splitter from an explicitly configured name, falling back
    /// to model detection when the name is unknown.
    pub fn select(&self, configured: Option<&str>, model_id: &str) -> TagSplitter {
        if let Some(name) = configured {
            if let Some(splitter) = self.registry.create(name) {
                return splitter;
            }
            warn!(
                "Configured splitter '{}' not found, falling back to model-based selection",
                name
            );
        }
        self.create(model_id)
    }

    /// Get the internal registry for custom registration.
    pub fn registry(&self) -> &SplitterRegistry {
        &self.registry
    }
}

impl Default for SplitterFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_detects_deepseek_r1() {
        let factory = SplitterFactory::new();
        let splitter = factory.create("deepseek-r1-distill-qwen-7b");
        assert!(splitter.config().start_in_reasoning);
        assert_eq!(splitter.config().open_marker, "<think>");
    }

    #[test]
    fn test_factory_detects_qwen3() {
        let factory = SplitterFactory::new();
        let splitter = factory.create("qwen3-7b");
        assert!(!splitter.config().start_in_reasoning);
        assert_eq!(splitter.config().open_marker, "<think>");
    }

    #[test]
    fn test_factory_detects_kimi() {
        let factory = SplitterFactory::new();
        let splitter = factory.create("kimi-chat");
        assert_eq!(splitter.config().open_marker, "◁think▷");
        assert_eq!(splitter.config().close_marker, "◁/think▷");
    }

    #[test]
    fn test_factory_fallback_to_passthrough() {
        let factory = SplitterFactory::new();
        let splitter = factory.create("unknown-model");
        assert!(splitter.config().is_passthrough());
    }

    #[test]
    fn test_pattern_matching_is_case_insensitive() {
        let factory = SplitterFactory::new();
        assert!(factory.create("DeepSeek-R1").config().start_in_reasoning);
        assert!(!factory.create("QWEN3").config().is_passthrough());
    }

    #[test]
    fn test_pattern_order_prefers_specific_families() {
        // "qwen3-thinking" must match before the broader "qwen3"/"qwen".
        let factory = SplitterFactory::new();
        assert!(factory.create("qwen3-thinking-32b").config().start_in_reasoning);
        assert!(!factory.create("qwen3-32b").config().start_in_reasoning);
    }

    #[test]
    fn test_select_prefers_configured_name() {
        let factory = SplitterFactory::new();
        let splitter = factory.select(Some("kimi"), "qwen3-7b");
        assert_eq!(splitter.config().open_marker, "◁think▷");
    }

    #[test]
    fn test_select_falls_back_on_unknown_name() {
        let factory = SplitterFactory::new();
        let splitter = factory.select(Some("nonexistent"), "qwen3-7b");
        assert_eq!(splitter.config().open_marker, "<think>");
    }

    #[test]
    fn test_custom_registration() {
        let factory = SplitterFactory::new();
        assert!(!factory.registry().has_config("reason"));

        factory
            .registry()
            .register_config("reason", SplitterConfig::for_tag("reason"));
        factory.registry().register_pattern("my-model", "reason");

        assert!(factory.registry().has_config("reason"));
        let splitter = factory.create("my-model-v2");
        assert_eq!(splitter.config().open_marker, "<reason>");
    }

    #[test]
    fn test_fresh_instance_per_create() {
        let factory = SplitterFactory::new();
        let mut first = factory.create("qwen3");
        first.feed("<think>held");
        assert!(first.is_in_reasoning());

        // A second splitter for the same model starts clean.
        let second = factory.create("qwen3");
        assert!(!second.is_in_reasoning());
    }
}
