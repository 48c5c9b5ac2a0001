use super::{Codec, SequenceCodec, TextCodec};
use std::collections::HashMap;
use std::sync::Arc;

/// Codec identifiers usable in crush specs.
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn Codec>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `text`, `sequence`, `sequence-lz4` and `sequence-zstd`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextCodec));
        registry.register(Arc::new(SequenceCodec::plain()));
        registry.register(Arc::new(SequenceCodec::lz4()));
        registry.register(Arc::new(SequenceCodec::zstd()));
        registry
    }

    /// Registers `codec` under its own id, replacing any previous entry.
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        self.codecs.insert(codec.id().to_string(), codec);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Codec>> {
        self.codecs.get(id).cloned()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
