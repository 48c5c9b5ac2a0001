use crate::engine::codec::CodecRegistry;
use crate::engine::crush::CrushSpecs;
use crate::shared::config::CrushSpecConfig;

pub struct CrushSpecFactory {
    config: CrushSpecConfig,
}

impl CrushSpecFactory {
    pub fn new() -> Self {
        Self {
            config: CrushSpecConfig::new(".+", "crushed_file-${crush.file.num}", "text", "text"),
        }
    }

    /// Overrides one field: `regex`, `replacement`, `input_codec` or `output_codec`.
    /// An empty value clears the field.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        let value = (!value.is_empty()).then(|| value.to_string());
        match key {
            "regex" => self.config.regex = value,
            "replacement" => self.config.replacement = value,
            "input_codec" => self.config.input_codec = value,
            "output_codec" => self.config.output_codec = value,
            other => panic!("unknown crush spec field: {}", other),
        }
        self
    }

    pub fn create(self) -> CrushSpecConfig {
        self.config
    }

    /// Compiles `configs` against the default codec registry.
    pub fn compile(configs: &[CrushSpecConfig]) -> CrushSpecs {
        CrushSpecs::from_config(configs, &CodecRegistry::with_defaults()).unwrap()
    }
}
