use super::output_namer::check_replacement;
use crate::engine::codec::{Codec, CodecRegistry};
use crate::engine::errors::CrushSpecError;
use crate::shared::config::CrushSpecConfig;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// One directory rule: which directories it applies to, how their crushed
/// file is named, and the codecs used to read sources and write the output.
#[derive(Clone)]
pub struct CrushSpec {
    pattern: String,
    regex: Regex,
    replacement: String,
    input_codec: Arc<dyn Codec>,
    output_codec: Arc<dyn Codec>,
}

impl CrushSpec {
    pub fn new(
        pattern: &str,
        replacement: &str,
        input_codec: Arc<dyn Codec>,
        output_codec: Arc<dyn Codec>,
    ) -> Result<Self, regex::Error> {
        // Matching is always against the whole directory path.
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            replacement: replacement.to_string(),
            input_codec,
            output_codec,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn input_codec(&self) -> &Arc<dyn Codec> {
        &self.input_codec
    }

    pub fn output_codec(&self) -> &Arc<dyn Codec> {
        &self.output_codec
    }

    pub fn matches(&self, dir: &str) -> bool {
        self.regex.is_match(dir)
    }

    pub(crate) fn captures<'d>(&self, dir: &'d str) -> Option<Captures<'d>> {
        self.regex.captures(dir)
    }

    /// Whether the pattern declares a capture group called `name`.
    pub(crate) fn has_group(&self, name: &str) -> bool {
        self.regex.capture_names().flatten().any(|n| n == name)
    }

    /// Capture groups in the pattern, not counting the whole match.
    pub(crate) fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

impl fmt::Debug for CrushSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrushSpec")
            .field("pattern", &self.pattern)
            .field("replacement", &self.replacement)
            .field("input_codec", &self.input_codec.id())
            .field("output_codec", &self.output_codec.id())
            .finish()
    }
}

/// Ordered spec list. The first spec whose pattern matches a directory wins.
#[derive(Debug, Clone)]
pub struct CrushSpecs {
    specs: Vec<CrushSpec>,
}

impl CrushSpecs {
    pub fn new(specs: Vec<CrushSpec>) -> Result<Self, CrushSpecError> {
        if specs.is_empty() {
            return Err(CrushSpecError::NoSpecs);
        }
        Ok(Self { specs })
    }

    /// Compiles every configured spec, resolves its codec ids and checks that its
    /// replacement only uses known placeholders and existing groups.
    pub fn from_config(
        configs: &[CrushSpecConfig],
        registry: &CodecRegistry,
    ) -> Result<Self, CrushSpecError> {
        let mut specs = Vec::with_capacity(configs.len());

        for (i, cfg) in configs.iter().enumerate() {
            let key = |field: &str| format!("specs[{}].{}", i, field);

            let pattern = non_empty(&cfg.regex)
                .ok_or_else(|| CrushSpecError::MissingRegex(key("regex")))?;
            let replacement = non_empty(&cfg.replacement)
                .ok_or_else(|| CrushSpecError::MissingReplacement(key("replacement")))?;

            let input_id = non_empty(&cfg.input_codec)
                .ok_or_else(|| CrushSpecError::MissingInputCodec(key("input_codec")))?;
            let input_codec =
                registry
                    .get(input_id)
                    .ok_or_else(|| CrushSpecError::UnknownInputCodec {
                        key: key("input_codec"),
                        value: input_id.to_string(),
                    })?;

            let output_id = non_empty(&cfg.output_codec)
                .ok_or_else(|| CrushSpecError::MissingOutputCodec(key("output_codec")))?;
            let output_codec =
                registry
                    .get(output_id)
                    .ok_or_else(|| CrushSpecError::UnknownOutputCodec {
                        key: key("output_codec"),
                        value: output_id.to_string(),
                    })?;

            let spec = CrushSpec::new(pattern, replacement, input_codec, output_codec).map_err(
                |source| CrushSpecError::InvalidRegex {
                    key: key("regex"),
                    source,
                },
            )?;
            check_replacement(&spec)?;

            debug!(target: "crush_spec::from_config", index = i, spec = ?spec, "Loaded crush spec");
            specs.push(spec);
        }

        let specs = Self::new(specs)?;
        info!(target: "crush_spec::from_config", count = specs.len(), "Crush specs ready");
        Ok(specs)
    }

    pub fn find(&self, dir: &str) -> Result<&CrushSpec, CrushSpecError> {
        self.specs
            .iter()
            .find(|spec| spec.matches(dir))
            .ok_or_else(|| CrushSpecError::NoMatchingSpec(dir.to_string()))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
