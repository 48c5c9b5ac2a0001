use super::crush_spec::CrushSpec;
use crate::engine::errors::CrushSpecError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::iter::Peekable;
use std::str::Chars;
use tracing::debug;

pub const TASK_NUM: &str = "crush.task.num";
pub const TIMESTAMP: &str = "crush.timestamp";
pub const FILE_NUM: &str = "crush.file.num";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([a-zA-Z][a-zA-Z.]*)\}").unwrap());

/// Turns a directory into the path of its crushed file.
///
/// Owned by a single worker: `crush.file.num` counts the outputs this worker
/// has named so far, starting at 0.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    task_num: u32,
    timestamp: u64,
    file_num: u64,
}

impl OutputNamer {
    pub fn new(task_num: u32, timestamp: u64) -> Self {
        Self {
            task_num,
            timestamp,
            file_num: 0,
        }
    }

    /// Computes `<dir>/<name>` where `name` is the crush spec replacement with its
    /// placeholders filled in and its group references resolved against `dir`.
    ///
    /// The file number is consumed even when naming fails.
    pub fn calculate_output_file(
        &mut self,
        spec: &CrushSpec,
        dir: &str,
    ) -> Result<String, CrushSpecError> {
        let file_num = self.file_num;
        self.file_num += 1;

        let template = self.substitute_placeholders(spec.replacement(), file_num)?;

        let caps = spec
            .captures(dir)
            .ok_or_else(|| CrushSpecError::NoMatchingSpec(dir.to_string()))?;
        let name = expand_group_references(&template, Some(&caps), spec)?;

        let output = format!("{}/{}", dir, name);
        debug!(
            target: "output_namer::calculate_output_file",
            dir,
            file_num,
            output = %output,
            "Named crush output"
        );
        Ok(output)
    }

    fn substitute_placeholders(
        &self,
        template: &str,
        file_num: u64,
    ) -> Result<String, CrushSpecError> {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = match key.as_str() {
                TASK_NUM => self.task_num.to_string(),
                TIMESTAMP => self.timestamp.to_string(),
                FILE_NUM => file_num.to_string(),
                other => return Err(CrushSpecError::UnknownPlaceholder(other.to_string())),
            };
            out.push_str(&template[last..whole.start()]);
            out.push_str(&value);
            last = whole.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }
}

/// Rejects a replacement that could never name an output: unknown placeholders,
/// malformed group syntax, or references to groups the pattern does not declare.
pub(crate) fn check_replacement(spec: &CrushSpec) -> Result<(), CrushSpecError> {
    let template = OutputNamer::new(0, 0).substitute_placeholders(spec.replacement(), 0)?;
    expand_group_references(&template, None, spec).map(|_| ())
}

/// Resolves `$n`, `${name}` and `\x` in `template`.
///
/// `$` takes the first digit unconditionally and keeps taking digits while the
/// number still names an existing group. Groups that did not participate in the
/// match expand to nothing. Without `caps` only the syntax and group names are
/// checked.
fn expand_group_references(
    template: &str,
    caps: Option<&Captures<'_>>,
    spec: &CrushSpec,
) -> Result<String, CrushSpecError> {
    let invalid = |reason: &str| CrushSpecError::InvalidReplacement {
        template: template.to_string(),
        reason: reason.to_string(),
    };
    let no_group = |group: String| CrushSpecError::InvalidGroupReference {
        group,
        pattern: spec.pattern().to_string(),
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| invalid("character to be escaped is missing"))?;
                out.push(escaped);
            }
            '$' => match chars.peek().copied() {
                None => return Err(invalid("group index is missing")),
                Some('{') => {
                    chars.next();
                    let name = read_group_name(&mut chars).ok_or_else(|| {
                        invalid("named group reference is malformed")
                    })?;
                    if !spec.has_group(&name) {
                        return Err(no_group(name));
                    }
                    if let Some(m) = caps.and_then(|c| c.name(&name)) {
                        out.push_str(m.as_str());
                    }
                }
                Some(d) if d.is_ascii_digit() => {
                    let group = read_group_number(&mut chars, spec.group_count());
                    if group > spec.group_count() {
                        return Err(no_group(group.to_string()));
                    }
                    if let Some(m) = caps.and_then(|c| c.get(group)) {
                        out.push_str(m.as_str());
                    }
                }
                Some(_) => return Err(invalid("illegal group reference")),
            },
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Reads `name}`. Names start with an ASCII letter followed by letters or digits.
fn read_group_name(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut name = String::new();
    loop {
        match chars.next()? {
            '}' => break,
            c if c.is_ascii_alphabetic() => name.push(c),
            c if c.is_ascii_digit() && !name.is_empty() => name.push(c),
            _ => return None,
        }
    }
    if name.is_empty() { None } else { Some(name) }
}

fn read_group_number(chars: &mut Peekable<Chars<'_>>, group_count: usize) -> usize {
    let mut group = match chars.next().and_then(|c| c.to_digit(10)) {
        Some(d) => d as usize,
        None => return 0,
    };
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        let candidate = group * 10 + d as usize;
        if candidate > group_count {
            break;
        }
        group = candidate;
        chars.next();
    }
    group
}
