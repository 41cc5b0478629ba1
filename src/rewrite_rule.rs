use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single pattern-based rewrite step in the conversion pipeline
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub rule_id: String,
    pub description: String,
    pub action: RewriteAction,
    pub order: u32,
}

/// Kinds of text edits a rule can perform
#[derive(Debug, Clone)]
pub enum RewriteAction {
    /// Replace every match of the pattern with the replacement text
    Replace { pattern: Regex, replacement: String },
    /// Delete every line matching the pattern, including its trailing newline
    RemoveLine { pattern: Regex },
    /// Insert a block immediately after the first line containing the anchor
    /// text; skipped silently when the anchor is absent
    InsertAfterAnchor { anchor: String, block: String },
}

/// Record of a rewrite that changed the buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedRewrite {
    pub rule_id: String,
    pub description: String,
    pub occurrences: usize,
    pub removed_lines: Vec<String>,
}

impl RewriteRule {
    pub fn replace(
        rule_id: &str,
        order: u32,
        pattern: &str,
        replacement: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            rule_id: rule_id.to_string(),
            description: rule_id.to_string(),
            action: RewriteAction::Replace {
                pattern: Regex::new(pattern)?,
                replacement: replacement.to_string(),
            },
            order,
        })
    }

    pub fn remove_line(rule_id: &str, order: u32, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            rule_id: rule_id.to_string(),
            description: rule_id.to_string(),
            action: RewriteAction::RemoveLine {
                pattern: Regex::new(pattern)?,
            },
            order,
        })
    }

    pub fn insert_after_anchor(rule_id: &str, order: u32, anchor: &str, block: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            description: rule_id.to_string(),
            action: RewriteAction::InsertAfterAnchor {
                anchor: anchor.to_string(),
                block: block.to_string(),
            },
            order,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Apply the rule to the buffer, returning the new buffer and a record
    /// when the rule actually changed something.
    pub fn apply(&self, buffer: &str) -> (String, Option<AppliedRewrite>) {
        match &self.action {
            RewriteAction::Replace {
                pattern,
                replacement,
            } => {
                let occurrences = pattern.find_iter(buffer).count();
                if occurrences == 0 {
                    return (buffer.to_string(), None);
                }
                let rewritten = pattern.replace_all(buffer, replacement.as_str()).to_string();
                if rewritten == buffer {
                    // Inert rule (replacement reproduces the match), nothing to report
                    return (rewritten, None);
                }
                let record = AppliedRewrite {
                    rule_id: self.rule_id.clone(),
                    description: self.description.clone(),
                    occurrences,
                    removed_lines: Vec::new(),
                };
                (rewritten, Some(record))
            }
            RewriteAction::RemoveLine { pattern } => {
                let mut removed_lines = Vec::new();
                let mut kept = String::with_capacity(buffer.len());
                for line in buffer.split_inclusive('\n') {
                    if pattern.is_match(line.trim_end_matches(['\n', '\r'])) {
                        removed_lines.push(line.trim_end_matches(['\n', '\r']).to_string());
                    } else {
                        kept.push_str(line);
                    }
                }
                if removed_lines.is_empty() {
                    return (buffer.to_string(), None);
                }
                let record = AppliedRewrite {
                    rule_id: self.rule_id.clone(),
                    description: self.description.clone(),
                    occurrences: removed_lines.len(),
                    removed_lines,
                };
                (kept, Some(record))
            }
            RewriteAction::InsertAfterAnchor { anchor, block } => {
                let Some(anchor_start) = buffer.find(anchor.as_str()) else {
                    return (buffer.to_string(), None);
                };
                let insert_pos = match buffer[anchor_start..].find('\n') {
                    Some(offset) => anchor_start + offset + 1,
                    None => buffer.len(),
                };
                let mut rewritten = String::with_capacity(buffer.len() + block.len() + 1);
                rewritten.push_str(&buffer[..insert_pos]);
                if insert_pos == buffer.len() && !buffer.ends_with('\n') {
                    rewritten.push('\n');
                }
                rewritten.push_str(block);
                rewritten.push_str(&buffer[insert_pos..]);
                let record = AppliedRewrite {
                    rule_id: self.rule_id.clone(),
                    description: self.description.clone(),
                    occurrences: 1,
                    removed_lines: Vec::new(),
                };
                (rewritten, Some(record))
            }
        }
    }
}
