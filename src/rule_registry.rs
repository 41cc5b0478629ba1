use std::collections::HashMap;
use thiserror::Error;
use crate::{dialect::Dialect, rewrite_rule::RewriteRule};

/// Anchor line after which the enum documentation block is inserted
pub const ENUM_DOCS_ANCHOR: &str = "import { z } from \"zod\";";

/// Registry that manages the ordered rewrite rules for each dialect pair
pub struct RuleRegistry {
    rules: HashMap<(Dialect, Dialect), Vec<RewriteRule>>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No rewrite rules registered from {0} to {1}")]
    NoRewriteRules(Dialect, Dialect),

    #[error("Rule validation failed: {0}")]
    RuleValidationFailed(String),

    #[error("Invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Registry preloaded with the PostgreSQL → SQLite rule set.
    ///
    /// `enum_docs` is the documentation block describing the enum value sets
    /// that the conversion downgrades to text columns. It is caller-supplied
    /// so the library embeds no knowledge of any particular schema; pass
    /// `None` to skip the insertion entirely.
    pub fn builtin(enum_docs: Option<&str>) -> Result<Self, RegistryError> {
        let mut rules = vec![
            RewriteRule::replace(
                "import-module",
                10,
                r#"from "drizzle-orm/pg-core""#,
                r#"from "drizzle-orm/sqlite-core""#,
            )?
            .with_description("pg-core import -> sqlite-core"),
            RewriteRule::replace("table-builder", 20, r"\bpgTable\b", "sqliteTable")?
                .with_description("pgTable -> sqliteTable"),
            RewriteRule::remove_line(
                "strip-enum-declarations",
                30,
                r"export const \w+Enum = pgEnum\([^)]+\);?",
            )?
            .with_description("pgEnum declarations removed (no SQLite equivalent)"),
            RewriteRule::replace("varchar-to-text", 40, r"\bvarchar\(", "text(")?
                .with_description("varchar -> text"),
            RewriteRule::replace(
                "timestamp-to-integer",
                41,
                r#"timestamp\("([^"]+)"\)"#,
                r#"integer("${1}", { mode: 'timestamp' })"#,
            )?
            .with_description("timestamp -> integer with timestamp mode"),
            RewriteRule::replace("jsonb-to-text", 42, r"\bjsonb\(", "text(")?
                .with_description("jsonb -> text (JSON serialized as string)"),
            RewriteRule::replace("decimal-to-real", 43, r"\bdecimal\(", "real(")?
                .with_description("decimal -> real"),
            RewriteRule::replace("date-to-text", 44, r"\bdate\(", "text(")?
                .with_description("date -> text"),
            RewriteRule::replace(
                "enum-columns-to-text",
                50,
                r#"\w+Enum\("([^"]+)"\)"#,
                r#"text("${1}")"#,
            )?
            .with_description("enum columns -> text"),
            RewriteRule::replace(
                "random-uuid-default",
                60,
                r"\.default\(sql`gen_random_uuid\(\)`\)",
                ".default(sql`(lower(hex(randomblob(16))))`)",
            )?
            .with_description("gen_random_uuid() default -> hex(randomblob(16))"),
            RewriteRule::replace("strip-default-now", 70, r"\.defaultNow\(\)", "")?
                .with_description(".defaultNow() removed (no SQLite equivalent)"),
            // Guard against a second pass reshaping already-converted
            // timestamp defaults; the replacement reproduces the match.
            RewriteRule::replace(
                "timestamp-default-guard",
                80,
                r#"integer\("([^"]+)", \{ mode: 'timestamp' \}\)\.default"#,
                r#"integer("${1}", { mode: 'timestamp' }).default"#,
            )?
            .with_description("timestamp default guard (inert)"),
        ];

        if let Some(docs) = enum_docs {
            rules.push(
                RewriteRule::insert_after_anchor("enum-docs", 90, ENUM_DOCS_ANCHOR, docs)
                    .with_description("enum value documentation inserted after zod import"),
            );
        }

        let mut registry = Self::new();
        registry.add_rules(Dialect::Postgres, Dialect::Sqlite, rules)?;
        Ok(registry)
    }

    /// Add rewrite rules for a dialect pair
    pub fn add_rules(
        &mut self,
        source: Dialect,
        target: Dialect,
        rules: Vec<RewriteRule>,
    ) -> Result<(), RegistryError> {
        self.validate_rules(&rules)?;
        self.rules.insert((source, target), rules);
        Ok(())
    }

    /// Get the rewrite rules for a dialect pair, in application order
    pub fn get_rules(
        &self,
        source: Dialect,
        target: Dialect,
    ) -> Result<Vec<RewriteRule>, RegistryError> {
        let mut rules = self
            .rules
            .get(&(source, target))
            .cloned()
            .ok_or(RegistryError::NoRewriteRules(source, target))?;
        rules.sort_by_key(|rule| rule.order);
        Ok(rules)
    }

    /// Dialect pairs this registry can convert between
    pub fn supported_pairs(&self) -> Vec<(Dialect, Dialect)> {
        let mut pairs: Vec<_> = self.rules.keys().copied().collect();
        pairs.sort_by_key(|(s, t)| (s.to_string(), t.to_string()));
        pairs
    }

    fn validate_rules(&self, rules: &[RewriteRule]) -> Result<(), RegistryError> {
        for rule in rules {
            if rule.rule_id.is_empty() {
                return Err(RegistryError::RuleValidationFailed(
                    "Rule ID cannot be empty".to_string(),
                ));
            }
        }
        let mut ids: Vec<_> = rules.iter().map(|r| r.rule_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != rules.len() {
            return Err(RegistryError::RuleValidationFailed(
                "Rule IDs must be unique within a dialect pair".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
