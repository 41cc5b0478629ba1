use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::{
    dialect::Dialect,
    rewrite_rule::{AppliedRewrite, RewriteAction},
    rule_registry::{RegistryError, RuleRegistry},
};

/// Engine that applies a registry's ordered rewrite rules to a schema buffer
pub struct SchemaRewriteEngine {
    registry: RuleRegistry,
}

/// Result of a rewrite pass
#[derive(Debug, Clone)]
pub struct RewriteResult {
    pub output: String,
    pub applied: Vec<AppliedRewrite>,
    pub warnings: Vec<RewriteWarning>,
    pub source_dialect: Option<Dialect>,
    pub target_dialect: Dialect,
}

/// Warning generated while rewriting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteWarning {
    pub message: String,
    pub rule_id: Option<String>,
    pub warning_type: RewriteWarningType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RewriteWarningType {
    /// A construct was stripped with no target-dialect equivalent
    ManualFollowUp,
    /// An insertion anchor was not found, the block was not inserted
    AnchorMissing,
    /// The input already looks like the target dialect
    AlreadyTargetDialect,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Rewrite registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl SchemaRewriteEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// Apply the `from` → `to` rule set over the source buffer.
    ///
    /// Dialect detection on the input is advisory and only feeds the result;
    /// every rule runs regardless, which keeps a second pass over converted
    /// output safe (each pattern simply no longer matches).
    pub fn rewrite(
        &self,
        source: &str,
        from: Dialect,
        to: Dialect,
    ) -> Result<RewriteResult, RewriteError> {
        let rules = self.registry.get_rules(from, to)?;
        let source_dialect = Dialect::detect(source);

        let mut warnings = Vec::new();
        if source_dialect == Some(to) {
            warnings.push(RewriteWarning {
                message: format!("Input already appears to be {to} dialect"),
                rule_id: None,
                warning_type: RewriteWarningType::AlreadyTargetDialect,
            });
        }

        let mut buffer = source.to_string();
        let mut applied = Vec::new();

        for rule in &rules {
            let (next, record) = rule.apply(&buffer);
            match record {
                Some(record) => {
                    let strips_construct = matches!(
                        &rule.action,
                        RewriteAction::Replace { replacement, .. } if replacement.is_empty()
                    );
                    if strips_construct {
                        warnings.push(RewriteWarning {
                            message: format!(
                                "{} occurrence(s) stripped by rule '{}'; no {} equivalent, follow up manually",
                                record.occurrences, rule.rule_id, to
                            ),
                            rule_id: Some(rule.rule_id.clone()),
                            warning_type: RewriteWarningType::ManualFollowUp,
                        });
                    }
                    applied.push(record);
                }
                None => {
                    if let RewriteAction::InsertAfterAnchor { anchor, .. } = &rule.action {
                        warnings.push(RewriteWarning {
                            message: format!(
                                "Anchor line `{}` not found; block from rule '{}' not inserted",
                                anchor, rule.rule_id
                            ),
                            rule_id: Some(rule.rule_id.clone()),
                            warning_type: RewriteWarningType::AnchorMissing,
                        });
                    }
                }
            }
            buffer = next;
        }

        Ok(RewriteResult {
            output: buffer,
            applied,
            warnings,
            source_dialect,
            target_dialect: to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_engine(enum_docs: Option<&str>) -> SchemaRewriteEngine {
        SchemaRewriteEngine::new(RuleRegistry::builtin(enum_docs).unwrap())
    }

    fn convert(source: &str) -> RewriteResult {
        postgres_engine(None)
            .rewrite(source, Dialect::Postgres, Dialect::Sqlite)
            .unwrap()
    }

    const SAMPLE_SCHEMA: &str = "\
import { pgTable, varchar, timestamp, pgEnum } from \"drizzle-orm/pg-core\";
export const statusEnum = pgEnum('status', ['online','offline']);
export const users = pgTable(\"users\", { id: varchar(\"id\"), created: timestamp(\"created_at\"), status: statusEnum(\"status\") });
";

    #[test]
    fn test_end_to_end_sample_schema() {
        let result = convert(SAMPLE_SCHEMA);
        let out = &result.output;

        assert!(out.contains("from \"drizzle-orm/sqlite-core\""));
        assert!(!out.contains("statusEnum = pgEnum"));
        assert!(out.contains("sqliteTable(\"users\""));
        assert!(out.contains("text(\"id\")"));
        assert!(out.contains("integer(\"created_at\", { mode: 'timestamp' })"));
        assert!(out.contains("text(\"status\")"));
        assert_eq!(result.source_dialect, Some(Dialect::Postgres));
    }

    #[test]
    fn test_table_builder_is_whole_word_only() {
        let source = "const XpgTableY = 1;\nexport const t = pgTable(\"t\", {});\n";
        let result = convert(source);
        assert!(result.output.contains("XpgTableY"));
        assert!(result.output.contains("sqliteTable(\"t\""));
    }

    #[test]
    fn test_enum_stripping_only_affects_declaration_lines() {
        let source = "\
export const aEnum = pgEnum('a', ['x']);
export const keep = pgTable(\"keep\", { a: aEnum(\"a\") });
";
        let result = convert(source);
        assert!(!result.output.contains("pgEnum"));
        assert!(result.output.contains("sqliteTable(\"keep\", { a: text(\"a\") })"));
    }

    #[test]
    fn test_random_uuid_default_rewritten() {
        let source = "id: varchar(\"id\").default(sql`gen_random_uuid()`),\n";
        let result = convert(source);
        assert!(result
            .output
            .contains("text(\"id\").default(sql`(lower(hex(randomblob(16))))`)"));
    }

    #[test]
    fn test_default_now_stripped_with_follow_up_warning() {
        let source = "created: timestamp(\"created_at\").defaultNow(),\n";
        let result = convert(source);
        assert!(!result.output.contains(".defaultNow()"));
        assert!(result
            .output
            .contains("integer(\"created_at\", { mode: 'timestamp' })"));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w.warning_type, RewriteWarningType::ManualFollowUp)));
    }

    #[test]
    fn test_decimal_and_date_and_jsonb_normalized() {
        let source = "price: decimal(\"price\"), day: date(\"day\"), meta: jsonb(\"meta\"),\n";
        let result = convert(source);
        assert_eq!(
            result.output,
            "price: real(\"price\"), day: text(\"day\"), meta: text(\"meta\"),\n"
        );
    }

    #[test]
    fn test_enum_docs_inserted_after_zod_import() {
        let engine = postgres_engine(Some("// enum docs\n"));
        let source = "import { z } from \"zod\";\nexport const t = pgTable(\"t\", {});\n";
        let result = engine
            .rewrite(source, Dialect::Postgres, Dialect::Sqlite)
            .unwrap();
        assert!(result
            .output
            .starts_with("import { z } from \"zod\";\n// enum docs\n"));
        assert!(result.applied.iter().any(|a| a.rule_id == "enum-docs"));
    }

    #[test]
    fn test_missing_anchor_skips_docs_but_converts_everything_else() {
        let engine = postgres_engine(Some("// enum docs\n"));
        let result = engine
            .rewrite(SAMPLE_SCHEMA, Dialect::Postgres, Dialect::Sqlite)
            .unwrap();
        assert!(!result.output.contains("// enum docs"));
        assert!(result.output.contains("sqliteTable"));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w.warning_type, RewriteWarningType::AnchorMissing)));
    }

    #[test]
    fn test_second_pass_is_a_no_op_without_docs_rule() {
        let first = convert(SAMPLE_SCHEMA);
        let second = convert(&first.output);
        assert_eq!(first.output, second.output);
        assert!(second.applied.is_empty());
        assert!(second
            .warnings
            .iter()
            .any(|w| matches!(w.warning_type, RewriteWarningType::AlreadyTargetDialect)));
    }

    #[test]
    fn test_second_pass_duplicates_docs_while_anchor_remains() {
        // The anchor-based insertion is the one knowingly non-idempotent step
        let engine = postgres_engine(Some("// enum docs\n"));
        let source = "import { z } from \"zod\";\nexport const t = pgTable(\"t\", {});\n";
        let first = engine
            .rewrite(source, Dialect::Postgres, Dialect::Sqlite)
            .unwrap();
        let second = engine
            .rewrite(&first.output, Dialect::Postgres, Dialect::Sqlite)
            .unwrap();
        assert_eq!(second.output.matches("// enum docs").count(), 2);
    }

    #[test]
    fn test_unregistered_pair_is_an_error() {
        let engine = postgres_engine(None);
        let result = engine.rewrite("", Dialect::Sqlite, Dialect::Postgres);
        assert!(matches!(result, Err(RewriteError::Registry(_))));
    }
}
