use regex::Regex;
use serde::{Deserialize, Serialize};

/// Scan report over a converted schema buffer.
///
/// Findings are review aids, never fatal: the converter promises a textual
/// rewrite, not a correct schema, so anything PostgreSQL-flavored that
/// survives the pass is surfaced for the developer to resolve by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_clean: bool,
    pub findings: Vec<LeftoverFinding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_clean: true,
            findings: Vec::new(),
        }
    }

    pub fn add_finding(&mut self, finding: LeftoverFinding) {
        self.is_clean = false;
        self.findings.push(finding);
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// A PostgreSQL construct left in the converted output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeftoverFinding {
    /// 1-based line number in the converted output
    pub line: usize,
    pub snippet: String,
    pub kind: LeftoverKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeftoverKind {
    PostgresImport,
    TableBuilder,
    EnumDeclaration,
    DefaultNow,
    RandomUuidDefault,
    ColumnType,
}

/// Scan converted output for PostgreSQL constructs the rewrite did not reach
pub fn scan_converted(output: &str) -> ValidationReport {
    let checks: [(Regex, LeftoverKind, &str); 6] = [
        (
            Regex::new(r"drizzle-orm/pg-core").unwrap(),
            LeftoverKind::PostgresImport,
            "pg-core import still referenced",
        ),
        (
            Regex::new(r"\bpgTable\b").unwrap(),
            LeftoverKind::TableBuilder,
            "pgTable builder still in use",
        ),
        (
            Regex::new(r"\bpgEnum\b").unwrap(),
            LeftoverKind::EnumDeclaration,
            "pgEnum still referenced; enums have no SQLite representation",
        ),
        (
            Regex::new(r"\.defaultNow\(\)").unwrap(),
            LeftoverKind::DefaultNow,
            ".defaultNow() has no SQLite equivalent",
        ),
        (
            Regex::new(r"gen_random_uuid").unwrap(),
            LeftoverKind::RandomUuidDefault,
            "gen_random_uuid() default is PostgreSQL-only",
        ),
        (
            Regex::new(r"\b(?:varchar|jsonb|decimal|date)\(").unwrap(),
            LeftoverKind::ColumnType,
            "PostgreSQL column type constructor still in use",
        ),
    ];

    let mut report = ValidationReport::new();
    for (index, line) in output.lines().enumerate() {
        for (pattern, kind, message) in &checks {
            if pattern.is_match(line) {
                report.add_finding(LeftoverFinding {
                    line: index + 1,
                    snippet: line.trim().to_string(),
                    kind: *kind,
                    message: (*message).to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_has_no_findings() {
        let output = "\
import { sqliteTable, text, integer } from \"drizzle-orm/sqlite-core\";
export const users = sqliteTable(\"users\", { id: text(\"id\") });
";
        let report = scan_converted(output);
        assert!(report.is_clean);
        assert!(!report.has_findings());
    }

    #[test]
    fn test_leftover_import_is_reported_with_line_number() {
        let output = "// header\nimport { pgTable } from \"drizzle-orm/pg-core\";\n";
        let report = scan_converted(output);
        assert!(!report.is_clean);
        assert!(report
            .findings
            .iter()
            .any(|f| f.kind == LeftoverKind::PostgresImport && f.line == 2));
        assert!(report
            .findings
            .iter()
            .any(|f| f.kind == LeftoverKind::TableBuilder));
    }

    #[test]
    fn test_leftover_default_now_and_uuid() {
        let output =
            "a: integer(\"a\").defaultNow(),\nb: text(\"b\").default(sql`gen_random_uuid()`),\n";
        let report = scan_converted(output);
        let kinds: Vec<_> = report.findings.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&LeftoverKind::DefaultNow));
        assert!(kinds.contains(&LeftoverKind::RandomUuidDefault));
    }

    #[test]
    fn test_leftover_column_types() {
        let output = "price: decimal(\"price\"),\n";
        let report = scan_converted(output);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, LeftoverKind::ColumnType);
        assert_eq!(report.findings[0].snippet, "price: decimal(\"price\"),");
    }

    #[test]
    fn test_word_boundaries_do_not_flag_converted_names() {
        let output = "export const t = sqliteTable(\"t\", { d: text(\"d\") });\n";
        let report = scan_converted(output);
        assert!(report.is_clean);
    }
}
