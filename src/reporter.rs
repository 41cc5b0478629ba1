use serde::{Deserialize, Serialize};
use crate::{
    dialect::Dialect,
    rewrite_engine::{RewriteResult, RewriteWarning},
    rewrite_rule::AppliedRewrite,
    validation::ValidationReport,
};

/// Reporter for rendering conversion reports in the supported formats
pub struct ConversionReporter {
    output_format: ReportFormat,
}

/// Available output formats for conversion reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Console,
    Json,
}

/// Full record of a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input_path: String,
    pub output_path: String,
    pub source_dialect: Option<Dialect>,
    pub target_dialect: Dialect,
    pub applied_rewrites: Vec<AppliedRewrite>,
    pub warnings: Vec<RewriteWarning>,
    pub validation: ValidationReport,
    pub manual_review: Vec<String>,
    pub summary: ConversionSummary,
}

/// Aggregate counts across the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub rules_applied: usize,
    pub total_occurrences: usize,
    pub lines_removed: usize,
    pub leftover_findings: usize,
}

impl ConversionReporter {
    pub fn new() -> Self {
        Self {
            output_format: ReportFormat::Console,
        }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Build the report for a finished rewrite pass
    pub fn generate_report(
        &self,
        input_path: &str,
        output_path: &str,
        result: &RewriteResult,
        validation: ValidationReport,
    ) -> ConversionReport {
        let summary = ConversionSummary {
            rules_applied: result.applied.len(),
            total_occurrences: result.applied.iter().map(|a| a.occurrences).sum(),
            lines_removed: result.applied.iter().map(|a| a.removed_lines.len()).sum(),
            leftover_findings: validation.findings.len(),
        };
        let manual_review = self.manual_review_items(&validation);

        ConversionReport {
            input_path: input_path.to_string(),
            output_path: output_path.to_string(),
            source_dialect: result.source_dialect,
            target_dialect: result.target_dialect,
            applied_rewrites: result.applied.clone(),
            warnings: result.warnings.clone(),
            validation,
            manual_review,
            summary,
        }
    }

    /// Format the report according to the configured output format
    pub fn format_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        match self.output_format {
            ReportFormat::Console => self.format_console_report(report),
            ReportFormat::Json => self.format_json_report(report),
        }
    }

    /// The follow-up items every conversion leaves for the developer
    fn manual_review_items(&self, validation: &ValidationReport) -> Vec<String> {
        let mut items = vec![
            "Default timestamp values (SQLite uses a different approach)".to_string(),
            "JSON field validation (jsonb stored as text)".to_string(),
            "Enum value validation (add CHECK constraints if needed)".to_string(),
        ];
        if validation.has_findings() {
            items.push(format!(
                "{} PostgreSQL construct(s) left in the output (see review findings)",
                validation.findings.len()
            ));
        }
        items
    }

    fn format_console_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        let mut output = String::new();

        output.push_str("=== Schema Conversion Complete ===\n");
        output.push_str(&format!("  ✓ Input: {}\n", report.input_path));
        output.push_str(&format!("  ✓ Output: {}\n", report.output_path));
        let source = match report.source_dialect {
            Some(dialect) => dialect.to_string(),
            None => "unknown".to_string(),
        };
        output.push_str(&format!(
            "  ✓ Dialect: {} -> {}\n",
            source, report.target_dialect
        ));

        output.push_str("\n=== Applied Rewrites ===\n");
        if report.applied_rewrites.is_empty() {
            output.push_str("  ℹ No rewrites applied (input may already be converted)\n");
        }
        for applied in &report.applied_rewrites {
            output.push_str(&format!(
                "  ✓ {} ({} occurrence{})\n",
                applied.description,
                applied.occurrences,
                if applied.occurrences == 1 { "" } else { "s" }
            ));
            for line in &applied.removed_lines {
                output.push_str(&format!("      - {}\n", line));
            }
        }

        if !report.warnings.is_empty() {
            output.push_str("\n=== Warnings ===\n");
            for warning in &report.warnings {
                output.push_str(&format!("  ⚠ {}\n", warning.message));
            }
        }

        if report.validation.has_findings() {
            output.push_str("\n=== Output Review ===\n");
            for finding in &report.validation.findings {
                output.push_str(&format!(
                    "  ⚠ line {}: {} ({})\n",
                    finding.line, finding.message, finding.snippet
                ));
            }
        }

        output.push_str("\n⚠ Manual review needed for:\n");
        for item in &report.manual_review {
            output.push_str(&format!("  - {}\n", item));
        }

        Ok(output)
    }

    fn format_json_report(&self, report: &ConversionReport) -> Result<String, ReportError> {
        serde_json::to_string_pretty(report)
            .map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for ConversionReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
