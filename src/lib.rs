// Drizzle ORM schema dialect conversion system
pub mod dialect;
pub mod rewrite_rule;
pub mod rule_registry;
pub mod rewrite_engine;
pub mod validation;
pub mod reporter;

// Re-export core types for convenience
pub use dialect::Dialect;
pub use rewrite_rule::{AppliedRewrite, RewriteAction, RewriteRule};
pub use rule_registry::{RuleRegistry, ENUM_DOCS_ANCHOR};
pub use rewrite_engine::{RewriteError, RewriteResult, RewriteWarning, SchemaRewriteEngine};
pub use validation::{scan_converted, LeftoverFinding, ValidationReport};
pub use reporter::{ConversionReport, ConversionReporter, ReportFormat};
