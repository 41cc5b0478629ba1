use std::fs;
use std::path::{Path, PathBuf};
use clap::Parser;
use convert_schema_to_sqlite::{
    scan_converted, ConversionReporter, Dialect, ReportFormat, RuleRegistry, SchemaRewriteEngine,
};

/// Documentation block for the enum value sets downgraded to text columns.
/// This is knowledge about the upstream schema, not derived from the input;
/// update it here when the upstream enums change.
const DEFAULT_ENUM_DOCS: &str = r#"
// SQLite Schema - Converted from PostgreSQL
// Note: Enums are replaced with TEXT fields. Validation should be done at application level.
// Enum values documentation:
// - user_status: 'online', 'offline', 'away', 'busy', 'gaming'
// - privacy_level: 'everyone', 'friends_only', 'private'
// - event_type: 'tournament', 'convention', 'release', 'stream', 'community', 'personal', 'game_pod'
// - event_status: 'active', 'cancelled', 'completed', 'draft'
// - attendee_status: 'attending', 'maybe', 'not_attending'
// - game_session_status: 'waiting', 'active', 'paused', 'completed', 'cancelled'
// - notification_type: 'event_join', 'event_leave', 'game_invite', 'message', 'system', 'friend_request', 'friend_accepted', 'pod_filled', 'pod_almost_full', 'spectator_join'
// - notification_priority: 'low', 'normal', 'high', 'urgent'
// - stream_session_status: 'scheduled', 'live', 'ended', 'cancelled'
// - collaboration_request_status: 'pending', 'accepted', 'declined', 'expired', 'cancelled'
// And more... (check original schema for complete list)

"#;

#[derive(Parser, Debug)]
#[command(name = "convert-schema-to-sqlite")]
#[command(about = "Convert a Drizzle ORM schema file from PostgreSQL to SQLite dialect")]
struct Args {
    /// Path to the PostgreSQL-dialect schema file
    #[arg(default_value = "shared/schema.ts")]
    input: PathBuf,

    /// Output path (defaults to the input path with a -sqlite suffix before the extension)
    output: Option<PathBuf>,

    /// Print the conversion report as JSON instead of console text
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&args.input));

    let source = fs::read_to_string(&args.input).expect("Failed to read the schema file");

    let registry = RuleRegistry::builtin(Some(DEFAULT_ENUM_DOCS))
        .expect("Failed to build the conversion rule set");
    let engine = SchemaRewriteEngine::new(registry);
    let result = engine
        .rewrite(&source, Dialect::Postgres, Dialect::Sqlite)
        .expect("Failed to convert the schema");

    fs::write(&output_path, &result.output).expect("Failed to write the converted schema");

    let validation = scan_converted(&result.output);
    let format = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Console
    };
    let reporter = ConversionReporter::new().with_format(format);
    let report = reporter.generate_report(
        &args.input.display().to_string(),
        &output_path.display().to_string(),
        &result,
        validation,
    );
    let formatted = reporter
        .format_report(&report)
        .expect("Failed to format the conversion report");
    println!("{formatted}");
}

/// Insert a `-sqlite` suffix before the input's file extension
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    match input.extension() {
        Some(ext) => input.with_file_name(format!("{stem}-sqlite.{}", ext.to_string_lossy())),
        None => input.with_file_name(format!("{stem}-sqlite")),
    }
}
