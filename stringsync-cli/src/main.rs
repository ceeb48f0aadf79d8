use clap::{ArgGroup, Parser};
use stringsync::{DEFAULT_BATCH_SIZE, context::DEFAULT_CONTEXT_WINDOW};
use stringsync_cli::{
    CommandOptions, run_apply_command, run_cleanup_command, run_extract_command,
};
use tracing_subscriber::EnvFilter;

/// Synchronize a translated Android strings.xml with its source.
///
/// Exactly one mode runs per invocation:
///   --cleanup   remove target entries that no longer exist in the source
///   --extract   write batch_<lang>_<NNN>.json files with entries missing from the target
///   --apply     merge a translated batch file back into the target
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .multiple(false)
        .args(["cleanup", "extract", "apply"])
))]
struct Args {
    /// Source strings.xml file (e.g. app/src/main/res/values/strings.xml)
    #[arg(long)]
    source: String,

    /// Target strings.xml file (e.g. app/src/main/res/values-lv/strings.xml)
    #[arg(long)]
    target: String,

    /// Remove obsolete entries from the target
    #[arg(long)]
    cleanup: bool,

    /// Extract missing translations to batch files
    #[arg(long)]
    extract: bool,

    /// Apply translations from a batch file
    #[arg(long, value_name = "BATCH_FILE")]
    apply: Option<String>,

    /// Maximum number of entries per batch file
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Directory batch files are written to
    #[arg(long, default_value = ".")]
    output_dir: String,

    /// Number of neighbouring strings on each side included as context
    #[arg(long, default_value_t = DEFAULT_CONTEXT_WINDOW)]
    context_window: usize,
}

enum Mode {
    Cleanup,
    Extract,
    Apply(String),
}

impl Args {
    /// The `mode` group lets exactly one of the three flags through.
    fn mode(&self) -> Mode {
        match &self.apply {
            Some(batch) => Mode::Apply(batch.clone()),
            None if self.extract => Mode::Extract,
            None => Mode::Cleanup,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mode = args.mode();

    let opts = CommandOptions {
        source: args.source,
        target: args.target,
        batch_size: args.batch_size,
        output_dir: args.output_dir,
        context_window: args.context_window,
    };

    let result = match mode {
        Mode::Cleanup => run_cleanup_command(&opts),
        Mode::Extract => run_extract_command(&opts),
        Mode::Apply(batch) => run_apply_command(&opts, &batch),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
