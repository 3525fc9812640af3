//! Command line front end: render a document or resolve single keys.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{
    Context,
    bail,
};
use clap::{
    Parser,
    Subcommand,
};
use live_i18n::config::{
    ConfigManager,
    I18nSettings,
};
use live_i18n::diagnostics::MemorySink;
use live_i18n::dom::{
    Document,
    DocumentTree,
};
use live_i18n::input::{
    load_table_file,
    load_translation_dir,
};
use live_i18n::{
    LanguageController,
    TranslationTable,
    VarsMap,
};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Workspace root holding `.live-i18n.json` and the translation files
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Read the whole table from one JSON file instead of discovering files
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// What to do with the loaded table.
    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Render a JSON document description and print it as HTML
    Render {
        /// Path of the JSON document description
        document: PathBuf,

        /// Language to switch to (defaults to the configured language)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Resolve one key and print the result
    Get {
        /// Dotted key to resolve
        key: String,

        /// Language to resolve in (defaults to the configured language)
        #[arg(short, long)]
        lang: Option<String>,

        /// Placeholder value, as `name=value` (repeatable)
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
    /// List the loaded language codes
    Languages,
}

/// Parse a `name=value` placeholder argument.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load the workspace and execute the chosen subcommand.
#[allow(clippy::print_stdout, clippy::print_stderr)]
fn run(args: Arguments) -> anyhow::Result<()> {
    let config = ConfigManager::load(&args.workspace)?;
    let settings = config.settings();

    let table = match &args.table {
        Some(path) => load_table_file(path)?,
        None => load_translation_dir(config.workspace_root(), settings)?,
    };
    let sink = MemorySink::new();

    match args.command {
        Command::Render { document, lang } => {
            let json = std::fs::read_to_string(&document)
                .with_context(|| format!("Failed to read document {document:?}"))?;
            let document = Document::from_json_str(&json)
                .with_context(|| format!("Invalid document description {document:?}"))?;

            let controller = activate(document, table, settings, &sink, lang.as_deref())?;
            println!("{}", controller.document().to_html());
        }
        Command::Get { key, lang, vars } => {
            let controller = activate(Document::new(), table, settings, &sink, lang.as_deref())?;
            let vars: VarsMap = vars.into_iter().collect();
            println!("{}", controller.get(&key, &vars));
        }
        Command::Languages => {
            for language in table.languages() {
                println!("{language}");
            }
        }
    }

    if !sink.is_empty() {
        eprintln!("{} diagnostic(s) reported", sink.len());
    }
    Ok(())
}

/// Build a controller, load `table` and render in `lang` or the default language.
///
/// # Errors
/// Fails when `lang` is given but missing from `table`, including when it
/// equals the configured language.
fn activate<D: DocumentTree>(
    document: D,
    table: TranslationTable,
    settings: &I18nSettings,
    sink: &MemorySink,
    lang: Option<&str>,
) -> anyhow::Result<LanguageController<D>> {
    let mut controller = LanguageController::from_settings(document, settings).with_sink(sink.clone());
    controller.load(table);

    match lang {
        Some(lang) => {
            let known = controller.store().has_language(lang);
            controller.set_language(lang);
            if !known {
                bail!("Unknown language '{lang}'");
            }
        }
        None => controller.apply(),
    }

    Ok(controller)
}
