use clap::{Parser, Subcommand};
use field_journal::builders::BuildContext;
use field_journal::render::{self, OutputFormat};
use field_journal::{assemble, audit, config, journal, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "field-journal")]
#[command(about = "Generate a geological field journal from a travel record")]
#[command(long_about = "\
Generate a geological field journal from a travel record

Reads a JSON travel record and a directory of photos and writes a formatted
document: title page, regional context and timeline, table of contents, one
section per day, glossary and stratigraphic index.

Input record (travelData.json):

  {
    \"tripTitle\": \"Chile 2026\",
    \"author\": \"R. Finch\",                      # optional, shown in footer
    \"coverImage\": \"cover.jpg\",                 # optional
    \"days\": [
      {
        \"day\": 1,
        \"title\": \"Santiago\",
        \"description\": \"...\",
        \"coordinates\": \"-33.45,-70.66\",        # optional, linked to a map
        \"geoNote\": { \"title\": \"...\", \"text\": \"...\" },
        \"images\": [\"a.jpg\", { \"url\": \"b.jpg\", \"caption\": \"...\" }]
      }
    ],
    \"glossary\": [{ \"term\": \"...\", \"definition\": \"...\" }]
  }

Missing photos never stop a build: they are listed by the audit and shown as
placeholders in the document.

Run 'field-journal gen-config' to generate a documented journal.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "journal.toml", global = true)]
    config: PathBuf,

    /// Travel record (overrides [paths] data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Photo directory (overrides [paths] photos)
    #[arg(long, global = true)]
    photos: Option<PathBuf>,

    /// Output document (overrides [paths] output)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Audit photos and write the journal (default)
    Build {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Docx)]
        format: OutputFormat,
    },
    /// Load the record and audit photos without writing anything
    Check,
    /// Print a stock journal.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (command, result) = match cli.command {
        None => ("Build", build(&cli, OutputFormat::Docx)),
        Some(Command::Build { format }) => ("Build", build(&cli, format)),
        Some(Command::Check) => ("Check", check(&cli)),
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
            ("Gen-config", Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", output::format_failure(command, &err));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout is reserved for the audit and build lines.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "field_journal=warn",
        1 => "field_journal=debug",
        _ => "field_journal=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Input and output locations after applying CLI overrides.
struct Paths {
    data: PathBuf,
    photos: PathBuf,
    output: PathBuf,
}

fn resolve_paths(cli: &Cli, paths: &config::PathsConfig) -> Paths {
    Paths {
        data: cli.data.clone().unwrap_or_else(|| PathBuf::from(&paths.data)),
        photos: cli
            .photos
            .clone()
            .unwrap_or_else(|| PathBuf::from(&paths.photos)),
        output: cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&paths.output)),
    }
}

/// Swap a `.docx`/`.html` extension to match the chosen format; any other
/// name is used as given.
fn output_path_for(path: &Path, format: OutputFormat) -> PathBuf {
    let known = [OutputFormat::Docx, OutputFormat::Html].map(OutputFormat::extension);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if known.contains(&ext) => path.with_extension(format.extension()),
        _ => path.to_path_buf(),
    }
}

fn build(cli: &Cli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let journal_config = config::load_config(&cli.config)?;
    let paths = resolve_paths(cli, &journal_config.paths);

    let record = journal::load_journal(&paths.data)?;
    output::print_audit_output(&audit::audit(&record, &paths.photos));

    let ctx = BuildContext::new(&paths.photos, &journal_config);
    let document = assemble::assemble(&record, &ctx);
    let bytes = render::to_bytes(&document, &journal_config.style, format)?;

    let output_path = output_path_for(&paths.output, format);
    render::write_document(&output_path, &bytes)?;
    output::print_build_success(&output_path);
    Ok(())
}

fn check(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let journal_config = config::load_config(&cli.config)?;
    let paths = resolve_paths(cli, &journal_config.paths);

    let record = journal::load_journal(&paths.data)?;
    output::print_audit_output(&audit::audit(&record, &paths.photos));
    Ok(())
}
