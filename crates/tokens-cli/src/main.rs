use serde::{Deserialize, Serialize};
use tokens_core::TokenSet;
use tokens_import::{Error as ImportError, ExitClass, ImportOutcome, ImportSource, VariablesSource};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(serde_json::Error),
    Import(ImportError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "invalid config file: {err}"),
            CliError::Import(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ImportError> for CliError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

const DEFAULT_FIGMA_BASE_URL: &str = "https://api.figma.com";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    dtcg_file: Option<String>,
    dtcg_url: Option<String>,
    figma_base_url: Option<String>,
    figma_file_key: Option<String>,
    figma_api_key: Option<String>,
}

#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    dtcg_file: Option<String>,
    dtcg_url: Option<String>,
    figma_base_url: Option<String>,
    figma_file_key: Option<String>,
    figma_api_key: Option<String>,
    pretty: bool,
    verbose: bool,
}

fn usage() -> &'static str {
    "tokens-cli\n\
\n\
USAGE:\n\
  tokens-cli --dtcg-file <path> [--pretty]\n\
  tokens-cli --dtcg-url <url> [--pretty]\n\
  tokens-cli --figma-file-key <key> [--figma-base-url <url>] [--figma-api-key <key>] [--pretty]\n\
  tokens-cli --config <path> [--pretty]\n\
\n\
NOTES:\n\
  - Exactly one of --dtcg-file, --dtcg-url, or --figma-file-key may be given.\n\
  - --config loads a JSON file with the same field names (dtcg_file, dtcg_url,\n\
    figma_base_url, figma_file_key, figma_api_key); CLI flags win over it.\n\
  - --figma-api-key falls back to the FIGMA_API_KEY environment variable.\n\
  - --figma-base-url defaults to https://api.figma.com.\n\
  - Prints {\"tokenSet\": ..., \"warnings\": [...]} to stdout.\n\
  - -v/--verbose enables tracing output on stderr (or set RUST_LOG).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbose = true,
            "--config" => args.config_path = Some(next_value(&mut it)?),
            "--dtcg-file" => args.dtcg_file = Some(next_value(&mut it)?),
            "--dtcg-url" => args.dtcg_url = Some(next_value(&mut it)?),
            "--figma-base-url" => args.figma_base_url = Some(next_value(&mut it)?),
            "--figma-file-key" => args.figma_file_key = Some(next_value(&mut it)?),
            "--figma-api-key" => args.figma_api_key = Some(next_value(&mut it)?),
            _ => return Err(CliError::Usage(usage())),
        }
    }
    Ok(args)
}

fn next_value(it: &mut std::iter::Peekable<std::iter::Skip<std::slice::Iter<String>>>) -> Result<String, CliError> {
    it.next().cloned().ok_or(CliError::Usage(usage()))
}

fn load_config(path: &str) -> Result<ConfigFile, CliError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(CliError::Config)
}

/// CLI flags win over the config file (spec §10.4 precedence rule).
fn merge(args: &Args, config: ConfigFile) -> (Option<String>, Option<String>, Option<String>, Option<String>, Option<String>) {
    (
        args.dtcg_file.clone().or(config.dtcg_file),
        args.dtcg_url.clone().or(config.dtcg_url),
        args.figma_base_url.clone().or(config.figma_base_url),
        args.figma_file_key.clone().or(config.figma_file_key),
        args.figma_api_key.clone().or(config.figma_api_key),
    )
}

fn build_source(args: &Args) -> Result<ImportSource, CliError> {
    let config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };
    let (dtcg_file, dtcg_url, figma_base_url, figma_file_key, figma_api_key) = merge(args, config);

    let variables_source = figma_file_key.map(|file_key| VariablesSource {
        base_url: figma_base_url.unwrap_or_else(|| DEFAULT_FIGMA_BASE_URL.to_string()),
        file_key,
        api_key: figma_api_key
            .or_else(|| std::env::var("FIGMA_API_KEY").ok())
            .unwrap_or_default(),
    });

    ImportSource::from_options(dtcg_file, dtcg_url, variables_source).map_err(CliError::Import)
}

#[derive(Serialize)]
struct Output<'a> {
    #[serde(rename = "tokenSet")]
    token_set: &'a TokenSet,
    warnings: &'a [String],
}

fn write_output(outcome: &ImportOutcome, pretty: bool) -> Result<(), CliError> {
    let output = Output {
        token_set: &outcome.token_set,
        warnings: &outcome.warnings,
    };
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &output)
    } else {
        serde_json::to_writer(std::io::stdout().lock(), &output)
    }
    .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn exit_code_for(err: &ImportError) -> i32 {
    match err.exit_class() {
        ExitClass::Validation => 2,
        ExitClass::Fatal => 1,
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let source = build_source(&args)?;
    tracing::info!("starting import");
    let outcome = tokens_import::import(source).await?;
    tracing::info!(tokens = outcome.token_set.tokens.len(), warnings = outcome.warnings.len(), "import finished");
    write_output(&outcome, args.pretty)?;
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => {}
        Err(CliError::Import(err)) => {
            let code = exit_code_for(&err);
            eprintln!("{err}");
            std::process::exit(code);
        }
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
