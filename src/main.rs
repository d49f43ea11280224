use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use wsk_api::commands::api::{self, ApiFlags, ListFlags};
use wsk_api::commands::property::{self, PropertyValues};
use wsk_api::config::{ClientConfig, Config, Overrides};
use wsk_api::whisk::client::WhiskClient;
use wsk_api::WskError;

/// Manage gateway APIs bound to serverless actions
#[derive(Parser, Debug)]
#[command(name = "wsk", version, about, long_about = None)]
struct Cli {
    /// Platform API host
    #[arg(long, global = true, env = "WSK_APIHOST")]
    apihost: Option<String>,

    /// Authorization key (uuid:key)
    #[arg(short = 'u', long, global = true, env = "WSK_AUTH", hide_env_values = true)]
    auth: Option<String>,

    /// Namespace to work in
    #[arg(long, global = true, env = "WSK_NAMESPACE")]
    namespace: Option<String>,

    /// Bypass certificate checking
    #[arg(short, long, global = true)]
    insecure: bool,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Work with APIs
    #[command(subcommand)]
    Api(ApiCommand),

    /// Work with client settings
    #[command(subcommand)]
    Property(PropertyCommand),
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    /// Create a new API
    Create {
        #[arg(value_name = "API_PATH API_VERB ACTION")]
        args: Vec<String>,

        /// API collection NAME
        #[arg(short = 'n', long)]
        apiname: Option<String>,

        /// The API BASE_PATH to which the API_PATH is relative
        #[arg(short, long)]
        basepath: Option<String>,
    },

    /// Update an existing API
    Update {
        #[arg(value_name = "API_PATH API_VERB ACTION")]
        args: Vec<String>,

        /// API collection NAME
        #[arg(short = 'n', long)]
        apiname: Option<String>,

        /// The API BASE_PATH to which the API_PATH is relative
        #[arg(short, long)]
        basepath: Option<String>,
    },

    /// Get an API
    Get {
        #[arg(value_name = "API_PATH API_VERB")]
        args: Vec<String>,

        /// Summarize API details
        #[arg(short, long)]
        summary: bool,

        /// The API BASE_PATH to which the API_PATH is relative
        #[arg(short, long)]
        basepath: Option<String>,
    },

    /// Delete an API
    Delete {
        #[arg(value_name = "API_PATH API_VERB ACTION")]
        args: Vec<String>,

        /// The API BASE_PATH to which the API_PATH is relative
        #[arg(short, long)]
        basepath: Option<String>,
    },

    /// List APIs
    List {
        /// ACTION to invoke when API is called
        #[arg(short, long)]
        action: Option<String>,

        /// Relative API_PATH of API
        #[arg(short, long)]
        path: Option<String>,

        /// API_VERB of API
        #[arg(short, long)]
        method: Option<String>,

        /// Exclude the first SKIP number of APIs from the result
        #[arg(short, long, default_value_t = 0)]
        skip: u32,

        /// Only return LIMIT number of APIs from the collection
        #[arg(short, long, default_value_t = 30)]
        limit: u32,
    },
}

#[derive(Subcommand, Debug)]
enum PropertyCommand {
    /// Persist the --apihost, --auth and --namespace values given on the
    /// command line (their environment variables are not saved)
    Set,

    /// Show the effective settings
    Get,
}

impl PropertyCommand {
    fn name(&self) -> &'static str {
        match self {
            PropertyCommand::Set => "set",
            PropertyCommand::Get => "get",
        }
    }
}

impl ApiCommand {
    fn name(&self) -> &'static str {
        match self {
            ApiCommand::Create { .. } => "create",
            ApiCommand::Update { .. } => "update",
            ApiCommand::Get { .. } => "get",
            ApiCommand::Delete { .. } => "delete",
            ApiCommand::List { .. } => "list",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

const LOG_FILE_NAME: &str = "wsk.log";

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_dir = get_log_dir();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&log_dir);
    let appender = match appender {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("warning: logging disabled, cannot open {:?}: {}", log_dir, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        "wsk {} logging at {:?} to {:?}",
        env!("CARGO_PKG_VERSION"),
        level,
        log_dir.join(LOG_FILE_NAME)
    );

    Some(guard)
}

/// `<config_dir>/wsk`, then `~/.wsk`, then the working directory
fn get_log_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("wsk"))
        .or_else(|| dirs::home_dir().map(|home| home.join(".wsk")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// A global flag's value, only when it was typed on the command line
fn typed_value(matches: &ArgMatches, id: &str) -> Option<String> {
    match matches.value_source(id) {
        Some(ValueSource::CommandLine) => matches.get_one::<String>(id).cloned(),
        _ => None,
    }
}

/// Values for `property set`; environment variables are never persisted
fn typed_property_values(matches: &ArgMatches) -> PropertyValues {
    PropertyValues {
        apihost: typed_value(matches, "apihost"),
        auth: typed_value(matches, "auth"),
        namespace: typed_value(matches, "namespace"),
    }
}

/// Usage line for a subcommand path such as `["api", "create"]`
fn usage_for(path: &[&str]) -> String {
    let mut current = Cli::command().bin_name("wsk");
    current.build();
    for name in path {
        match current.find_subcommand(name).cloned() {
            Some(sub) => current = sub,
            None => break,
        }
    }
    current.render_usage().to_string()
}

fn make_client(config: &ClientConfig) -> Result<WhiskClient, WskError> {
    if config.auth_token.is_empty() {
        return Err(WskError::general(
            "No authorization key configured. Set WSK_AUTH or use --auth",
        ));
    }
    WhiskClient::new(config).map_err(|e| {
        tracing::error!("WhiskClient::new error: {:#}", e);
        WskError::general(format!("Unable to initialize client: {:#}", e)).with_cause(e)
    })
}

async fn run_api(command: ApiCommand, config: &ClientConfig) -> Result<(), WskError> {
    let client = make_client(config)?;
    let mut stdout = io::stdout().lock();

    match command {
        ApiCommand::Create {
            args,
            apiname,
            basepath,
        } => {
            let flags = ApiFlags {
                api_name: apiname,
                base_path: basepath,
            };
            api::create(&client, &args, &flags, &mut stdout).await
        }
        ApiCommand::Update {
            args,
            apiname,
            basepath,
        } => {
            let flags = ApiFlags {
                api_name: apiname,
                base_path: basepath,
            };
            api::update(&client, &args, &flags, &mut stdout).await
        }
        ApiCommand::Get {
            args,
            summary,
            basepath,
        } => {
            let flags = ApiFlags {
                api_name: None,
                base_path: basepath,
            };
            api::get(&client, &args, &flags, summary, &mut stdout).await
        }
        ApiCommand::Delete { args, basepath } => {
            let flags = ApiFlags {
                api_name: None,
                base_path: basepath,
            };
            api::delete(&client, &args, &flags, &mut stdout).await
        }
        ApiCommand::List {
            action,
            path,
            method,
            skip,
            limit,
        } => {
            let flags = ListFlags {
                action,
                path,
                verb: method,
                skip,
                limit,
            };
            api::list(&client, &flags, &mut stdout).await
        }
    }
}

fn run_property(
    command: PropertyCommand,
    values: &PropertyValues,
    config: &ClientConfig,
) -> Result<(), WskError> {
    let mut stdout = io::stdout().lock();
    match command {
        PropertyCommand::Set => {
            let path = Config::config_path()
                .ok_or_else(|| WskError::general("Unable to locate a configuration directory"))?;
            property::set(&path, values, &mut stdout)
        }
        PropertyCommand::Get => property::get(config, &mut stdout),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = Cli::command().get_matches();
    let Cli {
        apihost,
        auth,
        namespace,
        insecure,
        log_level,
        command,
    } = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let _log_guard = setup_logging(log_level);

    let overrides = Overrides {
        apihost,
        auth,
        namespace,
        insecure,
    };
    let config = Config::load().resolve(&overrides);
    tracing::debug!(
        "Using host: {}, namespace: {}",
        config.host,
        config.namespace
    );

    let (usage_path, result) = match command {
        Commands::Api(command) => {
            let path = ["api", command.name()];
            (path, run_api(command, &config).await)
        }
        Commands::Property(command) => {
            let path = ["property", command.name()];
            let values = typed_property_values(&matches);
            (path, run_property(command, &values, &config))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            if err.display_usage() {
                eprintln!("{}", usage_for(&usage_path));
                eprintln!("Run 'wsk {} --help' for usage.", usage_path.join(" "));
            }
            ExitCode::from(err.exit_code().code())
        }
    }
}
