use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

use greetings_poster::{
    Config, Secrets,
    email::{DynEmailProvider, create_provider},
    employee::map_employee,
    poster::PosterKind,
    runner::{Runner, build_engine, source_from_config},
    startup_checks,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "secrets.toml", global = true)]
    secrets: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and send today's posters (default if no command specified)
    Run {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Only write the posters, do not send emails
        #[arg(long)]
        no_email: bool,
    },

    /// Render a single poster from an employee JSON record
    Render {
        #[arg(long, value_enum)]
        kind: KindArg,

        /// File holding one raw employee record
        #[arg(long)]
        employee_json: PathBuf,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate the configuration, templates and fonts
    Check,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Birthday,
    Anniversary,
}

impl From<KindArg> for PosterKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Birthday => PosterKind::Birthday,
            KindArg::Anniversary => PosterKind::Anniversary,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let rust_log = std::env::var("RUST_LOG").ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(&cli.log_level, rust_log.as_deref()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(&cli.config)?;
    let secrets = Secrets::load(&cli.secrets)?;
    info!("Configuration loaded from: {:?}", cli.config);

    match cli.command {
        Some(Commands::Run { date, no_email }) => run(config, secrets, date, no_email).await,
        Some(Commands::Render {
            kind,
            employee_json,
            date,
            output,
        }) => render(config, secrets, kind.into(), employee_json, date, output).await,
        Some(Commands::Check) => check(&config).await,
        None => run(config, secrets, None, false).await,
    }
}

/// `RUST_LOG` directives win when set and valid, otherwise `--log-level`.
fn log_filter(log_level: &str, rust_log: Option<&str>) -> EnvFilter {
    let from_env = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok());
    if let Some(filter) = from_env {
        return filter;
    }

    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn check_startup(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(errors) = startup_checks::perform_startup_checks(config).await {
        for error in &errors {
            error!("Startup check failed: {}", error);
        }
        if errors.iter().any(|e| e.is_critical()) {
            error!("Critical startup check failed, exiting");
            return Err("Critical startup check failed".into());
        }
        warn!("Non-critical startup checks failed, continuing");
    }
    Ok(())
}

async fn run(
    config: Config,
    secrets: Secrets,
    date: Option<NaiveDate>,
    no_email: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_startup(&config).await?;

    let today = date.unwrap_or_else(today);
    info!("Starting {} for {}", config.app.name, today);

    let email: Option<DynEmailProvider> = match (&config.email, no_email) {
        (Some(email_config), false) => Some(create_provider(&email_config.provider).await?),
        (None, false) => {
            warn!("No [email] section configured, posters will only be written to disk");
            None
        }
        (_, true) => None,
    };

    let source = source_from_config(&config, &secrets)?;
    let engine = build_engine(&config)?;
    let runner = Runner::new(config, secrets, engine, email);

    let summary = runner.run(&source, today).await?;
    info!(
        "Processed {} employees: {} birthday, {} anniversary, {} failed, {} email(s) sent",
        summary.employees,
        summary.birthday_posters,
        summary.anniversary_posters,
        summary.failed_posters,
        summary.emails_sent
    );

    if summary.email_failures > 0 {
        return Err(format!("{} greeting email(s) failed to send", summary.email_failures).into());
    }
    Ok(())
}

async fn render(
    config: Config,
    secrets: Secrets,
    kind: PosterKind,
    employee_json: PathBuf,
    date: Option<NaiveDate>,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(&employee_json).await?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;
    let employee = map_employee(&raw, &config.field_mapping);
    let date = date.unwrap_or_else(today);

    let engine = build_engine(&config)?;
    let runner = Runner::new(config, secrets, engine, None);
    let bytes = runner.render_one(kind, &employee, date).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output, &bytes).await?;
    info!("Wrote {} poster for {} to {:?}", kind, employee.name, output);
    Ok(())
}

async fn check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    check_startup(config).await?;
    info!(
        "Configuration for {} OK, posters go to {:?}",
        config.app.name, config.app.output_directory
    );
    Ok(())
}
