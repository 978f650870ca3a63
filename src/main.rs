use anyhow::{bail, Context, Result};
use academic_search::api::{HttpSearchApi, SearchApi};
use academic_search::config::{
    default_config_path, find_config_file, load_config, Config, OutputFormat,
};
use academic_search::pages::{HistoryPage, HomePage};
use academic_search::ui::{self, Spinner};
use academic_search::utils::is_terminal;
use academic_search::views::{HistoryRender, ResultRender, ResultSource, ResultView, SubmitOutcome};
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Academic Search - run academic searches and browse their history
#[derive(Parser, Debug)]
#[command(name = "academic-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run academic searches against a search service and browse their history", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format (overrides the config file)
    #[arg(long, short, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base address of the search service, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a search (the term must be at least 3 characters)
    #[command(alias = "s")]
    Search {
        /// Search term; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },

    /// List previous searches
    #[command(alias = "h")]
    History {
        /// Show the results of entry N (as numbered in the list)
        #[arg(long, short)]
        select: Option<usize>,
    },

    /// Show a stored search by its identifier
    Show {
        /// Search identifier
        id: i64,
    },

    /// Interactive session: search, browse history, select entries
    #[command(alias = "i")]
    Interactive,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the default configuration file location
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(Some(path))
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => load_config(find_config_file().as_deref())
            .context("failed to load configuration")?,
    };
    apply_overrides(&mut config, &cli);

    init_logging(&cli, &config);
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    match cli.command {
        Commands::Search { term } => run_search(&config, &term.join(" ")).await,
        Commands::History { select } => run_history(&config, select).await,
        Commands::Show { id } => run_show(&config, id).await,
        Commands::Interactive => run_interactive(&config).await,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "academic-search",
                &mut std::io::stdout(),
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { command } => run_config(&config, cli.config, command),
    }
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = Some(timeout);
    }
    if let Some(output) = cli.output {
        config.display.output = output;
    }
}

/// Initialize tracing; `RUST_LOG` takes precedence over flags and config
fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("academic_search={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_api(config: &Config) -> Result<Arc<dyn SearchApi>> {
    let api = HttpSearchApi::new(
        &config.api.base_url,
        config.api.timeout_secs.map(Duration::from_secs),
    )
    .with_context(|| format!("invalid API address {}", config.api.base_url))?;
    Ok(Arc::new(api))
}

fn spinner(format: OutputFormat, msg: &str) -> Spinner {
    if format == OutputFormat::Table && is_terminal() {
        Spinner::new(msg)
    } else {
        Spinner::hidden()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run_search(config: &Config, term: &str) -> Result<ExitCode> {
    let format = ui::resolve_format(config.display.output);
    let plain = format == OutputFormat::Plain;
    let page = HomePage::new(build_api(config)?);

    let progress = spinner(format, &format!("Searching for \"{}\"...", term.trim()));
    let outcome = page.submit(term).await;
    progress.finish();

    let ok = matches!(outcome, SubmitOutcome::Completed);
    match (format, page.current()) {
        (OutputFormat::Json, Some(result)) if ok => print_json(&result)?,
        (OutputFormat::Json, _) => ui::print_form(&page.form().state(), true),
        _ => ui::print_home(&page.render(), plain),
    }

    Ok(exit_code(ok))
}

async fn run_history(config: &Config, select: Option<usize>) -> Result<ExitCode> {
    let format = ui::resolve_format(config.display.output);
    let plain = format == OutputFormat::Plain;
    let page = HistoryPage::new(build_api(config)?);

    let progress = spinner(format, "Loading search history...");
    page.mount().await;
    progress.finish();

    let render = page.render();
    if let HistoryRender::Error(message) = &render.history {
        if format == OutputFormat::Json {
            eprintln!("{}", ui::status_line(ui::Status::Error, message, true));
        } else {
            ui::print_history(&render.history, plain);
        }
        return Ok(ExitCode::FAILURE);
    }

    if let Some(n) = select {
        // entries are numbered from 1 on screen
        if n == 0 || !page.select(n - 1) {
            bail!("no history entry #{}", n);
        }
    }

    match format {
        OutputFormat::Json => match page.selected() {
            Some(result) => print_json(&result)?,
            None => print_json(&page.history().entries().unwrap_or_default())?,
        },
        _ => ui::print_history_page(&page.render(), plain),
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_show(config: &Config, id: i64) -> Result<ExitCode> {
    let format = ui::resolve_format(config.display.output);
    let view = ResultView::new(ResultSource::ByIdentifier(id), build_api(config)?);

    let progress = spinner(format, &format!("Loading search #{}...", id));
    view.mount().await;
    progress.finish();

    let render = view.render();
    let ok = !matches!(render, ResultRender::Error(_));
    match (format, view.result()) {
        (OutputFormat::Json, Some(result)) => print_json(&result)?,
        (OutputFormat::Json, None) => {
            if let ResultRender::Error(message) = &render {
                eprintln!("{}", ui::status_line(ui::Status::Error, message, true));
            }
        }
        _ => ui::print_result(&render, format == OutputFormat::Plain),
    }

    Ok(exit_code(ok))
}

/// Which page the interactive session is on
enum Screen {
    Home,
    History(HistoryPage),
}

const INTERACTIVE_HELP: &str = "\
Type a search term to run a search, or one of:
  /history     list previous searches
  /select N    show history entry N
  /retry       reload the history after an error
  /home        back to searching
  /help        show this help
  /quit        leave";

async fn run_interactive(config: &Config) -> Result<ExitCode> {
    let format = match ui::resolve_format(config.display.output) {
        OutputFormat::Json => OutputFormat::Plain,
        other => other,
    };
    let plain = format == OutputFormat::Plain;
    let api = build_api(config)?;
    let home = HomePage::new(api.clone());
    let mut screen = Screen::Home;

    println!("{}", INTERACTIVE_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let prompt = match screen {
            Screen::Home => "search> ",
            Screen::History(_) => "history> ",
        };
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", INTERACTIVE_HELP),
            "/home" => {
                leave(&mut screen);
                ui::print_home(&home.render(), plain);
            }
            "/history" => {
                leave(&mut screen);
                let page = HistoryPage::new(api.clone());
                let progress = spinner(format, "Loading search history...");
                page.mount().await;
                progress.finish();
                ui::print_history_page(&page.render(), plain);
                screen = Screen::History(page);
            }
            "/retry" => match &screen {
                Screen::History(page) => {
                    page.retry().await;
                    ui::print_history_page(&page.render(), plain);
                }
                Screen::Home => println!("Nothing to retry; use /history first."),
            },
            "/select" => match (&screen, arg.parse::<usize>()) {
                (Screen::History(page), Ok(n)) if n > 0 && page.select(n - 1) => {
                    if let Some(result) = &page.render().result {
                        ui::print_result(result, plain);
                    }
                }
                (Screen::History(_), _) => println!("No history entry \"{}\".", arg),
                (Screen::Home, _) => println!("Use /history first."),
            },
            _ if command.starts_with('/') => {
                println!("Unknown command {}; type /help.", command)
            }
            _ => {
                leave(&mut screen);
                let progress = spinner(format, &format!("Searching for \"{}\"...", line));
                home.submit(line).await;
                progress.finish();
                ui::print_home(&home.render(), plain);
            }
        }
    }

    leave(&mut screen);
    home.unmount();
    Ok(ExitCode::SUCCESS)
}

/// Navigate back to the home screen, unmounting the history page
fn leave(screen: &mut Screen) {
    if let Screen::History(page) = std::mem::replace(screen, Screen::Home) {
        page.unmount();
    }
}

fn run_config(
    config: &Config,
    explicit_path: Option<PathBuf>,
    command: ConfigCommands,
) -> Result<ExitCode> {
    match command {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Init { force } => {
            let path = explicit_path
                .or_else(default_config_path)
                .context("no configuration directory available")?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommands::Path => match default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("no configuration directory available"),
        },
    }

    Ok(ExitCode::SUCCESS)
}
