use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use storefront_api::{CollectorSink, HttpSearchApi};
use storefront_core::analytics::{Analytics, TracingSink};
use storefront_core::config::StorefrontConfig;
use storefront_core::theme::FileThemeStore;
use storefront_engine::{DetailState, KeyOutcome, ResultsState, SearchBoxState, Session};

mod commands;
mod logging;
mod render;

use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Interactive product search against the catalog API")]
struct Cli {
    /// Extra TOML file layered over config.toml and config.<env>.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides api.base_url
    #[arg(long, env = "STOREFRONT_BASE_URL")]
    base_url: Option<String>,
    /// Start with hybrid search enabled
    #[arg(long)]
    hybrid: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<StorefrontConfig> {
    let mut config = match &cli.config {
        Some(path) => StorefrontConfig::load_from(path),
        None => StorefrontConfig::load(),
    }
    .map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn analytics_for(config: &StorefrontConfig) -> anyhow::Result<Analytics> {
    if config.analytics.enabled {
        let sink = CollectorSink::new(&config.analytics).context("analytics collector")?;
        return Ok(Analytics::new(Arc::new(sink)));
    }
    Ok(Analytics::new(Arc::new(TracingSink::new(config.analytics.context()))))
}

/// Blocks until the current refresh settles, with a spinner while it runs.
async fn wait_for_results(rx: &mut watch::Receiver<ResultsState>) -> anyhow::Result<()> {
    if !rx.borrow_and_update().loading {
        return Ok(());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Searching...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let settled = rx.wait_for(|r| !r.loading).await.map(|_| ());
    spinner.finish_and_clear();
    settled.context("results channel closed")
}

async fn wait_for_suggestions(rx: &mut watch::Receiver<SearchBoxState>, limit: Duration) {
    if tokio::time::timeout(limit, rx.wait_for(SearchBoxState::is_settled)).await.is_err() {
        tracing::debug!("suggestions still pending after {limit:?}");
    }
}

async fn wait_for_detail(rx: &mut watch::Receiver<DetailState>) -> anyhow::Result<()> {
    rx.wait_for(|d| !d.loading).await.map(|_| ()).context("detail channel closed")
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "search> ")?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = load_config(&cli)?;
    tracing::debug!(base_url = %config.api.base_url, "starting session");

    let api = Arc::new(HttpSearchApi::new(&config.api)?);
    let store = Arc::new(FileThemeStore::new(config.ui.theme_path()));
    let mut session = Session::new(api, &config).with_analytics(analytics_for(&config)?).with_theme_store(store);
    let mut watch = session.watch();
    let suggest_wait = config.suggest.debounce() + config.api.timeout();

    session.mount();
    if cli.hybrid {
        session.set_hybrid(true);
    }
    wait_for_results(&mut watch.results).await?;
    print!("{}", render::screen(&session.snapshot()));
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", commands::HELP),
            Command::Redraw => print!("{}", render::screen(&session.snapshot())),
            Command::Submit(text) => {
                session.input(&text);
                let outcome = session.press_search();
                show_outcome(&session, &mut watch.results, &outcome).await?;
            }
            Command::Type(text) => {
                session.focus();
                session.input(&text);
                wait_for_suggestions(&mut watch.search_box, suggest_wait).await;
                print_suggestions(&session);
            }
            Command::Key(key) => {
                let outcome = session.key(key);
                show_outcome(&session, &mut watch.results, &outcome).await?;
            }
            Command::Pick(n) => {
                let outcome = session.select(n - 1);
                if outcome.submit.is_none() {
                    eprintln!("No suggestion {n}");
                }
                show_outcome(&session, &mut watch.results, &outcome).await?;
            }
            Command::Facets => print!("{}", render::facets(&session.snapshot())),
            Command::Toggle { group, value } => {
                session.toggle_facet(group, &value);
                wait_for_results(&mut watch.results).await?;
                let vm = session.snapshot();
                print!("{}\n{}", render::facets(&vm), render::screen(&vm));
            }
            Command::Clear => {
                session.clear_facets();
                wait_for_results(&mut watch.results).await?;
                print!("{}", render::screen(&session.snapshot()));
            }
            Command::Hybrid => {
                let hybrid = !session.snapshot().hybrid;
                session.set_hybrid(hybrid);
                wait_for_results(&mut watch.results).await?;
                print!("{}", render::screen(&session.snapshot()));
            }
            Command::Open(reference) => {
                let Some(id) = session.snapshot().resolve_product(&reference).map(|p| p.id.clone()) else {
                    eprintln!("No product '{reference}' in the current results");
                    continue;
                };
                session.activate_result(&id);
                wait_for_detail(&mut watch.detail).await?;
                print!("{}", render::detail(&session.snapshot()));
            }
            Command::Close => {
                session.close_detail();
                print!("{}", render::screen(&session.snapshot()));
            }
            Command::Theme => println!("theme: {}", session.toggle_theme()),
        }
    }

    session.shutdown();
    Ok(())
}

async fn show_outcome(
    session: &Session,
    results: &mut watch::Receiver<ResultsState>,
    outcome: &KeyOutcome,
) -> anyhow::Result<()> {
    if outcome.submit.is_some() {
        wait_for_results(results).await?;
        print!("{}", render::screen(&session.snapshot()));
    } else {
        print_suggestions(session);
    }
    Ok(())
}

fn print_suggestions(session: &Session) {
    let vm = session.snapshot();
    let panel = render::suggestions(&vm);
    if panel.is_empty() {
        println!("(no suggestions for '{}')", vm.buffer);
    } else {
        print!("{panel}");
    }
}
