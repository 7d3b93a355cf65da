use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use knowledge_finder::app::{App, AppSettings, Collaborators};
use knowledge_finder::config;
use knowledge_finder::presenter::TerminalPresenter;
use knowledge_finder::remote::{ApiClient, HttpDataSource, HttpInsightProvider};
use knowledge_finder::storage::FileStore;

mod console;

use console::Command;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with results on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_finder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        "knowledge-finder {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );

    // Load configuration / 설정 로드
    let app_config = config::load_config().map_err(anyhow::Error::msg)?;
    tracing::info!("Remote service: {}", app_config.remote.base_url);

    let storage = FileStore::open(app_config.get_data_dir())
        .context("Failed to open local data directory")?;
    let api = ApiClient::new(&app_config.remote).context("Failed to create HTTP client")?;

    let mut app = App::new(
        Collaborators {
            source: Box::new(HttpDataSource::new(api.clone())),
            insight: Box::new(HttpInsightProvider::new(api)),
            storage: Box::new(storage),
            presenter: Box::new(TerminalPresenter::stdout(app_config.search.preview_chars)),
        },
        AppSettings::from(&app_config),
    );

    // A failed initial fetch is already reported; keep running on the backup
    if let Err(e) = app.start().await {
        tracing::debug!("Initial load failed: {}", e);
    }
    println!("{}", console::HELP);
    println!("Mode: {}", app.mode());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match console::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(e) = run(&mut app, command).await {
            // already shown to the user by the presenter
            tracing::debug!("Command failed: {}", e);
        }
    }

    tracing::info!("Bye");
    Ok(())
}

async fn run(app: &mut App, command: Command) -> knowledge_finder::Result<()> {
    match command {
        Command::Search(query) => {
            let mode = app.mode();
            app.search(&query, mode);
        }
        Command::Clear => app.clear_search(),
        Command::Mode(mode) => {
            app.set_mode(mode);
            println!("Mode: {}", mode);
        }
        Command::Show(key) => {
            app.detail(&key);
        }
        Command::Add { question, answer } => app.add(&question, &answer).await?,
        Command::Edit { key, question, answer } => {
            app.edit(&key, &question, &answer).await?;
        }
        Command::Delete(key) => {
            app.delete(&key).await?;
        }
        Command::Ask => {
            app.ask_ai().await?;
        }
        Command::Recent => app.show_recent_keywords(),
        Command::Refresh => {
            app.refresh().await?;
        }
        Command::Save => app.save().await?,
        Command::Help => println!("{}", console::HELP),
        Command::Quit => {}
    }
    Ok(())
}
