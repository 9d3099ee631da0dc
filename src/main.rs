use anyhow::Context;
use chrono::Local;
use clap::Parser;
use event_toolbox::config::Command;
use event_toolbox::core::{ConfigProvider, NameGenerator, RosterStore};
use event_toolbox::utils::error::ErrorSeverity;
use event_toolbox::utils::{logger, validation::Validate};
use event_toolbox::{
    CliConfig, DrawEngine, DrawMode, FileRosterStore, GeminiNameGenerator, LocalStorage, Toolbox,
    ToolboxConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tokio::io::{AsyncRead, AsyncReadExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting event-toolbox");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(config.data_dir());
    let store = FileRosterStore::new(storage.clone(), config.roster_key());
    let generator = GeminiNameGenerator::new(config.gemini_settings())
        .context("failed to build the name generator HTTP client")?;
    if !generator.is_configured() {
        tracing::debug!("Name generator has no API key, groups get default names");
    }
    let engine = DrawEngine::new(
        DrawMode::from_allow_repeat(config.allow_repeat()),
        config.reveal_timing(),
    );

    let mut toolbox = Toolbox::open(store, generator, engine).await;

    if let Err(e) = run(cli.command, &config, &storage, &mut toolbox).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}

async fn run<S, G>(
    command: Command,
    config: &ToolboxConfig,
    storage: &LocalStorage,
    toolbox: &mut Toolbox<S, G>,
) -> event_toolbox::Result<()>
where
    S: RosterStore,
    G: NameGenerator,
{
    match command {
        Command::Import { text, file } => {
            let added = match (text, file) {
                (_, Some(path)) => {
                    let content = tokio::fs::read_to_string(&path).await?;
                    toolbox.import_file(&content).await?
                }
                (Some(text), None) => toolbox.import_text(&text).await?,
                (None, None) => {
                    let text = read_all(tokio::io::stdin()).await?;
                    toolbox.import_text(&text).await?
                }
            };
            println!(
                "✅ Imported {} participants ({} total)",
                added,
                toolbox.roster().len()
            );
        }
        Command::List => {
            for p in toolbox.participants() {
                println!("{}  {}", p.id, p.name);
            }
            println!("{} participants", toolbox.roster().len());
            let duplicates = toolbox.roster().duplicate_count();
            if duplicates > 0 {
                println!("⚠️ {} participants have duplicate names", duplicates);
            }
        }
        Command::Dedupe => {
            let dropped = toolbox.dedupe().await?;
            println!("Removed {} duplicate entries", dropped);
        }
        Command::Remove { id } => match toolbox.remove(&id).await? {
            Some(p) => println!("Removed {}", p.name),
            None => println!("No participant with id {}", id),
        },
        Command::Clear => {
            toolbox.clear().await?;
            println!("Roster cleared");
        }
        Command::Draw { count, instant, .. } => {
            let mut rng = StdRng::from_entropy();
            for round in 1..=count {
                let winner = if instant {
                    toolbox.draw_now(&mut rng)?
                } else {
                    let reveal = toolbox.draw(&mut rng, |frame| {
                        print!("\r🎰 {:<40}", frame.display_name);
                        let _ = std::io::stdout().flush();
                    });
                    tokio::select! {
                        result = reveal => result?,
                        _ = tokio::signal::ctrl_c() => {
                            println!("\nDraw cancelled");
                            return Ok(());
                        }
                    }
                };
                println!("\r🏆 Round {}: {:<40}", round, winner.name);
            }

            println!("\nWinners (most recent first):");
            let history = toolbox.draw_engine().history();
            for (idx, w) in history.iter().enumerate() {
                println!(
                    "{:>3}. {}  {}",
                    history.len() - idx,
                    w.name,
                    w.timestamp.with_timezone(&Local).format("%H:%M")
                );
            }
        }
        Command::Group { csv, .. } => {
            let mut rng = StdRng::from_entropy();
            toolbox.form_groups(config.group_size(), &mut rng).await?;
            println!("{}", toolbox.groups_clipboard_text());

            if csv {
                let file_name = toolbox
                    .export_groups(storage, Local::now().date_naive())
                    .await?;
                println!(
                    "\n📁 Saved {}",
                    storage.base_path().join(file_name).display()
                );
            }
        }
    }

    Ok(())
}
