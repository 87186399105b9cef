use bus_route::{
    AppConfig, Catalog, Controller, FileStore, HistoryStore, RouteOrchestrator,
    SuggestionProvider, UserCommand,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_matches(&AppConfig::command().get_matches());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    let provider = match config.build_provider() {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Set it with: export GEMINI_API_KEY=your_api_key");
            eprintln!("   Or use --mock to use the mock provider");
            return Err(e.into());
        }
    };
    info!("Using provider {}", provider.provider_name());

    let history = HistoryStore::open(Box::new(FileStore::new(&config.history_dir)));
    let mut controller = Controller::new(
        RouteOrchestrator::new(provider),
        history,
        Catalog::builtin()?,
        config.language,
    );

    if let Some((from, to)) = &config.one_shot {
        controller.submit(from, to).await;
        print!("{}", controller.screen());
        return Ok(());
    }

    run_session(&mut controller).await
}

/// Interactive loop: read a command, apply it, re-render
async fn run_session(controller: &mut Controller) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", controller.screen());
    print_help(controller);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let show_loading = |c: &Controller| print!("\n{}", c.screen());

        match UserCommand::parse(&line) {
            UserCommand::Quit => break,
            UserCommand::Nothing => {
                prompt()?;
                continue;
            }
            UserCommand::Help => print_help(controller),
            UserCommand::Unknown(text) => {
                println!(
                    "{}",
                    controller
                        .catalog()
                        .localize(controller.language(), "unknown-command", &[text])
                );
            }
            UserCommand::Search { from, to } => {
                controller.submit_with(&from, &to, show_loading).await;
            }
            UserCommand::SetFrom(from) => controller.set_from(&from),
            UserCommand::SetTo(to) => controller.set_to(&to),
            UserCommand::SubmitForm => {
                let (from, to) = (controller.from().to_string(), controller.to().to_string());
                controller.submit_with(&from, &to, show_loading).await;
            }
            UserCommand::ToggleBus(index) => controller.toggle_bus_row(index),
            UserCommand::SelectHistory(index) => {
                controller
                    .select_history_entry_with(index, show_loading)
                    .await;
            }
            UserCommand::ToggleLanguage => controller.toggle_language(),
        }

        print!("\n{}", controller.screen());
        prompt()?;
    }
    Ok(())
}

fn print_help(controller: &Controller) {
    println!("\n{}", controller.label("help-title"));
    for key in [
        "help-search",
        "help-fields",
        "help-bus",
        "help-history",
        "help-lang",
        "help-quit",
    ] {
        println!("  {}", controller.label(key));
    }
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
