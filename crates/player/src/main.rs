//! Tres en raya player - terminal composition root binary.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tresenraya_player::ui::{render, OutputFormat, TerminalCommand, HELP};
use tresenraya_player::{create_connection, ClientConfig};

const PLAYER_NAME_VAR: &str = "TRESENRAYA_PLAYER_NAME";
const OUTPUT_VAR: &str = "TRESENRAYA_OUTPUT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tresenraya_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Tres en raya player");

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    let player_name = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(PLAYER_NAME_VAR).ok())
        .context("Player name required: pass it as the first argument or set TRESENRAYA_PLAYER_NAME")?;
    let format = OutputFormat::from_env_value(std::env::var(OUTPUT_VAR).ok().as_deref());

    tracing::info!(server_url = %config.server_url, "Using server");

    let connection = create_connection(&config);
    connection
        .event_bus
        .subscribe(move |notification| println!("{}", render(notification, format)))
        .await;

    let commands = connection.command_bus.clone();
    commands.connect(&player_name)?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let result = match line.parse::<TerminalCommand>() {
            Ok(TerminalCommand::Submit(intent)) => commands.submit(intent),
            Ok(TerminalCommand::Connect) => commands.connect(&player_name),
            Ok(TerminalCommand::Disconnect) => commands.disconnect(),
            Ok(TerminalCommand::Help) => {
                println!("{HELP}");
                Ok(())
            }
            Ok(TerminalCommand::Quit) => break,
            Err(e) => {
                println!("{e}");
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::error!("Failed to queue command: {}", e);
        }
    }

    connection.handle.shutdown();
    tracing::info!("Bye");
    Ok(())
}
