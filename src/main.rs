use clap::Parser;
use std::sync::Arc;
use steam_topsellers::application::commands::{Command, CommandContext};
use steam_topsellers::application::scheduler::ArmOutcome;
use steam_topsellers::cli::commands::{Cli, Commands};
use steam_topsellers::config::Settings;
use steam_topsellers::infrastructure::delivery::console::ConsoleSender;
use steam_topsellers::TopSellers;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let app = TopSellers::new(settings, Arc::new(ConsoleSender));

    let result = run_command(&app, cli.command).await;
    app.shutdown().await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(app: &TopSellers, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let operator = |origin: String| CommandContext {
        origin,
        is_admin: true,
    };

    match cmd {
        Commands::Report { count, json } => {
            let report = app.report(count).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.render());
            }
        }
        Commands::Subscribe { origin } => {
            let reply = app.dispatch(&operator(origin), Command::Subscribe).await;
            println!("{reply}");
        }
        Commands::Unsubscribe { origin } => {
            let reply = app.dispatch(&operator(origin), Command::Unsubscribe).await;
            println!("{reply}");
        }
        Commands::List => {
            let reply = app
                .dispatch(&operator(String::new()), Command::ListSubscriptions)
                .await;
            println!("{reply}");
        }
        Commands::Fanout => {
            let summary = app.run_fanout().await;
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Chat {
            text,
            origin,
            admin,
        } => {
            let ctx = CommandContext {
                origin,
                is_admin: admin,
            };
            match app.handle_message(&ctx, &text).await {
                Some(reply) => println!("{reply}"),
                None => return Err(format!("Unknown command: {text}").into()),
            }
        }
        Commands::Run => {
            match app.start_scheduler().await? {
                ArmOutcome::Armed(at) | ArmOutcome::AlreadyArmed(at) => {
                    println!("Daily report scheduled at {at} (local time). Press Ctrl-C to stop.");
                }
                ArmOutcome::InvalidTime => {
                    println!(
                        "remind_time {:?} is invalid, daily report is not scheduled.",
                        app.settings().remind_time
                    );
                    return Ok(());
                }
            }
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down");
        }
    }
    Ok(())
}
