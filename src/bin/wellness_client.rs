use std::io;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use wellness_app::command::parse_registration;
use wellness_app::config::resolve_server_url;
use wellness_app::models::ProfileSnapshot;
use wellness_app::runtime::run;
use wellness_app::ui::ConsoleView;
use wellness_app::{Command, HttpApi, Timing};

type StdinLines = Lines<BufReader<Stdin>>;

/// Asks for registration details until the server accepts them.
async fn register(
    api: &HttpApi,
    lines: &mut StdinLines,
) -> Result<ProfileSnapshot, Box<dyn std::error::Error>> {
    println!("No profile yet. Enter: <name> <age> <screen_time> <avatar_id>");
    while let Some(line) = lines.next_line().await? {
        let request = match parse_registration(&line) {
            Ok(request) => request,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        match api.register(&request).await {
            Ok(profile) => return Ok(profile),
            Err(err) if err.is_rejection() => warn!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
    Err("input closed before registering".into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let api = HttpApi::new(&resolve_server_url())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let profile = match api.profile().await {
        Ok(profile) => profile,
        Err(err) if err.is_not_logged_in() => register(&api, &mut lines).await?,
        Err(err) => return Err(err.into()),
    };
    info!(
        name = %profile.name,
        points = profile.points,
        server = %api.base_url(),
        "profile loaded"
    );

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" {
                break;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if command_tx.send(command).is_err() {
                        break;
                    }
                }
                Err(err) => warn!("{err}"),
            }
        }
    });

    let view = ConsoleView::new(io::stdout());
    let dashboard = run(api, view, Timing::from_env(), Some(&profile), command_rx).await;
    info!(points = dashboard.points(), "bye");

    Ok(())
}
