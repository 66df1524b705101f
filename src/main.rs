use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use nowplaying_pkce::{
    App, AppState, ClientConfig, MemoryStore, NoticeBoard, NowPlaying, PageLoad, PlaybackAction,
    Role,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Role to request at login (`viewer` or `manager`).
    #[arg(long, default_value = "viewer")]
    role: Role,
    /// Print the authorization URL instead of opening a browser.
    #[arg(long)]
    no_browser: bool,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let mut app = App::new(config, Arc::new(MemoryStore::new()));
    let mut notices = NoticeBoard::default();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut last = NowPlaying::Nothing;

    login(&mut app, &mut notices, &mut input, cli.role, cli.no_browser).await?;
    if app.state() != AppState::LoggedOut {
        refresh(&mut app, &mut notices, &mut last).await;
    }

    loop {
        prompt(&app, &mut notices);
        let Some(line) = input.next_line().await? else {
            return Ok(());
        };
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "quit" | "exit" => return Ok(()),
            "help" => print_help(),
            "login" => {
                let role = match words.next().map(str::parse::<Role>) {
                    Some(Ok(role)) => role,
                    Some(Err(e)) => {
                        println!("{e}");
                        continue;
                    }
                    None => cli.role,
                };
                login(&mut app, &mut notices, &mut input, role, cli.no_browser).await?;
                if app.state() != AppState::LoggedOut {
                    refresh(&mut app, &mut notices, &mut last).await;
                }
            }
            "logout" => {
                let url = app.logout();
                last = NowPlaying::Nothing;
                navigate(&url, cli.no_browser);
            }
            "refresh" => refresh(&mut app, &mut notices, &mut last).await,
            other => {
                let action = if other == "toggle" {
                    Ok(PlaybackAction::toggle(last.is_playing()))
                } else {
                    other.parse::<PlaybackAction>()
                };
                match action {
                    Ok(_) if !app.controls_enabled() => {
                        println!("Playback controls are only available to managers.");
                    }
                    Ok(action) => match app.control(action).await {
                        Ok(now) => show(now, &mut last),
                        Err(e) => {
                            println!("! {e}");
                            notices.show(&e);
                        }
                    },
                    Err(_) => println!("Unknown command `{other}`, try `help`."),
                }
            }
        }
    }
}

async fn login(
    app: &mut App<MemoryStore>,
    notices: &mut NoticeBoard,
    input: &mut Input,
    role: Role,
    no_browser: bool,
) -> anyhow::Result<()> {
    let url = app.login(role);
    navigate(&url, no_browser);

    println!("Paste the URL you were redirected to:");
    let Some(line) = input.next_line().await? else {
        return Ok(());
    };
    let page: Url = match line.trim().parse() {
        Ok(page) => page,
        Err(e) => {
            println!("! Not a URL: {e}");
            return Ok(());
        }
    };

    match app.on_page_load(&page).await {
        Ok(PageLoad::SignedIn { role, .. }) => println!("Logged in as {role}."),
        Ok(PageLoad::Idle) => println!("That URL carries no authorization response."),
        Err(e) => {
            println!("! Authentication error: {e}");
            notices.show(&e);
        }
    }
    Ok(())
}

async fn refresh(app: &mut App<MemoryStore>, notices: &mut NoticeBoard, last: &mut NowPlaying) {
    match app.refresh().await {
        Ok(now) => show(now, last),
        Err(e) => {
            println!("! {e}");
            notices.show(&e);
        }
    }
}

fn show(now: NowPlaying, last: &mut NowPlaying) {
    match &now {
        NowPlaying::Nothing => println!("Nothing is playing right now."),
        NowPlaying::Track(track) => {
            println!("{track}");
            if let Some(cover) = &track.cover_url {
                println!("  cover: {cover}");
            }
        }
    }
    *last = now;
}

fn navigate(url: &Url, no_browser: bool) {
    println!("{url}");
    if no_browser {
        return;
    }
    if let Err(error) = webbrowser::open(url.as_str()) {
        tracing::warn!(%error, "Could not open browser, open the URL above manually");
    }
}

fn prompt(app: &App<MemoryStore>, notices: &mut NoticeBoard) {
    if let Some(notice) = notices.visible_at(Instant::now()) {
        println!("[{}]", notice.message());
    }
    match app.state() {
        AppState::LoggedOut => println!("(logged out) login [viewer|manager] | quit"),
        AppState::Authenticated(Role::Viewer) => println!("(viewer) refresh | logout | quit"),
        AppState::Authenticated(Role::Manager) => {
            println!("(manager) refresh | toggle | play | pause | next | previous | logout | quit");
        }
    }
}

fn print_help() {
    println!("login [viewer|manager]  start a Spotify login");
    println!("refresh                 show the current track");
    println!("toggle                  play/pause based on the last known state");
    println!("play | pause | next | previous");
    println!("logout                  end the session here and on Spotify");
    println!("quit");
}
