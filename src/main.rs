use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio_util::sync::CancellationToken;

use genrify::{cli, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create or update a playlist with liked songs of one genre
    Sync(SyncOptions),

    /// Show the most common genres in your liked songs
    Genres(GenresOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Seconds to wait for the browser login to complete
    #[clap(long = "timeout", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Only print the login URL, do not open a browser
    #[clap(long)]
    pub no_browser: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Genre to match against the first artist of each track (exact match)
    #[clap(long, default_value = "shoegaze")]
    pub genre: String,

    /// Playlist name [default: "<genre> playlist"]
    #[clap(long)]
    pub name: Option<String>,

    /// Do not append tracks that are already in the playlist
    #[clap(long)]
    pub skip_existing: bool,

    #[clap(flatten)]
    pub login: LoginOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct GenresOptions {
    /// Number of genres to show
    #[clap(long, default_value_t = 20)]
    pub top: usize,

    #[clap(flatten)]
    pub login: LoginOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let run = async {
        match cli.command {
            Command::Sync(opt) => {
                cli::sync(
                    opt.genre,
                    opt.name,
                    opt.skip_existing,
                    opt.login.timeout_secs,
                    !opt.login.no_browser,
                    cancel.clone(),
                )
                .await
            }
            Command::Genres(opt) => {
                cli::genres(
                    opt.top,
                    opt.login.timeout_secs,
                    !opt.login.no_browser,
                    cancel.clone(),
                )
                .await
            }
            Command::Completions(opt) => {
                let mut cmd = Cli::command();
                let name = cmd.get_name().to_string();
                generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
            }
        }
    };

    tokio::select! {
        _ = run => {}
        _ = cancel.cancelled() => error!("Interrupted."),
    }
}
