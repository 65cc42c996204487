use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlproxy::{cli, config, logging, warning};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP backend (default)
    Serve,

    /// Print an authorization URL for the configured service
    AuthUrl(AuthUrlOptions),

    /// Show the profile of the token's user
    Profile(TokenOptions),

    /// List the user's playlists
    Playlists(PageOptions),

    /// List the user's liked tracks
    Liked(PageOptions),

    /// List the tracks of a playlist
    Tracks(TracksOptions),

    /// Show an artist
    Artist(ArtistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthUrlOptions {
    /// Open the URL in the default browser
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    /// Access token of the user
    #[clap(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    token: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PageOptions {
    #[clap(flatten)]
    auth: TokenOptions,

    /// Page size
    #[clap(long, default_value_t = 50)]
    limit: u32,

    /// Index of the first item
    #[clap(long, default_value_t = 0)]
    offset: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Playlist id
    playlist_id: String,

    #[clap(flatten)]
    page: PageOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Artist id
    artist_id: String,

    #[clap(flatten)]
    auth: TokenOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let env_result = config::load_env().await;

    let cli = Cli::parse();

    if matches!(cli.command, None | Some(Command::Serve)) {
        logging::init();
    }

    if let Err(e) = env_result {
        warning!("Cannot load environment file. Err: {}", e);
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve().await,
        Command::AuthUrl(opt) => cli::auth_url(opt.open).await,
        Command::Profile(opt) => cli::profile(opt.token).await,
        Command::Playlists(opt) => cli::playlists(opt.auth.token, opt.limit, opt.offset).await,
        Command::Liked(opt) => cli::liked(opt.auth.token, opt.limit, opt.offset).await,
        Command::Tracks(opt) => {
            cli::tracks(
                opt.page.auth.token,
                opt.playlist_id,
                opt.page.limit,
                opt.page.offset,
            )
            .await
        }
        Command::Artist(opt) => cli::artist(opt.auth.token, opt.artist_id).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
