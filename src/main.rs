use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotiview::{cli, config, error, spotify::discovery::Mood, types::TimeRange};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
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
    /// Log in with Spotify
    Auth(AuthOptions),

    /// Forget the stored access token
    Logout,

    /// List playlists or the tracks of one playlist
    Playlists(PlaylistsOptions),

    /// Show recently played tracks
    Recent,

    /// Show top tracks, artists, albums and genres
    Stats(StatsOptions),

    /// Get recommendations for a mood
    Discover(DiscoverOptions),

    /// Add a track to a playlist
    Add(AddOptions),

    /// Play preview clips
    Preview(PreviewOptions),

    /// Run the token exchange backend for the code flow
    ServeExchange,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Process a redirect URL copied from the browser instead of waiting for it
    #[clap(long)]
    pub redirect: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Show the tracks of this playlist
    #[clap(long)]
    pub id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    /// Time window of the statistics
    #[clap(long, value_enum, default_value_t = TimeRange::ShortTerm)]
    pub time_range: TimeRange,
}

#[derive(Parser, Debug, Clone)]
pub struct DiscoverOptions {
    /// Mood the recommendations should match
    #[clap(long, value_enum, default_value_t = Mood::Happy)]
    pub mood: Mood,
}

#[derive(Parser, Debug, Clone)]
pub struct AddOptions {
    /// Target playlist id
    #[clap(long)]
    pub playlist: String,

    /// Track URI, e.g. spotify:track:4uLU6hMCjMI75M1A2tKUQC
    #[clap(long)]
    pub track: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewOptions {
    /// Preview the tracks of this playlist instead of your top tracks
    #[clap(long)]
    pub playlist: Option<String>,

    /// Time window of the top tracks
    #[clap(long, value_enum, default_value_t = TimeRange::ShortTerm)]
    pub time_range: TimeRange,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.redirect).await,
        Command::Logout => cli::logout().await,
        Command::Playlists(opt) => cli::playlists(opt.id).await,
        Command::Recent => cli::recent().await,
        Command::Stats(opt) => cli::stats(opt.time_range).await,
        Command::Discover(opt) => cli::discover(opt.mood).await,
        Command::Add(opt) => cli::add(opt.playlist, opt.track).await,
        Command::Preview(opt) => cli::preview(opt.playlist, opt.time_range).await,
        Command::ServeExchange => cli::serve_exchange().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
