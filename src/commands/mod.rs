mod fetch;
mod locate;
mod search;

use clap::Subcommand;
pub use fetch::*;
pub use locate::*;
pub use search::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find a game on SteamGridDB, download its banner into the cache and
    /// print where it was saved.
    Fetch(FetchOptions),

    /// List SteamGridDB search results for a game name, marking the one
    /// `fetch` would use.
    Search(SearchOptions),

    /// Print the path of a banner already on disk for a game. This command
    /// never touches the network.
    Locate(LocateOptions),
}
