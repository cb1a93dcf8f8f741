use anyhow::Result;
use clap::{builder::NonEmptyStringValueParser, Args};

use crate::{
    options::Global,
    resolver::{connect_api, list_games, MatchStrategy, SearchListing},
};

#[derive(Debug, Args)]
pub struct SearchOptions {
    /// The name of the game to look up.
    #[clap(value_parser(NonEmptyStringValueParser::new()))]
    pub name: String,

    /// How to pick the game among the search results.
    #[clap(long = "match", value_enum, default_value_t)]
    pub strategy: MatchStrategy,
}

pub fn search(global: Global, options: SearchOptions) -> Result<()> {
    let api = connect_api(global.credentials(), global.api_url)?;
    let listing = list_games(&api, &options.strategy, &options.name)?;

    for row in listing_rows(&listing) {
        println!("{}", row);
    }

    if listing.chosen.is_none() {
        log::warn!("none of the results matches {:?} with this --match strategy", options.name);
    }

    Ok(())
}

/// One line per result, `*` marking the game `fetch` would use.
fn listing_rows(listing: &SearchListing) -> Vec<String> {
    listing
        .results
        .iter()
        .enumerate()
        .map(|(index, game)| {
            let marker = if Some(index) == listing.chosen { "*" } else { " " };
            let verified = if game.verified { "" } else { " (unverified)" };
            format!("{} {}\t{}{}", marker, game.id, game.name, verified)
        })
        .collect()
}
