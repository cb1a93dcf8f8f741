use crate::commands::Command;
use crate::sgdb_api::{SgdbCredentials, DEFAULT_API_URL};
use clap::Parser;
use reqwest::Url;
use secrecy::SecretString;

#[derive(Debug, Parser)]
#[clap(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Options {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub struct Global {
    /// The SteamGridDB API key to use. If not specified, the key is read from
    /// the environment variable 'STEAMGRIDDB_API_KEY', which may also be set
    /// in a .env file in the working directory.
    #[clap(
        long,
        global(true),
        env("STEAMGRIDDB_API_KEY"),
        hide_env_values(true)
    )]
    pub api_key: Option<SecretString>,

    /// Base URL of the SteamGridDB API.
    #[clap(
        long,
        global(true),
        hide(true),
        default_value(DEFAULT_API_URL),
        value_parser(Url::parse)
    )]
    pub api_url: Url,

    /// Sets verbosity level. Can be specified multiple times to increase the verbosity
    /// of this program.
    #[clap(long = "verbose", short, global(true), action(clap::ArgAction::Count))]
    pub verbosity: u8,
}

impl Global {
    pub fn credentials(&self) -> SgdbCredentials {
        SgdbCredentials {
            api_key: self.api_key.clone(),
        }
    }
}
