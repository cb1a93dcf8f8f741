use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use crate::{
    cache::{find_local_banner, BannerCache, DEFAULT_BANNER_DIR, DEFAULT_CACHE_DIR},
    options::Global,
};

#[derive(Debug, Args)]
pub struct LocateOptions {
    /// The name of the game, used to find hand-picked banners.
    pub name: String,

    /// The SteamGridDB game ID, used to find downloaded banners.
    #[clap(long)]
    pub id: Option<u64>,

    /// The directory downloaded banners are saved into.
    #[clap(long = "cache-dir", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// The directory holding hand-picked banners named after each game.
    #[clap(long = "banner-dir", default_value = DEFAULT_BANNER_DIR)]
    pub banner_dir: PathBuf,
}

pub fn locate(_: Global, options: LocateOptions) -> Result<()> {
    let cache = BannerCache::new(&options.cache_dir);

    match locate_banner(&cache, &options.banner_dir, &options.name, options.id) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("no banner cached for {:?}", options.name),
    }
}

/// Downloaded banners take priority over hand-picked ones.
fn locate_banner(
    cache: &BannerCache,
    banner_dir: &Path,
    name: &str,
    id: Option<u64>,
) -> Option<PathBuf> {
    id.and_then(|id| cache.cached(id))
        .or_else(|| find_local_banner(banner_dir, name))
}
