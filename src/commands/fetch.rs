use std::path::PathBuf;

use anyhow::Result;
use clap::{builder::NonEmptyStringValueParser, Args};

use crate::{
    cache::{BannerCache, DEFAULT_CACHE_DIR},
    options::Global,
    resolver::{BannerResolver, MatchStrategy, Resolution, ResolveError},
};

#[derive(Debug, Args)]
pub struct FetchOptions {
    /// The name of the game to look up.
    #[clap(value_parser(NonEmptyStringValueParser::new()))]
    pub name: String,

    /// The directory banners are saved into.
    #[clap(long = "cache-dir", default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// How to pick the game among the search results.
    #[clap(long = "match", value_enum, default_value_t)]
    pub strategy: MatchStrategy,

    /// Reuse a banner already cached for the matched game instead of
    /// downloading it again.
    #[clap(long)]
    pub skip_existing: bool,
}

pub fn fetch(global: Global, options: FetchOptions) -> Result<()> {
    let FetchOptions {
        name,
        cache_dir,
        strategy,
        skip_existing,
    } = options;

    let resolution = BannerResolver::connect(
        global.credentials(),
        global.api_url,
        BannerCache::new(cache_dir),
    )
    .and_then(|resolver| {
        resolver
            .with_selector(strategy)
            .skip_existing(skip_existing)
            .resolve(&name)
    })
    .map_err(with_stage)?;

    println!("{}", status_line(&resolution));

    Ok(())
}

fn status_line(resolution: &Resolution) -> String {
    if resolution.reused {
        format!("Image already cached at {}", resolution.path.display())
    } else {
        format!("Image downloaded and saved to {}", resolution.path.display())
    }
}

/// Names the stage the pipeline died in, so the logged error chain reads
/// `banner fetch failed while searching: ...`.
fn with_stage(err: ResolveError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("banner fetch failed while {}", stage))
}

#[cfg(test)]
mod tests {
    use super::*;

    use reqwest::Url;

    use crate::sgdb_api::{SgdbCredentials, DEFAULT_API_URL};

    #[test]
    fn status_line_distinguishes_reused_banners() {
        let downloaded = Resolution {
            path: PathBuf::from("assets/cache/5248_hero.jpg"),
            reused: false,
        };
        let reused = Resolution {
            reused: true,
            ..downloaded.clone()
        };

        assert_eq!(
            status_line(&downloaded),
            "Image downloaded and saved to assets/cache/5248_hero.jpg"
        );
        assert_eq!(
            status_line(&reused),
            "Image already cached at assets/cache/5248_hero.jpg"
        );
    }

    #[test]
    fn failure_names_the_stage() {
        let err = with_stage(ResolveError::NoCandidates { game_id: 5248 });

        assert_eq!(err.to_string(), "banner fetch failed while resolving image");
        assert_eq!(
            err.root_cause().to_string(),
            "game 5248 has no images to choose from"
        );
    }

    #[test]
    fn missing_credential_fails_while_unconfigured() {
        let err = BannerResolver::connect(
            SgdbCredentials { api_key: None },
            Url::parse(DEFAULT_API_URL).unwrap(),
            BannerCache::default(),
        )
        .map(|_| ())
        .map_err(with_stage)
        .unwrap_err();

        assert_eq!(err.to_string(), "banner fetch failed while unconfigured");
    }
}
