//! On-disk layout of downloaded banners.
//!
//! There is no index: a banner is cached if and only if its derived path
//! exists. Nothing is ever evicted.

use std::io;
use std::path::{Path, PathBuf};

use fs_err as fs;

pub const DEFAULT_CACHE_DIR: &str = "assets/cache";

/// Where users drop hand-picked banners, named by [`banner_key`].
pub const DEFAULT_BANNER_DIR: &str = "assets/banners";

const LOCAL_BANNER_EXTENSIONS: &[&str] = &["jpg", "png"];

#[derive(Debug, Clone)]
pub struct BannerCache {
    dir: PathBuf,
}

impl BannerCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, game_id: u64) -> PathBuf {
        self.dir.join(format!("{}_hero.jpg", game_id))
    }

    pub fn cached(&self, game_id: u64) -> Option<PathBuf> {
        let path = self.path_for(game_id);

        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// Writes the payload as-is, replacing whatever was cached for this game
    /// before. The cache directory is created on demand.
    pub fn store(&self, game_id: u64, contents: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(game_id);
        fs::write(&path, contents)?;

        Ok(path)
    }
}

impl Default for BannerCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

/// Lower-cases a game name and strips everything that isn't an ASCII letter
/// or digit, e.g. `"Baldur's Gate 3"` becomes `"baldursgate3"`.
pub fn banner_key(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Looks for a hand-picked banner named after the game, preferring `.jpg`.
pub fn find_local_banner(banner_dir: &Path, game_name: &str) -> Option<PathBuf> {
    let key = banner_key(game_name);
    if key.is_empty() {
        return None;
    }

    LOCAL_BANNER_EXTENSIONS
        .iter()
        .map(|extension| banner_dir.join(format!("{}.{}", key, extension)))
        .find(|path| path.is_file())
}
