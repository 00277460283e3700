use football_api::Match;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FAVORITES_FILE: &str = "favorites.json";

/// Favourite match and team ids, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub matches: Vec<u64>,
    #[serde(default)]
    pub teams: Vec<u64>,
}

impl Favorites {
    /// Returns whether the match is a favourite afterwards.
    pub fn toggle_match(&mut self, id: u64) -> bool {
        toggle(&mut self.matches, id)
    }

    pub fn toggle_team(&mut self, id: u64) -> bool {
        toggle(&mut self.teams, id)
    }

    pub fn is_favorite_match(&self, id: u64) -> bool {
        self.matches.contains(&id)
    }

    pub fn is_favorite_team(&self, id: u64) -> bool {
        self.teams.contains(&id)
    }

    /// A match counts as a favourite when it or either of its teams is one.
    pub fn includes(&self, m: &Match) -> bool {
        self.is_favorite_match(m.id)
            || self.is_favorite_team(m.home_team.id)
            || self.is_favorite_team(m.away_team.id)
    }
}

fn toggle(ids: &mut Vec<u64>, id: u64) -> bool {
    if let Some(pos) = ids.iter().position(|&x| x == id) {
        ids.remove(pos);
        false
    } else {
        ids.push(id);
        true
    }
}

/// Favorites backed by a JSON file. Every toggle is written through.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Favorites,
}

impl FavoritesStore {
    pub fn load() -> Self {
        Self::at(favorites_path())
    }

    /// Missing or unreadable files start empty.
    pub fn at(path: PathBuf) -> Self {
        let favorites = match read_favorites(&path) {
            Ok(favorites) => favorites,
            Err(e) => {
                debug!("no favorites loaded from {}: {e}", path.display());
                Favorites::default()
            }
        };
        Self { path, favorites }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn toggle_match(&mut self, id: u64) -> bool {
        let now = self.favorites.toggle_match(id);
        self.persist();
        now
    }

    pub fn toggle_team(&mut self, id: u64) -> bool {
        let now = self.favorites.toggle_team(id);
        self.persist();
        now
    }

    pub fn save(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(&self.favorites)
            .map_err(|e| format!("serialize favorites failed: {e}"))?;
        std::fs::write(&self.path, payload).map_err(|e| format!("write favorites failed: {e}"))
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("{}: {e}", self.path.display());
        }
    }
}

fn read_favorites(path: &Path) -> Result<Favorites, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("read favorites failed: {e}"))?;
    serde_json::from_str(&content).map_err(|e| {
        warn!("ignoring malformed favorites file {}: {e}", path.display());
        format!("parse favorites failed: {e}")
    })
}

/// `$XDG_CONFIG_HOME/kickoff/favorites.json`, then `~/.config/kickoff/...`,
/// then the working directory.
pub fn favorites_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("kickoff").join(FAVORITES_FILE);
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("kickoff")
            .join(FAVORITES_FILE);
    }
    PathBuf::from(FAVORITES_FILE)
}
