use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

const CHANGES_CAPACITY: usize = 16;

/// Titles the visitor marked, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    titles: Vec<String>,
}

impl Favorites {
    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    /// Returns whether `title` is a favorite afterwards
    pub fn toggle(&mut self, title: &str) -> bool {
        match self.titles.iter().position(|t| t == title) {
            Some(index) => {
                self.titles.remove(index);
                false
            }
            None => {
                self.titles.push(title.to_string());
                true
            }
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl FromIterator<String> for Favorites {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut favorites = Favorites::default();

        for title in iter {
            if !favorites.contains(&title) {
                favorites.titles.push(title);
            }
        }

        favorites
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesChanged {
    pub title: String,
    pub is_favorite: bool,
    pub favorites: Favorites,
}

/// Favorites mirrored to a JSON file, with change notifications for whoever else shows them
pub struct FavoritesStore {
    path: PathBuf,
    favorites: Favorites,
    changes: broadcast::Sender<FavoritesChanged>,
}

impl FavoritesStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let favorites = read_favorites(&path);
        let (changes, _) = broadcast::channel(CHANGES_CAPACITY);

        info!("Loaded {} favorites from '{}'", favorites.len(), path.display());

        Self {
            path,
            favorites,
            changes,
        }
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.contains(title)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesChanged> {
        self.changes.subscribe()
    }

    /// Flips `title`, persists and notifies subscribers.
    ///
    /// A failed write is logged; the in-memory state still changes.
    #[instrument(skip(self))]
    pub fn toggle(&mut self, title: &str) -> bool {
        let is_favorite = self.favorites.toggle(title);

        self.persist();

        let change = FavoritesChanged {
            title: title.to_string(),
            is_favorite,
            favorites: self.favorites.clone(),
        };

        if self.changes.send(change).is_err() {
            debug!("Nobody is listening for favorite changes");
        }

        is_favorite
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.favorites) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, json) {
            error!(
                "Failed to store favorites in '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}

fn read_favorites(path: &Path) -> Favorites {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str::<Vec<String>>(&json)
            .map(Favorites::from_iter)
            .unwrap_or_else(|e| {
                warn!("Stored favorites are corrupt, starting empty: {}", e);
                Favorites::default()
            }),
        Err(e) if e.kind() == ErrorKind::NotFound => Favorites::default(),
        Err(e) => {
            warn!("Couldn't read favorites, starting empty: {}", e);
            Favorites::default()
        }
    }
}
