//! Local persistence for bookmarks, ratings and experience.
//!
//! Each value lives under a fixed key as JSON text in a [`KeyValueBackend`]:
//!
//! - `totalXp`: number
//! - `bookmarks`: array of recipe ids
//! - `ratings`: object mapping recipe id to rating
//!
//! Development sessions keep everything in memory so regenerated fixtures never
//! pile up; production writes one file per key under the profile's data directory.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use crate::config::{Config, Environment};
use crate::error::StorageError;
use crate::leveling::{self, LevelingInfo};
use crate::recipe::{Quiz, QuizResult, Rating, RecipeId};

mod backend;
mod slot;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use slot::{Slot, Subscription};

pub const TOTAL_XP_KEY: &str = "totalXp";
pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const RATINGS_KEY: &str = "ratings";

pub type Bookmarks = BTreeSet<RecipeId>;
pub type Ratings = BTreeMap<RecipeId, Rating>;

pub struct Storage {
    backend: Arc<dyn KeyValueBackend>,
    total_xp: OnceLock<Slot<u64>>,
    bookmarks: OnceLock<Slot<Bookmarks>>,
    ratings: OnceLock<Slot<Ratings>>,
}

impl Storage {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            total_xp: OnceLock::new(),
            bookmarks: OnceLock::new(),
            ratings: OnceLock::new(),
        }
    }

    /// Session memory in development, the profile data directory otherwise.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        match config.environment {
            Environment::Development => {
                tracing::debug!("using session storage");
                Ok(Self::new(MemoryBackend::new()))
            }
            Environment::Production => {
                let dir = config.data_dir()?;
                tracing::debug!(dir = %dir.display(), "using profile storage");
                Ok(Self::new(FileBackend::new(dir)))
            }
        }
    }

    pub fn total_xp_slot(&self) -> &Slot<u64> {
        self.total_xp
            .get_or_init(|| Slot::new(TOTAL_XP_KEY, Arc::clone(&self.backend)))
    }

    pub fn bookmarks_slot(&self) -> &Slot<Bookmarks> {
        self.bookmarks
            .get_or_init(|| Slot::new(BOOKMARKS_KEY, Arc::clone(&self.backend)))
    }

    pub fn ratings_slot(&self) -> &Slot<Ratings> {
        self.ratings
            .get_or_init(|| Slot::new(RATINGS_KEY, Arc::clone(&self.backend)))
    }

    pub fn bookmarks(&self) -> Result<Bookmarks, StorageError> {
        Ok(self.bookmarks_slot().get()?.unwrap_or_default())
    }

    pub fn set_bookmarks(&self, bookmarks: &Bookmarks) -> Result<(), StorageError> {
        self.bookmarks_slot().set(bookmarks)
    }

    pub fn ratings(&self) -> Result<Ratings, StorageError> {
        Ok(self.ratings_slot().get()?.unwrap_or_default())
    }

    pub fn set_ratings(&self, ratings: &Ratings) -> Result<(), StorageError> {
        self.ratings_slot().set(ratings)
    }

    pub fn is_bookmarked(&self, id: &RecipeId) -> Result<bool, StorageError> {
        Ok(self.bookmarks()?.contains(id))
    }

    /// Adds or removes `id`. Writes only when the set actually changes.
    pub fn set_bookmarked(&self, id: &RecipeId, bookmarked: bool) -> Result<(), StorageError> {
        let mut bookmarks = self.bookmarks()?;
        let changed = if bookmarked {
            bookmarks.insert(id.clone())
        } else {
            bookmarks.remove(id)
        };
        if changed {
            self.set_bookmarks(&bookmarks)?;
        }
        Ok(())
    }

    /// `None` when `id` has not been rated.
    pub fn rating(&self, id: &RecipeId) -> Result<Option<Rating>, StorageError> {
        Ok(self.ratings()?.get(id).copied())
    }

    /// Passing `None` clears the rating. Writes only when the map actually changes.
    pub fn set_rating(&self, id: &RecipeId, rating: Option<Rating>) -> Result<(), StorageError> {
        let mut ratings = self.ratings()?;
        let changed = match rating {
            Some(rating) => ratings.insert(id.clone(), rating) != Some(rating),
            None => ratings.remove(id).is_some(),
        };
        if changed {
            self.set_ratings(&ratings)?;
        }
        Ok(())
    }

    pub fn total_xp(&self) -> Result<u64, StorageError> {
        Ok(self.total_xp_slot().get()?.unwrap_or(0))
    }

    pub fn set_total_xp(&self, total_xp: u64) -> Result<(), StorageError> {
        self.total_xp_slot().set(&total_xp)
    }

    pub fn leveling_info(&self) -> Result<LevelingInfo, StorageError> {
        Ok(leveling::get_level(self.total_xp()?))
    }

    /// Adds `amount` to the stored total and returns the new level summary.
    pub fn add_xp(&self, amount: u64) -> Result<LevelingInfo, StorageError> {
        let before = self.leveling_info()?;
        let total_xp = before.total_xp.saturating_add(amount);
        self.set_total_xp(total_xp)?;

        let after = leveling::get_level(total_xp);
        if after.level > before.level {
            tracing::info!(level = after.level, total_xp, "level up");
        }
        Ok(after)
    }

    /// Scores a finished quiz and credits its reward.
    pub fn complete_quiz<S: AsRef<str>>(
        &self,
        quiz: &Quiz,
        answers: &[S],
    ) -> Result<(QuizResult, LevelingInfo), StorageError> {
        let result = quiz.score(answers);
        tracing::debug!(
            correct = result.correct,
            total = result.total,
            reward = result.reward,
            "quiz completed"
        );
        let info = self.add_xp(result.reward)?;
        Ok((result, info))
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
