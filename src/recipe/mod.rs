use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RatingError, StorageError};
use crate::store::Storage;

pub mod quiz;
pub mod service;

pub use quiz::{Question, Quiz, QuizResult};
pub use service::RecipeService;

/// Text that may carry the markdown-like formatting understood by the renderer.
pub type Formattable = String;

/// A nutrient name such as `"Fiber"` or `"Vitamin B12"`.
pub type Nutrient = String;

/// A color in any CSS notation.
pub type Color = String;

/// Opaque, immutable recipe identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A star rating from 0 to 5 in half-star steps. Serialized as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(u8);

impl Rating {
    pub const MAX_HALF_STARS: u8 = 10;

    pub fn from_half_stars(half_stars: u8) -> Result<Self, RatingError> {
        if half_stars > Self::MAX_HALF_STARS {
            return Err(RatingError::OutOfRange(f64::from(half_stars) / 2.0));
        }
        Ok(Self(half_stars))
    }

    pub fn half_stars(self) -> u8 {
        self.0
    }

    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingError;

    fn try_from(stars: f64) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&stars) {
            return Err(RatingError::OutOfRange(stars));
        }
        let doubled = stars * 2.0;
        if doubled.fract() != 0.0 {
            return Err(RatingError::NotHalfStep(stars));
        }
        Ok(Self(doubled as u8))
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.stars()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stars())
    }
}

/// Two colors for a card background: the brighter start (top left) and the
/// darker end (bottom right).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient(pub Color, pub Color);

impl Default for Gradient {
    fn default() -> Self {
        Self("#d6d6e6".to_owned(), "#90acc9".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicRecipe {
    #[serde(alias = "uuid", alias = "_id")]
    pub id: RecipeId,
    /// Slug used in the recipe's canonical URL.
    #[serde(default)]
    pub short: String,
    pub title: String,
    pub image: String,
    pub nutrients: Vec<Nutrient>,
    /// Minutes.
    pub time_to_cook: u16,
    pub servings: u16,
    #[serde(default)]
    pub gradient: Gradient,
}

impl BasicRecipe {
    pub fn url(&self) -> String {
        format!("/recipe/{}", self.short)
    }

    pub fn time_string(&self) -> String {
        time_string(self.time_to_cook)
    }

    pub fn contains_string(&self) -> String {
        contains_string(&self.nutrients)
    }

    pub fn is_bookmarked(&self, storage: &Storage) -> Result<bool, StorageError> {
        storage.is_bookmarked(&self.id)
    }

    pub fn set_bookmarked(&self, storage: &Storage, bookmarked: bool) -> Result<(), StorageError> {
        storage.set_bookmarked(&self.id, bookmarked)
    }

    /// `None` when the recipe has not been rated.
    pub fn rating(&self, storage: &Storage) -> Result<Option<Rating>, StorageError> {
        storage.rating(&self.id)
    }

    /// Passing `None` clears the rating.
    pub fn set_rating(
        &self,
        storage: &Storage,
        rating: Option<Rating>,
    ) -> Result<(), StorageError> {
        storage.set_rating(&self.id, rating)
    }

    /// Snapshot of the recipe together with its stored rating and bookmark.
    pub fn card(&self, storage: &Storage) -> Result<RecipeCard, StorageError> {
        Ok(RecipeCard {
            rating: self.rating(storage)?,
            bookmarked: self.is_bookmarked(storage)?,
            recipe: self.clone(),
        })
    }
}

/// What a recipe listing shows: the recipe plus the user's state for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCard {
    #[serde(flatten)]
    pub recipe: BasicRecipe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub bookmarked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(flatten)]
    pub basic: BasicRecipe,
    pub ingredients: Vec<String>,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

impl Recipe {
    pub fn id(&self) -> &RecipeId {
        &self.basic.id
    }

    pub fn short(&self) -> &str {
        &self.basic.short
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub substeps: Vec<SubStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStep {
    pub content: Formattable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Callout>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub infos: Vec<Callout>,
}

/// A titled note attached to a sub-step, shown either as a warning or as info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    pub title: String,
    pub content: Formattable,
}

pub type Warning = Callout;
pub type Info = Callout;

/// Renders a nutrient list as a "Contains ..." sentence.
pub fn contains_string(nutrients: &[Nutrient]) -> String {
    match nutrients {
        [] => "Contains... no nutrients?".to_owned(),
        [_] | [_, _] | [_, _, _] => format!("Contains {}", join_natural(nutrients)),
        _ => "Contains a lot of nutrients!".to_owned(),
    }
}

/// Joins words the way they are read: `a`, `a and b`, `a, b, and c`.
pub fn join_natural<S: AsRef<str>>(words: &[S]) -> String {
    match words {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|w| w.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{head}, and {}", last.as_ref())
        }
    }
}

/// Renders a duration in minutes as `"45 mins"`, `"2 hrs"` or `"1 hrs 30 mins"`.
pub fn time_string(minutes: u16) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{m} mins"),
        (h, 0) => format!("{h} hrs"),
        (h, m) => format!("{h} hrs {m} mins"),
    }
}
