use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::ApiClient;
use crate::error::ApiError;

use serde::Serialize;

use super::{BasicRecipe, Method, Nutrient, Quiz, Recipe, RecipeId};

#[derive(Debug, Default)]
struct Cache {
    basic_by_id: HashMap<RecipeId, Arc<BasicRecipe>>,
    by_id: HashMap<RecipeId, Arc<Recipe>>,
    by_short: HashMap<String, Arc<Recipe>>,
}

/// Fetches recipes and keeps every successful answer for the life of the service.
///
/// There is no eviction and no invalidation. Concurrent misses for the same key
/// each go to the network.
#[derive(Debug)]
pub struct RecipeService {
    client: ApiClient,
    cache: Mutex<Cache>,
}

impl RecipeService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn get_basic(&self, id: &RecipeId) -> Result<Arc<BasicRecipe>, ApiError> {
        if let Some(cached) = self.lock().basic_by_id.get(id) {
            tracing::debug!(%id, "basic recipe cache hit");
            return Ok(Arc::clone(cached));
        }

        let recipe: BasicRecipe = self
            .client
            .get(&format!("/recipe-basic/id/{}", encode_segment(id.as_str())))
            .await?;
        let recipe = Arc::new(recipe);
        self.lock()
            .basic_by_id
            .insert(recipe.id.clone(), Arc::clone(&recipe));
        Ok(recipe)
    }

    /// This week's featured recipe. Never cached: it changes weekly.
    pub async fn weekly(&self) -> Result<BasicRecipe, ApiError> {
        self.client.get("/weekly").await
    }

    pub async fn get_by_id(&self, id: &RecipeId) -> Result<Arc<Recipe>, ApiError> {
        if let Some(cached) = self.lock().by_id.get(id) {
            tracing::debug!(%id, "recipe cache hit");
            return Ok(Arc::clone(cached));
        }
        self.fetch(&format!("/recipe/id/{}", encode_segment(id.as_str())))
            .await
    }

    pub async fn get_by_short(&self, short: &str) -> Result<Arc<Recipe>, ApiError> {
        if let Some(cached) = self.lock().by_short.get(short) {
            tracing::debug!(short, "recipe cache hit");
            return Ok(Arc::clone(cached));
        }
        self.fetch(&format!("/recipe/short/{}", encode_segment(short)))
            .await
    }

    /// Inserts or updates a recipe on the server. Needs a staff token.
    ///
    /// The server overwrites the recipe whose `uuid` matches, so the id is sent
    /// under that key.
    pub async fn publish(&self, recipe: &Recipe, token: &str) -> Result<Arc<Recipe>, ApiError> {
        let published: Recipe = self
            .client
            .post_authorized("/recipe", &RecipeUpload::from(recipe), token)
            .await?;
        tracing::info!(id = %published.id(), "published recipe");
        Ok(self.remember(published))
    }

    pub fn cached_len(&self) -> usize {
        self.lock().by_id.len()
    }

    async fn fetch(&self, endpoint: &str) -> Result<Arc<Recipe>, ApiError> {
        let recipe: Recipe = self.client.get(endpoint).await?;
        Ok(self.remember(recipe))
    }

    fn remember(&self, recipe: Recipe) -> Arc<Recipe> {
        let recipe = Arc::new(recipe);
        let mut cache = self.lock();
        cache.by_id.insert(recipe.id().clone(), Arc::clone(&recipe));
        cache
            .by_short
            .insert(recipe.short().to_owned(), Arc::clone(&recipe));
        recipe
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Request body of `POST /recipe`. The slug and gradient are derived server side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecipeUpload<'a> {
    uuid: &'a RecipeId,
    title: &'a str,
    nutrients: &'a [Nutrient],
    time_to_cook: u16,
    servings: u16,
    image: &'a str,
    ingredients: &'a [String],
    method: &'a Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz: Option<&'a Quiz>,
}

impl<'a> From<&'a Recipe> for RecipeUpload<'a> {
    fn from(recipe: &'a Recipe) -> Self {
        let basic = &recipe.basic;
        Self {
            uuid: &basic.id,
            title: &basic.title,
            nutrients: &basic.nutrients,
            time_to_cook: basic.time_to_cook,
            servings: basic.servings,
            image: &basic.image,
            ingredients: &recipe.ingredients,
            method: &recipe.method,
            quiz: recipe.quiz.as_ref(),
        }
    }
}

/// Percent-encodes a single path segment so ids and shorts cannot change the path.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
