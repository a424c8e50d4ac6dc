//! Random recipe cards for development and tests. No I/O.

use rand::Rng;

use crate::recipe::{BasicRecipe, Gradient, Rating, RecipeCard, RecipeId, join_natural};

pub const TIMES_TO_COOK: &[u16] = &[
    3, 5, 8, 10, 12, 15, 20, 25, 30, 40, 45, 50, 60, 75, 80, 90, 105, 120, 150, 180, 210, 240, 270,
    300, 360, 480, 600, 720,
];

pub const SERVINGS: &[u16] = &[1, 2, 3, 4, 5, 6, 8, 10, 12, 15, 18, 20, 24, 30, 36, 40, 48, 50];

const FOOD_TYPES: &[&str] = &[
    "Pizza", "Pasta", "Sushi", "Salad", "Sauce", "Muffins", "Soup", "Curry", "Burgers", "on Rice",
];

const ADJECTIVES: &[&str] = &[
    "Spicy", "Sweet", "Sour", "Salty", "Fresh", "Hot", "Cold", "Warm",
];

const INGREDIENTS: &[&str] = &[
    "Tomato",
    "Onion",
    "Garlic",
    "Mushroom",
    "Pineapple",
    "Pepper",
    "Bacon",
    "Cheese",
    "Chicken",
    "Beef",
    "Pork",
    "Fish",
    "Shrimp",
    "Beetroot",
    "Watermelon",
    "Cucumber",
    "Carrot",
    "Celery",
    "Chilli",
    "Bean",
    "Pea",
    "Potato",
    "Cabbage",
    "Cauliflower",
    "Broccoli",
    "Lettuce",
    "Seed",
    "Pumpkin",
    "Rice",
];

const NUTRIENTS: &[&str] = &[
    "Calories",
    "Fat",
    "Saturated Fat",
    "Cholesterol",
    "Carbohydrates",
    "Fiber",
    "Sugar",
    "Protein",
    "Vitamin A",
    "Vitamin B1",
    "Vitamin B2",
    "Vitamin B3",
    "Vitamin B5",
    "Vitamin B6",
    "Vitamin B9",
    "Vitamin B12",
    "Vitamin C",
    "Vitamin D",
    "Vitamin E",
    "Vitamin K",
    "Choline",
    "Calcium",
    "Copper",
    "Iodine",
    "Iron",
    "Magnesium",
    "Manganese",
    "Phosphorus",
    "Potassium",
    "Selenium",
    "Sodium",
    "Zinc",
    "Starch",
    "Sucrose",
    "Glucose",
    "Fructose",
    "Lactose",
    "Omega 3S",
    "Omega 6S",
];

const GRADIENTS: &[(&str, &str)] = &[
    ("#d3a972", "#e8a16e"),
    ("#f9ddb8", "#ffd886"),
    ("#f8f9b8", "#d5ff86"),
    ("#d0f9b8", "#a0e9ac"),
    ("#b8f9db", "#9fddd3"),
    ("#c6d6e6", "#90acc9"),
    ("#d6d6e6", "#90acc9"),
    ("#d6d6e6", "#b4a8d6"),
    ("#d7c2e4", "#c4a6db"),
    ("#e4c2de", "#dba6bf"),
    ("#e4c2cc", "#dba6a6"),
    ("#e4c1b8", "#dbb08c"),
];

const IMAGE_BASE: &str = "https://www.heartfoundation.org.nz/media/images/all-shared-sections/recipes";

const IMAGES: &[&str] = &[
    "avocado-and-lentil-salad_737_373_c1.png",
    "courgette-meatballs_737_373_c1.png",
    "carrot-muffins_737_373_c1.png",
    "tomato-capsicum-pasta-sauce_737_373_c1.jpg",
    "quinoa-and-beetroot-salad-750x380_737_373_c1.jpg",
    "gazpacho-soup_(002)_737_373_c1.jpg",
    "asparagus-tart_737_373_c1.jpg",
    "cauliflower-and-lentil-curry_737_373_c1.png",
    "pumpkin-fritters_737_373_c1.png",
    "corn-and-lentil-fritters_737_372_c1.jpg",
    "watermelon-salad-750x380_737_373_c1.jpg",
    "beetroot-hummus-750x380_737_372_c1.png",
    "kumara-salad_737_373_c1.jpg",
    "vegetable-bake-750x380_737_373_c1.png",
];

pub fn generate_basic_recipes(count: usize) -> Vec<RecipeCard> {
    generate_basic_recipes_with(&mut rand::thread_rng(), count)
}

pub fn generate_basic_recipes_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<RecipeCard> {
    (0..count).map(|_| generate_basic_recipe_with(rng)).collect()
}

pub fn generate_basic_recipe() -> RecipeCard {
    generate_basic_recipe_with(&mut rand::thread_rng())
}

pub fn generate_basic_recipe_with<R: Rng + ?Sized>(rng: &mut R) -> RecipeCard {
    let title = random_title(rng);
    let short = kebab_case(&title);

    RecipeCard {
        recipe: BasicRecipe {
            id: random_id(rng),
            short,
            title,
            image: random_image(rng),
            nutrients: random_nutrients(rng),
            time_to_cook: pick(rng, TIMES_TO_COOK),
            servings: pick(rng, SERVINGS),
            gradient: random_gradient(rng),
        },
        rating: random_rating(rng, true),
        bookmarked: rng.gen_bool(0.5),
    }
}

/// `[Adjective] Ingredient[, Ingredient, and Ingredient] FoodType`.
pub fn random_title<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(1..=3);
    let ingredients = (0..count)
        .map(|_| pick(rng, INGREDIENTS))
        .collect::<Vec<_>>();
    let food_type = pick(rng, FOOD_TYPES);

    let body = format!("{} {food_type}", join_natural(&ingredients));
    if rng.gen_bool(0.5) {
        format!("{} {body}", pick(rng, ADJECTIVES))
    } else {
        body
    }
}

/// `None` half of the time when `allow_unrated`, otherwise 0 to 5 in half steps.
pub fn random_rating<R: Rng + ?Sized>(rng: &mut R, allow_unrated: bool) -> Option<Rating> {
    if allow_unrated && rng.gen_bool(0.5) {
        return None;
    }
    Rating::from_half_stars(rng.gen_range(0..=Rating::MAX_HALF_STARS)).ok()
}

/// One to three nutrients.
pub fn random_nutrients<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|_| pick(rng, NUTRIENTS).to_owned())
        .collect()
}

pub fn random_gradient<R: Rng + ?Sized>(rng: &mut R) -> Gradient {
    let (start, end) = pick(rng, GRADIENTS);
    Gradient(start.to_owned(), end.to_owned())
}

pub fn random_image<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{IMAGE_BASE}/{}", pick(rng, IMAGES))
}

/// A v4-formatted UUID drawn from `rng`.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> RecipeId {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    RecipeId::new(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
}

fn kebab_case(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Uniform pick. Every list in this module is a non-empty constant.
fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, list: &[T]) -> T {
    list[rng.gen_range(0..list.len())]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn fifty_recipes_are_well_formed() {
        let cards = generate_basic_recipes(50);
        assert_eq!(cards.len(), 50);

        let ids = cards
            .iter()
            .map(|card| card.recipe.id.clone())
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 50);

        for card in &cards {
            let recipe = &card.recipe;
            assert!(TIMES_TO_COOK.contains(&recipe.time_to_cook));
            assert!(SERVINGS.contains(&recipe.servings));
            assert!((1..=3).contains(&recipe.nutrients.len()));
            assert!(recipe.image.starts_with(IMAGE_BASE));
            if let Some(rating) = card.rating {
                let stars = rating.stars();
                assert!((0.0..=5.0).contains(&stars));
                assert_eq!((stars * 2.0).fract(), 0.0);
            }
        }
    }

    #[test]
    fn short_is_kebab_cased_title() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let card = generate_basic_recipe_with(&mut rng);
            let recipe = &card.recipe;
            assert_eq!(recipe.short, recipe.title.to_lowercase().replace(' ', "-"));
            assert!(!recipe.short.contains(char::is_whitespace));
            assert_eq!(recipe.url(), format!("/recipe/{}", recipe.short));
        }
    }

    #[test]
    fn titles_use_the_vocabulary() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let title = random_title(&mut rng);
            assert!(
                FOOD_TYPES.iter().any(|food| title.ends_with(food)),
                "title={title}"
            );
            assert!(
                INGREDIENTS.iter().any(|ingredient| title.contains(ingredient)),
                "title={title}"
            );
            let and_count = title.matches(" and ").count();
            assert!(and_count <= 1, "title={title}");
        }
    }

    #[test]
    fn ratings_cover_both_rated_and_unrated() {
        let mut rng = StdRng::seed_from_u64(3);
        let ratings = (0..200)
            .map(|_| random_rating(&mut rng, true))
            .collect::<Vec<_>>();
        assert!(ratings.iter().any(Option::is_none));
        assert!(ratings.iter().any(Option::is_some));

        assert!((0..50).all(|_| random_rating(&mut rng, false).is_some()));
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let first = generate_basic_recipes_with(&mut StdRng::seed_from_u64(9), 5);
        let second = generate_basic_recipes_with(&mut StdRng::seed_from_u64(9), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn random_id_is_a_v4_uuid() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = random_id(&mut rng);
        let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
