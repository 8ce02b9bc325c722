//! Recipe recommendation request and response records.

use serde::{Deserialize, Serialize};

use super::id::RecipeId;
use super::profile::{ActivityLevel, Gender, Objective, Profile};
use crate::recipe_text;

/// Body for `POST /recipes/recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub category: Gender,
    /// Kilograms.
    pub body_weight: f64,
    /// Centimetres.
    pub body_height: f64,
    pub age: u32,
    pub activity_intensity: ActivityLevel,
    pub objective: Objective,
    /// Allowed deviation from the calorie target, as a fraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Number of extra suggestions to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<u32>,
}

impl From<&Profile> for RecommendationRequest {
    fn from(profile: &Profile) -> Self {
        Self {
            category: profile.gender,
            body_weight: profile.weight,
            body_height: profile.height,
            age: profile.age,
            activity_intensity: profile.activity,
            objective: profile.objective,
            tolerance: None,
            suggestions: None,
        }
    }
}

/// A recipe record from the recommender.
///
/// List-valued fields (`images`, `recipe_instructions`, ...) arrive as
/// encoded strings; use the accessor methods to decode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    pub recipe_id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default)]
    pub recipe_category: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub recipe_ingredient_quantities: Option<String>,
    #[serde(default)]
    pub recipe_ingredient_parts: Option<String>,
    #[serde(default)]
    pub aggregated_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<f64>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub fat_content: f64,
    #[serde(default)]
    pub saturated_fat_content: f64,
    #[serde(default)]
    pub cholesterol_content: f64,
    #[serde(default)]
    pub sodium_content: f64,
    #[serde(default)]
    pub carbohydrate_content: f64,
    #[serde(default)]
    pub fiber_content: f64,
    #[serde(default)]
    pub sugar_content: f64,
    #[serde(default)]
    pub protein_content: f64,
    #[serde(default)]
    pub recipe_servings: Option<f64>,
    #[serde(default)]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub recipe_instructions: Option<String>,
}

impl Recipe {
    /// Decoded image URLs.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        recipe_text::parse_list(self.images.as_deref().unwrap_or_default())
    }

    /// Decoded instruction steps.
    #[must_use]
    pub fn instruction_steps(&self) -> Vec<String> {
        recipe_text::parse_list(self.recipe_instructions.as_deref().unwrap_or_default())
    }

    /// Ingredients paired with their quantities, where quantities exist.
    #[must_use]
    pub fn ingredients(&self) -> Vec<(Option<String>, String)> {
        let parts =
            recipe_text::parse_list(self.recipe_ingredient_parts.as_deref().unwrap_or_default());
        let mut quantities = recipe_text::parse_items(
            self.recipe_ingredient_quantities
                .as_deref()
                .unwrap_or_default(),
        )
        .into_iter();

        parts
            .into_iter()
            .map(|part| (quantities.next().flatten(), part))
            .collect()
    }
}

/// Response of `POST /recipes/recommend`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedRecipes {
    #[serde(default)]
    pub breakfast: Vec<Recipe>,
    #[serde(default)]
    pub lunch: Vec<Recipe>,
    #[serde(default)]
    pub dinner: Vec<Recipe>,
    #[serde(default)]
    pub suggestions: Vec<Recipe>,
}

impl RecommendedRecipes {
    /// Whether the recommender returned nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty()
            && self.lunch.is_empty()
            && self.dinner.is_empty()
            && self.suggestions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::profile::ProfileForm;

    #[test]
    fn test_request_from_profile() {
        let profile = ProfileForm {
            name: "Kari".to_string(),
            gender: "female".to_string(),
            weight: "64".to_string(),
            height: "168".to_string(),
            age: "31".to_string(),
            activity: "very_active".to_string(),
            objective: "muscle_gain".to_string(),
            profile_picture: None,
        }
        .validate()
        .unwrap();

        let json = serde_json::to_value(RecommendationRequest::from(&profile)).unwrap();
        assert_eq!(json["category"], "female");
        assert_eq!(json["body_weight"], 64.0);
        assert_eq!(json["body_height"], 168.0);
        assert_eq!(json["age"], 31);
        assert_eq!(json["activity_intensity"], "very_active");
        assert_eq!(json["objective"], "muscle_gain");
        assert!(json.get("tolerance").is_none());
    }

    #[test]
    fn test_recipe_decodes_lists() {
        let json = r#"{
            "RecipeId": 38,
            "Name": "Low-Fat Berry Blue Frozen Dessert",
            "Images": "c(\"https://img/a.jpg\", \"https://img/b.jpg\")",
            "RecipeIngredientQuantities": "c(\"4\", \"1/4\")",
            "RecipeIngredientParts": "c(\"blueberries\", \"granulated sugar\", \"lemon juice\")",
            "RecipeInstructions": "c(\"Toss berries.\", \"Freeze.\")",
            "Calories": 170.9
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.image_urls().len(), 2);
        assert_eq!(recipe.instruction_steps(), vec!["Toss berries.", "Freeze."]);

        let ingredients = recipe.ingredients();
        assert_eq!(ingredients.len(), 3);
        assert_eq!(ingredients[0], (Some("4".to_string()), "blueberries".to_string()));
        assert_eq!(ingredients[2], (None, "lemon juice".to_string()));
    }

    #[test]
    fn test_recipe_without_images() {
        let json = r#"{"RecipeId": 1, "Name": "Toast", "Images": "character(0)"}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.image_urls().is_empty());
        assert!(recipe.instruction_steps().is_empty());
    }

    #[test]
    fn test_recommendations_default_sections() {
        let recipes: RecommendedRecipes = serde_json::from_str(r#"{"lunch": []}"#).unwrap();
        assert!(recipes.is_empty());
    }
}
