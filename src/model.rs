use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipe fields read from a page. Anything the page did not provide in a
/// recognizable shape is `None` and left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub recipe_ingredient: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_instructions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A user's note attached to a stored recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
}

/// The canonical recipe record kept in a user's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    #[serde(flatten)]
    pub extracted: ExtractedRecipe,
    /// The URL the recipe was requested from, never a URL read from the page
    pub url: String,
    /// Username of the user who scraped it
    pub origin: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}
