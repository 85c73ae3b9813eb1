use log::debug;
use serde::de::{self, DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ScrapeError;
use crate::locate::{StructuredTree, INGREDIENT_FIELD};

const RECIPE_TYPE: &str = "Recipe";

/// `keywords` as pages publish it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Delimited(String),
}

/// `recipeYield`; only text is meaningful downstream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecipeYield {
    Text(String),
    Other(IgnoredAny),
}

/// `recipeInstructions` as pages publish it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Instructions {
    Steps(Vec<InstructionStep>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InstructionStep {
    /// A `HowToSection` grouping further steps
    Section {
        #[serde(rename = "itemListElement")]
        item_list_element: Vec<InstructionStep>,
    },
    /// A `HowToStep` or any object exposing `text`
    Step { text: String },
    Plain(String),
    /// A step with no usable text
    Unrecognized(IgnoredAny),
}

// Object shapes go through `Map` so that sequences are never read as structs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Publisher {
    pub name: Option<String>,
}

impl TryFrom<Map<String, Value>> for Publisher {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            name: member(&object, "name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Person {
    pub name: Option<String>,
}

impl TryFrom<Map<String, Value>> for Person {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            name: member(&object, "name")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorEntry {
    Object(Person),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorShape {
    Many(Vec<AuthorEntry>),
    One(AuthorEntry),
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
struct ImageObject {
    url: String,
}

impl TryFrom<Map<String, Value>> for ImageObject {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let url = member(&object, "url")?
            .ok_or_else(|| <serde_json::Error as de::Error>::missing_field("url"))?;
        Ok(Self { url })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageShape {
    Url(String),
    Object(ImageObject),
    List(Vec<ImageShape>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientShape {
    List(Vec<IngredientEntry>),
    Single(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    Text(String),
    Other(IgnoredAny),
}

/// The recipe object found in a JSON-LD tree, with every field classified.
///
/// `author` is always a list and `image` always a single URL; the other
/// fields keep the shape the page used. Fields whose shape was not
/// recognized are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecipeNode {
    pub name: Option<String>,
    pub keywords: Option<Keywords>,
    pub image: Option<String>,
    pub recipe_yield: Option<RecipeYield>,
    pub recipe_ingredient: Vec<String>,
    pub recipe_instructions: Option<Instructions>,
    pub publisher: Option<Publisher>,
    pub author: Option<Vec<Person>>,
}

/// Picks the recipe out of a JSON-LD tree.
///
/// A top-level object is the recipe when it carries an ingredient list.
/// Lists and `@graph` containers yield their first entry typed `Recipe`,
/// which must then carry an ingredient list as well.
pub fn resolve(tree: &StructuredTree) -> Result<ResolvedRecipeNode, ScrapeError> {
    let candidate = match tree {
        StructuredTree::Object(map) => Some(map),
        StructuredTree::List(items) | StructuredTree::Graph(items) => {
            let found = items
                .iter()
                .filter_map(Value::as_object)
                .find(|item| is_recipe_type(item));
            debug!("RecipeNodeResolver: typed Recipe entry found: {}", found.is_some());
            found
        }
        StructuredTree::Unrecognized(value) => {
            debug!("RecipeNodeResolver: unrecognized JSON-LD shape: {}", value);
            None
        }
    };

    let node = candidate
        .filter(|node| node.contains_key(INGREDIENT_FIELD))
        .ok_or(ScrapeError::NoRecipeFound)?;

    let recipe_ingredient = match field::<IngredientShape>(node, INGREDIENT_FIELD) {
        Some(IngredientShape::List(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                IngredientEntry::Text(text) => Some(text),
                IngredientEntry::Other(_) => None,
            })
            .collect(),
        Some(IngredientShape::Single(ingredient)) => vec![ingredient],
        None => {
            debug!("RecipeNodeResolver: ingredient list has an unusable shape");
            return Err(ScrapeError::NoRecipeFound);
        }
    };

    Ok(ResolvedRecipeNode {
        name: field(node, "name"),
        keywords: field(node, "keywords"),
        image: field::<ImageShape>(node, "image").and_then(first_image),
        recipe_yield: field(node, "recipeYield"),
        recipe_ingredient,
        recipe_instructions: field(node, "recipeInstructions"),
        publisher: field(node, "publisher"),
        author: field::<AuthorShape>(node, "author").map(authors),
    })
}

fn is_recipe_type(node: &Map<String, Value>) -> bool {
    match node.get("@type") {
        Some(Value::String(kind)) => kind == RECIPE_TYPE,
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == RECIPE_TYPE),
        _ => false,
    }
}

/// Reads `key` as `T`, treating a missing key, `null` or an unexpected shape
/// as absent.
fn field<T: DeserializeOwned>(node: &Map<String, Value>, key: &str) -> Option<T> {
    let value = node.get(key)?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("RecipeNodeResolver: dropping `{}` ({}): {}", key, e, value);
            None
        }
    }
}

/// Reads `key` of an object shape; missing and `null` are `None`, any other
/// mismatch rejects the whole object.
fn member<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value).map(Some),
    }
}

fn first_image(image: ImageShape) -> Option<String> {
    match image {
        ImageShape::Url(url) => Some(url),
        ImageShape::Object(object) => Some(object.url),
        ImageShape::List(images) => images.into_iter().next().and_then(first_image),
    }
}

fn authors(author: AuthorShape) -> Vec<Person> {
    let entries = match author {
        AuthorShape::Many(entries) => entries,
        AuthorShape::One(entry) => vec![entry],
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            AuthorEntry::Object(person) => person,
            AuthorEntry::Name(name) => Person { name: Some(name) },
        })
        .collect()
}
