use std::sync::LazyLock;

use log::debug;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use crate::error::ScrapeError;

pub(crate) const INGREDIENT_FIELD: &str = "recipeIngredient";
const GRAPH_FIELD: &str = "@graph";

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector is valid")
});

/// The shapes a JSON-LD block is known to take.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredTree {
    /// A single object, usually the recipe itself
    Object(Map<String, Value>),
    /// A top-level list of typed objects
    List(Vec<Value>),
    /// The `@graph` list of a container object without its own ingredient list
    Graph(Vec<Value>),
    /// Scalars and anything else no recipe can live in
    Unrecognized(Value),
}

impl From<Value> for StructuredTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => StructuredTree::List(items),
            Value::Object(mut map) if !map.contains_key(INGREDIENT_FIELD) => {
                match map.remove(GRAPH_FIELD) {
                    Some(Value::Array(items)) => StructuredTree::Graph(items),
                    Some(other) => {
                        map.insert(GRAPH_FIELD.to_string(), other);
                        StructuredTree::Object(map)
                    }
                    None => StructuredTree::Object(map),
                }
            }
            Value::Object(map) => StructuredTree::Object(map),
            other => StructuredTree::Unrecognized(other),
        }
    }
}

/// Finds the first JSON-LD block in `html` and parses it.
///
/// Only the first block is considered. A missing or blank block is
/// [`ScrapeError::NoStructuredData`]; text that is not JSON is
/// [`ScrapeError::MalformedStructuredData`].
pub fn locate(html: &str) -> Result<StructuredTree, ScrapeError> {
    let document = Html::parse_document(html);

    let script = document
        .select(&JSON_LD_SELECTOR)
        .next()
        .ok_or(ScrapeError::NoStructuredData)?;

    let raw: String = script.text().collect();
    let json = strip_wrappers(&raw);
    if json.is_empty() {
        debug!("StructuredDataLocator: JSON-LD block is empty");
        return Err(ScrapeError::NoStructuredData);
    }

    let value: Value = serde_json::from_str(json)?;
    let tree = StructuredTree::from(value);
    debug!("StructuredDataLocator: parsed JSON-LD block: {:?}", tree);
    Ok(tree)
}

// Some CMSes wrap the block in an HTML comment or CDATA section
fn strip_wrappers(raw: &str) -> &str {
    let mut json = raw.trim();
    loop {
        let stripped = json
            .strip_prefix("<!--")
            .and_then(|s| s.strip_suffix("-->"))
            .or_else(|| {
                json.strip_prefix("<![CDATA[")
                    .and_then(|s| s.strip_suffix("]]>"))
            })
            .or_else(|| {
                json.strip_prefix("//<![CDATA[")
                    .and_then(|s| s.strip_suffix("//]]>"))
            });

        match stripped {
            Some(inner) => json = inner.trim(),
            None => return json,
        }
    }
}
