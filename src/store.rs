use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Note, Recipe};

/// Opaque identifier of a stored user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Recipe {0} not found")]
    RecipeNotFound(Uuid),

    /// Failure reported by the storage backend
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Change applied to one recipe in a user's collection
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeEdit {
    Rename(String),
    AddNote(Note),
    DeleteNote(String),
}

/// Persistence for users and their recipe collections.
///
/// Appends are not idempotent: appending the same recipe twice stores it twice.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn append_recipe(&self, user: &UserId, recipe: Recipe) -> Result<(), StoreError>;

    /// Removes every recipe with `recipe_id`; removing nothing is not an error
    async fn remove_recipe(&self, user: &UserId, recipe_id: Uuid) -> Result<(), StoreError>;

    async fn edit_recipe(
        &self,
        user: &UserId,
        recipe_id: Uuid,
        edit: RecipeEdit,
    ) -> Result<(), StoreError>;

    /// Usernames of every user other than `user`
    async fn usernames_except(&self, user: &UserId) -> Result<Vec<String>, StoreError>;

    /// The stored collection of the user called `username`
    async fn recipes_of_username(&self, username: &str) -> Result<Vec<Recipe>, StoreError> {
        self.find_user_by_username(username)
            .await?
            .map(|user| user.recipes)
            .ok_or_else(|| StoreError::UserNotFound(UserId::new(username)))
    }
}

/// Process-local [`UserStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user with an empty collection and returns its id
    pub async fn add_user(&self, username: impl Into<String>) -> UserId {
        let id = UserId::new(Uuid::new_v4().to_string());
        let user = User {
            id: id.clone(),
            username: username.into(),
            recipes: Vec::new(),
        };
        self.users.write().await.insert(id.clone(), user);
        id
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn append_recipe(&self, user: &UserId, recipe: Recipe) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let entry = users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?;
        entry.recipes.push(recipe);
        Ok(())
    }

    async fn remove_recipe(&self, user: &UserId, recipe_id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let entry = users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?;
        entry.recipes.retain(|recipe| recipe.id != recipe_id);
        Ok(())
    }

    async fn edit_recipe(
        &self,
        user: &UserId,
        recipe_id: Uuid,
        edit: RecipeEdit,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let recipe = users
            .get_mut(user)
            .ok_or_else(|| StoreError::UserNotFound(user.clone()))?
            .recipes
            .iter_mut()
            .find(|recipe| recipe.id == recipe_id)
            .ok_or(StoreError::RecipeNotFound(recipe_id))?;

        match edit {
            RecipeEdit::Rename(name) => recipe.extracted.name = Some(name),
            RecipeEdit::AddNote(note) => recipe.notes.push(note),
            RecipeEdit::DeleteNote(note_id) => recipe.notes.retain(|note| note.id != note_id),
        }
        Ok(())
    }

    async fn usernames_except(&self, user: &UserId) -> Result<Vec<String>, StoreError> {
        let mut usernames: Vec<String> = self
            .users
            .read()
            .await
            .values()
            .filter(|other| &other.id != user)
            .map(|other| other.username.clone())
            .collect();
        usernames.sort();
        Ok(usernames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractedRecipe;

    fn recipe(name: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            extracted: ExtractedRecipe {
                name: Some(name.to_string()),
                ..Default::default()
            },
            url: format!("https://example.com/{name}"),
            origin: "jo".to_string(),
            notes: vec![],
        }
    }

    #[tokio::test]
    async fn test_append_is_not_idempotent() {
        let store = MemoryStore::new();
        let jo = store.add_user("jo").await;
        let waffles = recipe("waffles");

        store.append_recipe(&jo, waffles.clone()).await.unwrap();
        store.append_recipe(&jo, waffles.clone()).await.unwrap();

        let user = store.find_user_by_id(&jo).await.unwrap().unwrap();
        assert_eq!(user.recipes, vec![waffles.clone(), waffles]);
    }

    #[tokio::test]
    async fn test_append_to_unknown_user_fails() {
        let store = MemoryStore::new();
        let result = store.append_recipe(&UserId::from("ghost"), recipe("x")).await;
        assert!(matches!(result, Err(StoreError::UserNotFound(id)) if id.as_str() == "ghost"));
    }

    #[tokio::test]
    async fn test_remove_recipe() {
        let store = MemoryStore::new();
        let jo = store.add_user("jo").await;
        let keep = recipe("keep");
        let stale = recipe("stale");
        store.append_recipe(&jo, keep.clone()).await.unwrap();
        store.append_recipe(&jo, stale.clone()).await.unwrap();

        store.remove_recipe(&jo, stale.id).await.unwrap();

        let user = store.find_user_by_id(&jo).await.unwrap().unwrap();
        assert_eq!(user.recipes, vec![keep]);
    }

    #[tokio::test]
    async fn test_edit_recipe() {
        let store = MemoryStore::new();
        let jo = store.add_user("jo").await;
        let stew = recipe("stew");
        store.append_recipe(&jo, stew.clone()).await.unwrap();

        let note = Note {
            id: "n1".to_string(),
            text: "less salt".to_string(),
        };
        store
            .edit_recipe(&jo, stew.id, RecipeEdit::Rename("Beef stew".to_string()))
            .await
            .unwrap();
        store
            .edit_recipe(&jo, stew.id, RecipeEdit::AddNote(note.clone()))
            .await
            .unwrap();

        let stored = &store.find_user_by_id(&jo).await.unwrap().unwrap().recipes[0];
        assert_eq!(stored.extracted.name.as_deref(), Some("Beef stew"));
        assert_eq!(stored.notes, vec![note]);

        store
            .edit_recipe(&jo, stew.id, RecipeEdit::DeleteNote("n1".to_string()))
            .await
            .unwrap();
        let stored = &store.find_user_by_id(&jo).await.unwrap().unwrap().recipes[0];
        assert!(stored.notes.is_empty());
    }

    #[tokio::test]
    async fn test_edit_missing_recipe() {
        let store = MemoryStore::new();
        let jo = store.add_user("jo").await;
        let missing = Uuid::new_v4();

        let result = store
            .edit_recipe(&jo, missing, RecipeEdit::Rename("x".to_string()))
            .await;
        assert!(matches!(result, Err(StoreError::RecipeNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_friend_lookups() {
        let store = MemoryStore::new();
        let jo = store.add_user("jo").await;
        let sam = store.add_user("sam").await;
        store.add_user("alex").await;
        store.append_recipe(&sam, recipe("curry")).await.unwrap();

        assert_eq!(store.usernames_except(&jo).await.unwrap(), vec!["alex", "sam"]);

        let sams = store.recipes_of_username("sam").await.unwrap();
        assert_eq!(sams.len(), 1);
        assert_eq!(sams[0].extracted.name.as_deref(), Some("curry"));

        assert!(matches!(
            store.recipes_of_username("nobody").await,
            Err(StoreError::UserNotFound(_))
        ));
    }
}
