use serde::{Deserialize, Serialize};

use crate::constants::pet::{TEMPORARY_KIND, WASTE_OBJECT_ID};
use crate::data::pet::{Pet, PetId};

/// Server-assigned home object identifier.
pub type HomeObjectId = u64;

/// Something placed in the home scene: decor, or temporary things like waste and food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeObject {
    /// `None` until the server has stored the object and assigned an id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HomeObjectId>,
    #[serde(rename = "type")]
    pub kind: String,
    pub object_id: u32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl HomeObject {
    /// A small waste object at the given position, not yet stored by the server.
    pub fn waste(x: f32, y: f32) -> Self {
        Self {
            id: None,
            kind: TEMPORARY_KIND.to_string(),
            object_id: WASTE_OBJECT_ID,
            x,
            y,
        }
    }

    pub fn is_waste(&self) -> bool {
        self.kind == TEMPORARY_KIND && self.object_id == WASTE_OBJECT_ID
    }

    /// Whether both refer to the same placed object.
    ///
    /// Stored objects compare by id. An object the server has not stored yet has no id,
    /// so it is matched by what it is and where it sits.
    pub fn same_object(&self, other: &HomeObject) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.kind == other.kind && self.object_id == other.object_id && self.x == other.x && self.y == other.y,
        }
    }
}

/// A stack of owned catalog items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    pub item_id: u32,
    #[serde(default)]
    pub quantity: u32,
}

/// The whole account document the server stores and returns on every write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub completed_tutorial: bool,
    #[serde(default)]
    pub money: i64,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub home_objects: Vec<HomeObject>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl UserData {
    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    pub fn pet_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.id == id)
    }

    pub fn home_object(&self, id: HomeObjectId) -> Option<&HomeObject> {
        self.home_objects.iter().find(|object| object.id == Some(id))
    }

    pub fn waste(&self) -> impl Iterator<Item = &HomeObject> {
        self.home_objects.iter().filter(|object| object.is_waste())
    }

    /// Fills in account fields missing from a user-data response.
    pub fn reconciled_with(mut self, local: &UserData) -> UserData {
        if self.id == 0 {
            self.id = local.id;
        }
        if self.username.is_empty() {
            self.username.clone_from(&local.username);
        }
        self
    }
}

/// Body of `POST /login` and `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful `POST /login` or `POST /register` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: u64,
    pub username: String,
    pub data: UserData,
}

impl AuthResponse {
    /// The user document with the account fields filled in.
    pub fn into_user_data(self) -> UserData {
        UserData {
            id: self.id,
            username: self.username,
            ..self.data
        }
    }
}
