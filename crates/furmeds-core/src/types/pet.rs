//! Pet: the root user-owned record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{empty_as_none, Food, Medicine, RecordId, VetAppointment};
use crate::error::ValidationError;

/// Species classification of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Cat,
    Dog,
    Other,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Cat, Species::Dog, Species::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Cat => "Cat",
            Species::Dog => "Dog",
            Species::Other => "Other",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cat" => Ok(Species::Cat),
            "dog" => Ok(Species::Dog),
            "other" => Ok(Species::Other),
            _ => Err(ValidationError::InvalidChoice {
                field: "species",
                value: s.to_string(),
            }),
        }
    }
}

/// Another user this pet is shared with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetShare {
    pub user_uid: String,
    #[serde(default)]
    pub share_accepted: bool,
}

/// A tracked pet with its nested medicines, foods and vet appointments
///
/// Nested collections are `Option` so that a collection the backend never
/// sent stays distinguishable from an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    #[serde(default)]
    pub user_uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub species: Option<Species>,
    #[serde(
        default,
        deserialize_with = "empty_as_none::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicines: Option<Vec<Medicine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foods: Option<Vec<Food>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vet_appointments: Option<Vec<VetAppointment>>,
    #[serde(
        default,
        rename = "sharedWithUsers",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub shared_with: Vec<PetShare>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<PetShare>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<PetShare>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Pet {
    /// Blank pet owned by `user_uid` with a fresh identity
    pub fn new(user_uid: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            user_uid: user_uid.into(),
            name: String::new(),
            species: None,
            image: None,
            medicines: None,
            foods: None,
            vet_appointments: None,
            shared_with: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether `user_uid` accepted a share of this pet
    pub fn is_shared_with(&self, user_uid: &str) -> bool {
        self.shared_with
            .iter()
            .any(|s| s.user_uid == user_uid && s.share_accepted)
    }

    pub fn medicines(&self) -> &[Medicine] {
        self.medicines.as_deref().unwrap_or_default()
    }

    pub fn foods(&self) -> &[Food] {
        self.foods.as_deref().unwrap_or_default()
    }

    pub fn vet_appointments(&self) -> &[VetAppointment] {
        self.vet_appointments.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pet_new_is_blank() {
        let pet = Pet::new("user-1");
        assert_eq!(pet.user_uid, "user-1");
        assert!(pet.name.is_empty());
        assert!(pet.species.is_none());
        assert!(pet.image.is_none());
        assert!(pet.medicines.is_none());
    }

    #[test]
    fn test_species_parse_is_case_insensitive() {
        assert_eq!("dog".parse::<Species>(), Ok(Species::Dog));
        assert_eq!(" CAT ".parse::<Species>(), Ok(Species::Cat));
        assert!("hamster".parse::<Species>().is_err());
    }

    #[test]
    fn test_pet_from_backend_json() {
        let json = r#"{
            "uuid": "6f1c2a9e-0b7d-4c1e-9a53-2f0d4e8b7c61",
            "userUid": "u1",
            "sharedWithUsers": null,
            "name": "Rex",
            "species": "Dog",
            "image": ""
        }"#;
        let pet: Pet = serde_json::from_str(json).unwrap();
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.species, Some(Species::Dog));
        assert!(pet.image.is_none());
        assert!(pet.shared_with.is_empty());
        assert!(pet.medicines.is_none());
    }

    #[test]
    fn test_pet_json_skips_unset_fields() {
        let pet = Pet::new("u1").with_name("Mia");
        let value = serde_json::to_value(&pet).unwrap();
        assert_eq!(value["name"], "Mia");
        assert_eq!(value["userUid"], "u1");
        assert!(value.get("species").is_none());
        assert!(value.get("medicines").is_none());
        assert!(value.get("sharedWithUsers").is_none());
    }

    #[test]
    fn test_is_shared_with_requires_acceptance() {
        let mut pet = Pet::new("owner");
        pet.shared_with.push(PetShare {
            user_uid: "friend".to_string(),
            share_accepted: false,
        });
        assert!(!pet.is_shared_with("friend"));
        pet.shared_with[0].share_accepted = true;
        assert!(pet.is_shared_with("friend"));
    }
}
