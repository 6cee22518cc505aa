//! Integration tests for the screen flows against an in-memory backend
//!
//! These walk the user-facing scenarios end to end: add a pet, edit a
//! medicine, lose the network, resolve a share invite.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use furmeds_core::form::{FieldPresenter, MedicineField, PetField};
use furmeds_core::{
    EmailAddress, FixedPrompter, Food, FurMedsError, FurMedsResult, InviteList, Medicine,
    Notification, Notifier, Pet, PetEditor, PetList, PetShareInvite, PetsApi, RecordId, Species,
    ToDo, ValidationError,
};
use parking_lot::Mutex;

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct FakeBackend {
    offline: AtomicBool,
    pets: Mutex<Vec<Pet>>,
    invites: Mutex<Vec<PetShareInvite>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn call(&self, name: String) -> FurMedsResult<()> {
        self.calls.lock().push(name);
        if self.offline.load(Ordering::SeqCst) {
            return Err(FurMedsError::Api("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PetsApi for FakeBackend {
    async fn list_pets(&self) -> FurMedsResult<Vec<Pet>> {
        self.call("listPets".to_string())?;
        Ok(self.pets.lock().clone())
    }

    async fn create_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
        self.call(format!("createPet({})", pet.name))?;
        let mut pets = self.pets.lock();
        pets.push(pet.clone());
        Ok(pets.clone())
    }

    async fn update_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
        self.call(format!("updatePet({})", pet.name))?;
        let mut pets = self.pets.lock();
        if let Some(slot) = pets.iter_mut().find(|p| p.id == pet.id) {
            *slot = pet.clone();
        }
        Ok(pets.clone())
    }

    async fn delete_pet(&self, id: &RecordId) -> FurMedsResult<()> {
        self.call(format!("deletePet({id})"))?;
        self.pets.lock().retain(|p| &p.id != id);
        Ok(())
    }

    async fn list_pet_medicines(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
        self.call(format!("getPetMedicines({pet_id})"))?;
        let pets = self.pets.lock();
        Ok(pets
            .iter()
            .find(|p| &p.id == pet_id)
            .map(|p| p.medicines().to_vec())
            .unwrap_or_default())
    }

    async fn add_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
        self.call(format!("addPetMedicine({})", medicine.name))?;
        Ok(vec![medicine.clone()])
    }

    async fn update_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
        self.call(format!("updatePetMedicine({})", medicine.name))?;
        Ok(vec![medicine.clone()])
    }

    async fn delete_pet_medicine(&self, id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
        self.call(format!("deletePetMedicine({id})"))?;
        Ok(Vec::new())
    }

    async fn list_pet_foods(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Food>> {
        self.call(format!("getPetFoods({pet_id})"))?;
        let pets = self.pets.lock();
        Ok(pets
            .iter()
            .find(|p| &p.id == pet_id)
            .map(|p| p.foods().to_vec())
            .unwrap_or_default())
    }

    async fn add_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
        self.call(format!("addPetFood({})", food.name))?;
        Ok(vec![food.clone()])
    }

    async fn update_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
        self.call(format!("updatePetFood({})", food.name))?;
        Ok(vec![food.clone()])
    }

    async fn delete_pet_food(&self, id: &RecordId) -> FurMedsResult<Vec<Food>> {
        self.call(format!("deletePetFood({id})"))?;
        Ok(Vec::new())
    }

    async fn invite_user_to_shared_pet(
        &self,
        pet_id: &RecordId,
        email: &EmailAddress,
    ) -> FurMedsResult<()> {
        self.call(format!("inviteUserToSharedPet({pet_id}, {email})"))
    }

    async fn list_share_invites(&self) -> FurMedsResult<Vec<PetShareInvite>> {
        self.call("listShareInvites".to_string())?;
        Ok(self.invites.lock().clone())
    }

    async fn accept_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
        self.call(format!("acceptInvite({pet_id})"))
    }

    async fn deny_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
        self.call(format!("denyInvite({pet_id})"))
    }

    async fn list_todos(&self) -> FurMedsResult<Vec<ToDo>> {
        self.call("listTodos".to_string())?;
        Ok(Vec::new())
    }

    async fn generate_todos(&self) -> FurMedsResult<()> {
        self.call("generateTodos".to_string())
    }
}

#[derive(Default)]
struct Notifications(Mutex<Vec<Notification>>);

impl Notifier for Notifications {
    fn notify(&self, notification: Notification) {
        self.0.lock().push(notification);
    }
}

impl Notifications {
    fn len(&self) -> usize {
        self.0.lock().len()
    }
}

fn setup() -> (Arc<FakeBackend>, Arc<Notifications>) {
    let _ = tracing_subscriber::fmt::try_init();
    (Arc::new(FakeBackend::default()), Arc::new(Notifications::default()))
}

// ============================================================================
// Scenarios
// ============================================================================

/// A dog named Rex without an image cannot be saved
#[tokio::test]
async fn test_add_pet_without_image_is_blocked() {
    let (backend, notifications) = setup();
    let mut list = PetList::new(backend.clone(), notifications.clone());
    let presenter = FieldPresenter::new(vec![
        PetField::Name("Rex".into()),
        PetField::parse_species("dog").unwrap(),
    ]);

    let result = list.add_pet(&presenter, "user-1").await;

    assert!(matches!(
        result,
        Err(FurMedsError::Validation(ValidationError::MissingImage))
    ));
    assert!(backend.calls().is_empty(), "nothing may be sent");
    assert!(list.pets().is_empty());
}

/// Renaming medicine M1 keeps one entry with the same identity
#[tokio::test]
async fn test_update_medicine_in_place() {
    let (backend, notifications) = setup();
    let aspirin = Medicine::new("Aspirin", "1 pill");
    let m1 = aspirin.id;
    let mut pet = Pet::new("user-1")
        .with_name("Rex")
        .with_species(Species::Dog)
        .with_image("https://cdn.example.com/rex.png");
    pet.medicines = Some(vec![aspirin, Medicine::new("Vitamin", "2 drops")]);
    backend.pets.lock().push(pet.clone());

    let mut editor = PetEditor::open(pet, backend.clone(), notifications.clone());
    editor
        .edit_record::<Medicine, _, _>(
            &FieldPresenter::new(vec![MedicineField::Name("Ibuprofen".into())]),
            &FixedPrompter::cancel(),
            Some(&m1),
        )
        .await
        .unwrap();

    let matching: Vec<_> = editor
        .pet()
        .medicines()
        .iter()
        .filter(|m| m.id == m1)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name, "Ibuprofen");
    assert_eq!(editor.pet().medicines().len(), 2);
    assert_eq!(editor.pet().medicines()[1].name, "Vitamin");
}

/// A failing list call empties the list and notifies the user
#[tokio::test]
async fn test_list_pets_failure_empties_list() {
    let (backend, notifications) = setup();
    backend.pets.lock().push(Pet::new("user-1").with_name("Rex"));
    let mut list = PetList::new(backend.clone(), notifications.clone());

    list.refresh().await;
    assert_eq!(list.pets().len(), 1);

    backend.set_offline(true);
    list.refresh().await;

    assert!(list.pets().is_empty(), "stale pets must not be kept");
    assert_eq!(notifications.len(), 1);
}

/// Accepting invite P7 makes exactly one call and removes it on success
#[tokio::test]
async fn test_accept_invite_success() {
    let (backend, notifications) = setup();
    let p7 = Pet::new("owner").with_name("P7");
    let p7_id = p7.id;
    backend.invites.lock().push(PetShareInvite {
        pet: p7,
        owner_email: "owner@example.com".to_string(),
    });
    let mut invites = InviteList::new(backend.clone(), notifications.clone());
    invites.load().await;

    invites.accept(&p7_id).await.unwrap();

    let accepts: Vec<_> = backend
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("acceptInvite"))
        .collect();
    assert_eq!(accepts, vec![format!("acceptInvite({p7_id})")]);
    assert!(invites.is_empty());
    assert_eq!(notifications.len(), 0);
}

/// A failed accept keeps the invite in the list
#[tokio::test]
async fn test_accept_invite_failure_keeps_invite() {
    let (backend, notifications) = setup();
    let p7 = Pet::new("owner").with_name("P7");
    let p7_id = p7.id;
    backend.invites.lock().push(PetShareInvite {
        pet: p7,
        owner_email: "owner@example.com".to_string(),
    });
    let mut invites = InviteList::new(backend.clone(), notifications.clone());
    invites.load().await;

    backend.set_offline(true);
    let result = invites.accept(&p7_id).await;

    assert!(result.is_err());
    assert_eq!(invites.invites().len(), 1);
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        backend.calls().iter().filter(|c| c.starts_with("acceptInvite")).count(),
        1
    );
}

/// Sharing a pet sends the address typed into the prompt
#[tokio::test]
async fn test_share_pet_with_friend() {
    let (backend, notifications) = setup();
    let pet = Pet::new("user-1").with_name("Rex");
    let pet_id = pet.id;
    let editor = PetEditor::open(pet, backend.clone(), notifications);

    let invited = editor
        .invite_user(&FixedPrompter::confirm_with("friend@example.com"))
        .await
        .unwrap();

    assert_eq!(invited.unwrap().as_str(), "friend@example.com");
    assert_eq!(
        backend.calls(),
        vec![format!("inviteUserToSharedPet({pet_id}, friend@example.com)")]
    );
}

/// Deleting a pet refreshes the list from the backend
#[tokio::test]
async fn test_delete_pet_end_to_end() {
    let (backend, notifications) = setup();
    let rex = Pet::new("user-1").with_name("Rex");
    let tom = Pet::new("user-1").with_name("Tom");
    let rex_id = rex.id;
    backend.pets.lock().extend([rex, tom]);
    let mut list = PetList::new(backend.clone(), notifications);
    list.refresh().await;

    assert!(list.delete_pet(&FixedPrompter::confirm(), &rex_id).await.unwrap());

    let names: Vec<_> = list.pets().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Tom"]);
}
