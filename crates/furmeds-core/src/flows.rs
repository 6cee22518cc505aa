//! Screen flows
//!
//! Each flow owns the state one screen shows and wires the user's
//! actions to the backend: forms through [`crate::form`], destructive
//! actions through [`crate::confirm`], failures through a
//! [`crate::notify::Notifier`].

pub mod editor;
pub mod invites;
pub mod pets;
pub mod photo;

pub use editor::PetEditor;
pub use invites::InviteList;
pub use pets::PetList;
pub use photo::capture_and_upload;

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::api::PetsApi;
    use crate::error::{FurMedsError, FurMedsResult};
    use crate::notify::{Notification, Notifier};
    use crate::types::{EmailAddress, Food, Medicine, Pet, PetShareInvite, RecordId, ToDo};

    /// In-memory backend that records every call
    #[derive(Default)]
    pub(crate) struct FakeApi {
        fail: bool,
        pets: Mutex<Vec<Pet>>,
        invites: Vec<PetShareInvite>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn with_pets(pets: Vec<Pet>) -> Self {
            Self {
                pets: Mutex::new(pets),
                ..Self::default()
            }
        }

        pub(crate) fn with_invites(invites: Vec<PetShareInvite>) -> Self {
            Self {
                invites,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: String) -> FurMedsResult<()> {
            self.calls.lock().push(call);
            if self.fail {
                return Err(FurMedsError::Api("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PetsApi for FakeApi {
        async fn list_pets(&self) -> FurMedsResult<Vec<Pet>> {
            self.record("list_pets".to_string())?;
            Ok(self.pets.lock().clone())
        }

        async fn create_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
            self.record(format!("create {}", pet.name))?;
            let mut pets = self.pets.lock();
            pets.push(pet.clone());
            Ok(pets.clone())
        }

        async fn update_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
            self.record(format!("update {}", pet.id))?;
            let mut pets = self.pets.lock();
            if let Some(slot) = pets.iter_mut().find(|p| p.id == pet.id) {
                *slot = pet.clone();
            }
            Ok(pets.clone())
        }

        async fn delete_pet(&self, id: &RecordId) -> FurMedsResult<()> {
            self.record(format!("delete {id}"))?;
            self.pets.lock().retain(|p| &p.id != id);
            Ok(())
        }

        async fn list_pet_medicines(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
            self.record(format!("list_medicines {pet_id}"))?;
            Ok(Vec::new())
        }

        async fn add_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
            self.record(format!("add_medicine {}", medicine.id))?;
            Ok(vec![medicine.clone()])
        }

        async fn update_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
            self.record(format!("update_medicine {}", medicine.id))?;
            Ok(vec![medicine.clone()])
        }

        async fn delete_pet_medicine(&self, id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
            self.record(format!("delete_medicine {id}"))?;
            Ok(Vec::new())
        }

        async fn list_pet_foods(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Food>> {
            self.record(format!("list_foods {pet_id}"))?;
            Ok(Vec::new())
        }

        async fn add_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
            self.record(format!("add_food {}", food.id))?;
            Ok(vec![food.clone()])
        }

        async fn update_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
            self.record(format!("update_food {}", food.id))?;
            Ok(vec![food.clone()])
        }

        async fn delete_pet_food(&self, id: &RecordId) -> FurMedsResult<Vec<Food>> {
            self.record(format!("delete_food {id}"))?;
            Ok(Vec::new())
        }

        async fn invite_user_to_shared_pet(
            &self,
            pet_id: &RecordId,
            email: &EmailAddress,
        ) -> FurMedsResult<()> {
            self.record(format!("invite {pet_id} {email}"))
        }

        async fn list_share_invites(&self) -> FurMedsResult<Vec<PetShareInvite>> {
            self.record("list_share_invites".to_string())?;
            Ok(self.invites.clone())
        }

        async fn accept_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
            self.record(format!("accept {pet_id}"))
        }

        async fn deny_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
            self.record(format!("deny {pet_id}"))
        }

        async fn list_todos(&self) -> FurMedsResult<Vec<ToDo>> {
            self.record("list_todos".to_string())?;
            Ok(Vec::new())
        }

        async fn generate_todos(&self) -> FurMedsResult<()> {
            self.record("generate_todos".to_string())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        pub(crate) fn count(&self) -> usize {
            self.seen.lock().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.lock().push(notification);
        }
    }
}
