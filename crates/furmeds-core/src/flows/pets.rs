//! Pet list screen

use std::sync::Arc;

use tracing::{info, warn};

use super::editor::PetEditor;
use crate::api::PetsApi;
use crate::confirm::{confirm, Prompt, Prompter};
use crate::error::{FurMedsError, FurMedsResult};
use crate::form::{AddPetForm, FormPresenter, Outcome};
use crate::notify::{Notification, Notifier};
use crate::types::{Pet, RecordId};

/// The signed-in user's pets, own and shared
pub struct PetList {
    api: Arc<dyn PetsApi>,
    notifier: Arc<dyn Notifier>,
    pets: Vec<Pet>,
}

impl PetList {
    pub fn new(api: Arc<dyn PetsApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            pets: Vec::new(),
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn get(&self, id: &RecordId) -> Option<&Pet> {
        self.pets.iter().find(|p| &p.id == id)
    }

    /// Look a pet up by identity, or by name (case-insensitive).
    pub fn find(&self, key: &str) -> Option<&Pet> {
        if let Ok(id) = RecordId::parse(key) {
            if let Some(pet) = self.get(&id) {
                return Some(pet);
            }
        }
        let key = key.trim();
        self.pets.iter().find(|p| p.name.eq_ignore_ascii_case(key))
    }

    /// Reload from the backend. On failure the list is emptied and the
    /// user notified; stale pets are never kept.
    pub async fn refresh(&mut self) {
        match self.api.list_pets().await {
            Ok(pets) => {
                info!(count = pets.len(), "Loaded pets");
                self.pets = pets;
            }
            Err(e) => {
                warn!(error = %e, "Loading pets failed, showing empty list");
                self.pets.clear();
                self.notifier
                    .notify(Notification::request_failed("Loading pets", &e));
            }
        }
    }

    /// Show the add-pet form and create the pet on save.
    ///
    /// Validation happens before anything is sent.
    pub async fn add_pet<P>(&mut self, presenter: &P, user_uid: &str) -> FurMedsResult<Outcome<Pet>>
    where
        P: FormPresenter<AddPetForm> + ?Sized,
    {
        let form = match presenter.present(AddPetForm::new(user_uid)).await {
            Outcome::Saved(form) => form,
            Outcome::Cancelled | Outcome::Deleted => return Ok(Outcome::Cancelled),
        };

        let pet = form.finish()?;
        match self.api.create_pet(&pet).await {
            Ok(pets) => {
                info!(pet_id = %pet.id, name = %pet.name, "Pet added");
                self.pets = pets;
                Ok(Outcome::Saved(pet))
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::request_failed("Adding pet", &e));
                Err(e)
            }
        }
    }

    /// Open the pet detail screen.
    ///
    /// `Saved` persists the edited pet; `Deleted` runs the delete
    /// confirmation for it.
    pub async fn open_pet<P, Q>(
        &mut self,
        id: &RecordId,
        presenter: &P,
        prompter: &Q,
    ) -> FurMedsResult<Outcome<Pet>>
    where
        P: FormPresenter<PetEditor> + ?Sized,
        Q: Prompter + ?Sized,
    {
        let pet = self
            .get(id)
            .cloned()
            .ok_or_else(|| FurMedsError::PetNotFound(id.to_string()))?;
        let editor = PetEditor::open(pet, self.api.clone(), self.notifier.clone());

        match presenter.present(editor).await {
            Outcome::Cancelled => Ok(Outcome::Cancelled),
            Outcome::Saved(editor) => {
                let pet = editor.into_pet();
                self.save(&pet).await?;
                Ok(Outcome::Saved(pet))
            }
            Outcome::Deleted => {
                if self.delete_pet(prompter, id).await? {
                    Ok(Outcome::Deleted)
                } else {
                    Ok(Outcome::Cancelled)
                }
            }
        }
    }

    /// Persist `pet` and take over the list the backend answers with.
    pub async fn save(&mut self, pet: &Pet) -> FurMedsResult<()> {
        match self.api.update_pet(pet).await {
            Ok(pets) => {
                self.pets = pets;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::request_failed("Saving pet", &e));
                Err(e)
            }
        }
    }

    /// Ask, then delete the pet and reload the list.
    ///
    /// Returns whether the pet was deleted. On failure the list is left
    /// as it was.
    pub async fn delete_pet<Q>(&mut self, prompter: &Q, id: &RecordId) -> FurMedsResult<bool>
    where
        Q: Prompter + ?Sized,
    {
        let name = self
            .get(id)
            .map(|p| p.name.clone())
            .ok_or_else(|| FurMedsError::PetNotFound(id.to_string()))?;

        let confirmed = confirm(prompter, &Prompt::delete_pet(&name), |_| true, || false).await;
        if !confirmed {
            return Ok(false);
        }

        if let Err(e) = self.api.delete_pet(id).await {
            self.notifier
                .notify(Notification::request_failed("Deleting pet", &e));
            return Err(e);
        }

        info!(pet_id = %id, name = %name, "Pet deleted");
        self.refresh().await;
        Ok(true)
    }
}
