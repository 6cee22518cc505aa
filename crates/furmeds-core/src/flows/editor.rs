//! Pet detail screen
//!
//! Wraps a [`PetState`] with the actions the detail screen offers:
//! editing the pet's own fields, opening sub-forms for medicines, foods,
//! vet appointments and their schedules, deleting them after
//! confirmation, taking a photo and sharing the pet.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::photo::capture_and_upload;
use crate::api::PetsApi;
use crate::confirm::{confirm, Prompt, Prompter};
use crate::error::{FurMedsError, FurMedsResult, ValidationError};
use crate::form::{open_sub_form, Draft, FieldPresenter, FormPresenter, Outcome, PetField};
use crate::notify::{Notification, Notifier};
use crate::providers::{Camera, ObjectStorage};
use crate::state::{self, Holds, PetState, SubRecord};
use crate::types::{EmailAddress, Pet, RecordId};

fn not_found<R: SubRecord>(id: &RecordId) -> FurMedsError {
    FurMedsError::RecordNotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

pub struct PetEditor {
    state: PetState,
    api: Arc<dyn PetsApi>,
    notifier: Arc<dyn Notifier>,
}

impl PetEditor {
    pub fn open(pet: Pet, api: Arc<dyn PetsApi>, notifier: Arc<dyn Notifier>) -> Self {
        debug!(pet_id = %pet.id, "Opening pet");
        Self {
            state: PetState::new(pet),
            api,
            notifier,
        }
    }

    pub fn pet(&self) -> &Pet {
        self.state.pet()
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn into_pet(self) -> Pet {
        self.state.into_pet()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Edit one of the pet's own fields
    pub fn apply(&mut self, field: PetField) {
        field.apply_to(self.state.pet_mut());
    }

    /// Add a record (`existing` is `None`) or edit the one with that
    /// identity.
    ///
    /// A delete requested from the form goes through the same
    /// confirmation as [`PetEditor::delete_record`]; if the user declines,
    /// the outcome is `Cancelled` and the record stays.
    pub async fn edit_record<R, P, Q>(
        &mut self,
        presenter: &P,
        prompter: &Q,
        existing: Option<&RecordId>,
    ) -> FurMedsResult<Outcome<R>>
    where
        Pet: Holds<R>,
        R: Draft,
        P: FormPresenter<crate::form::SubForm<R>> + ?Sized,
        Q: Prompter + ?Sized,
    {
        let existing = existing
            .map(|id| self.state.get::<R>(id).cloned().ok_or_else(|| not_found::<R>(id)))
            .transpose()?;

        let outcome = open_sub_form(&mut self.state, presenter, existing.as_ref()).await?;
        match (outcome, existing) {
            (Outcome::Deleted, Some(record)) => {
                match self.delete_record::<R, Q>(prompter, record.id()).await {
                    Some(_) => Ok(Outcome::Deleted),
                    None => Ok(Outcome::Cancelled),
                }
            }
            (Outcome::Deleted, None) => Ok(Outcome::Cancelled),
            (outcome, _) => Ok(outcome),
        }
    }

    /// Ask, then remove the record with identity `id`.
    ///
    /// An unknown identity returns `None` without asking.
    pub async fn delete_record<R, Q>(&mut self, prompter: &Q, id: &RecordId) -> Option<R>
    where
        Pet: Holds<R>,
        R: SubRecord,
        Q: Prompter + ?Sized,
    {
        let label = self.state.get::<R>(id)?.label();
        let prompt = Prompt::delete(R::KIND, &label);

        let confirmed = confirm(prompter, &prompt, |_| true, || false).await;
        if !confirmed {
            return None;
        }
        info!(kind = R::KIND, %id, label = %label, "Deleting record");
        self.state.remove::<R>(id)
    }

    /// Add or edit a schedule entry of the record `parent_id`.
    ///
    /// Deletion requested from the form is confirmed like
    /// [`PetEditor::delete_frequency`].
    pub async fn edit_frequency<R, F, P, Q>(
        &mut self,
        parent_id: &RecordId,
        presenter: &P,
        prompter: &Q,
        existing: Option<&RecordId>,
    ) -> FurMedsResult<Outcome<F>>
    where
        Pet: Holds<R>,
        R: SubRecord + Holds<F>,
        F: Draft,
        P: FormPresenter<crate::form::SubForm<F>> + ?Sized,
        Q: Prompter + ?Sized,
    {
        let parent = self
            .state
            .get::<R>(parent_id)
            .ok_or_else(|| not_found::<R>(parent_id))?;
        let existing = existing
            .map(|id| {
                state::find::<R, F>(parent, id)
                    .cloned()
                    .ok_or_else(|| not_found::<F>(id))
            })
            .transpose()?;

        let mut draft_parent = parent.clone();
        let outcome = open_sub_form(&mut draft_parent, presenter, existing.as_ref()).await?;
        match (outcome, existing) {
            (Outcome::Saved(record), _) => {
                if let Some(slot) = self.state.get_mut::<R>(parent_id) {
                    *slot = draft_parent;
                }
                self.state.mark_dirty();
                Ok(Outcome::Saved(record))
            }
            (Outcome::Deleted, Some(record)) => {
                let removed = self
                    .delete_frequency::<R, F, Q>(prompter, parent_id, record.id())
                    .await;
                Ok(if removed.is_some() {
                    Outcome::Deleted
                } else {
                    Outcome::Cancelled
                })
            }
            _ => Ok(Outcome::Cancelled),
        }
    }

    /// Ask, then remove schedule entry `id` of the record `parent_id`.
    pub async fn delete_frequency<R, F, Q>(
        &mut self,
        prompter: &Q,
        parent_id: &RecordId,
        id: &RecordId,
    ) -> Option<F>
    where
        Pet: Holds<R>,
        R: SubRecord + Holds<F>,
        F: SubRecord,
        Q: Prompter + ?Sized,
    {
        let label = state::find::<R, F>(self.state.get::<R>(parent_id)?, id)?.label();

        let confirmed = confirm(prompter, &Prompt::delete(F::KIND, &label), |_| true, || false).await;
        if !confirmed {
            return None;
        }
        let removed = state::remove::<R, F>(self.state.get_mut::<R>(parent_id)?, id);
        if removed.is_some() {
            self.state.mark_dirty();
        }
        removed
    }

    /// Take a photo, upload it and set it as the pet's image.
    pub async fn add_picture<C, S>(&mut self, camera: &C, storage: &S, user_uid: &str) -> FurMedsResult<String>
    where
        C: Camera + ?Sized,
        S: ObjectStorage + ?Sized,
    {
        let pet_id = self.pet().id;
        match capture_and_upload(camera, storage, user_uid, &pet_id).await {
            Ok(url) => {
                self.apply(PetField::Image(url.clone()));
                Ok(url)
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::request_failed("Adding picture", &e));
                Err(e)
            }
        }
    }

    /// Ask for an e-mail address and invite that user to share the pet.
    ///
    /// Returns `None` when the user cancels.
    pub async fn invite_user<Q>(&self, prompter: &Q) -> FurMedsResult<Option<EmailAddress>>
    where
        Q: Prompter + ?Sized,
    {
        let prompt = Prompt::share_pet(&self.pet().name);
        let Some(raw) = confirm(prompter, &prompt, Some, || None).await else {
            return Ok(None);
        };
        let raw = raw.ok_or(ValidationError::EmptyField("email"))?;
        let email = EmailAddress::parse(&raw)?;

        match self.api.invite_user_to_shared_pet(&self.pet().id, &email).await {
            Ok(()) => {
                info!(pet_id = %self.pet().id, email = %email, "Share invite sent");
                Ok(Some(email))
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::request_failed("Sharing pet", &e));
                Err(e)
            }
        }
    }
}

#[async_trait]
impl FormPresenter<PetEditor> for FieldPresenter<PetField> {
    async fn present(&self, mut editor: PetEditor) -> Outcome<PetEditor> {
        for field in self.fields() {
            editor.apply(field.clone());
        }
        Outcome::Saved(editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::FixedPrompter;
    use crate::flows::testing::{FakeApi, RecordingNotifier};
    use crate::form::{CancelPresenter, MedicineField, MedicineFrequencyField};
    use crate::types::{Medicine, MedicineFrequency, TimeOfDay, VetAppointment};

    struct DeletePresenter;

    #[async_trait]
    impl<F: Send + 'static> FormPresenter<F> for DeletePresenter {
        async fn present(&self, _form: F) -> Outcome<F> {
            Outcome::Deleted
        }
    }

    fn editor_with(api: Arc<FakeApi>, notifier: Arc<RecordingNotifier>) -> PetEditor {
        PetEditor::open(Pet::new("u1").with_name("Rex"), api, notifier)
    }

    #[tokio::test]
    async fn test_edit_record_add_then_update() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());

        let added = editor
            .edit_record::<Medicine, _, _>(
                &FieldPresenter::new(vec![MedicineField::Name("Aspirin".into())]),
                &FixedPrompter::cancel(),
                None,
            )
            .await
            .unwrap()
            .saved()
            .unwrap();

        editor
            .edit_record::<Medicine, _, _>(
                &FieldPresenter::new(vec![MedicineField::Name("Ibuprofen".into())]),
                &FixedPrompter::cancel(),
                Some(&added.id),
            )
            .await
            .unwrap();

        let medicines = editor.pet().medicines();
        assert_eq!(medicines.len(), 1);
        assert_eq!(medicines[0].id, added.id);
        assert_eq!(medicines[0].name, "Ibuprofen");
    }

    #[tokio::test]
    async fn test_edit_unknown_record_is_not_found() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let result = editor
            .edit_record::<Medicine, _, _>(
                &CancelPresenter,
                &FixedPrompter::confirm(),
                Some(&RecordId::new()),
            )
            .await;
        assert!(matches!(result, Err(FurMedsError::RecordNotFound { kind: "medicine", .. })));
    }

    #[tokio::test]
    async fn test_delete_record_needs_confirmation() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let appointment = VetAppointment::new("Checkup");
        let id = appointment.id;
        editor.state.attach(appointment);

        assert!(editor
            .delete_record::<VetAppointment, _>(&FixedPrompter::cancel(), &id)
            .await
            .is_none());
        assert_eq!(editor.pet().vet_appointments().len(), 1);

        assert!(editor
            .delete_record::<VetAppointment, _>(&FixedPrompter::confirm(), &id)
            .await
            .is_some());
        assert!(editor.pet().vet_appointments().is_empty());
    }

    #[tokio::test]
    async fn test_delete_from_form_asks_first() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let medicine = Medicine::new("Aspirin", "1 pill");
        let id = medicine.id;
        editor.state.attach(medicine);

        let declined = editor
            .edit_record::<Medicine, _, _>(&DeletePresenter, &FixedPrompter::cancel(), Some(&id))
            .await
            .unwrap();
        assert!(declined.is_cancelled());
        assert_eq!(editor.pet().medicines().len(), 1);

        let confirmed = editor
            .edit_record::<Medicine, _, _>(&DeletePresenter, &FixedPrompter::confirm(), Some(&id))
            .await
            .unwrap();
        assert_eq!(confirmed, Outcome::Deleted);
        assert!(editor.pet().medicines().is_empty());
    }

    #[tokio::test]
    async fn test_delete_frequency_from_form_asks_first() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let mut medicine = Medicine::new("Aspirin", "1 pill");
        let freq = MedicineFrequency::new(TimeOfDay::new(8, 0).unwrap(), 1);
        let (medicine_id, freq_id) = (medicine.id, freq.id);
        medicine.frequencies.push(freq);
        editor.state.attach(medicine);

        let outcome = editor
            .edit_frequency::<Medicine, MedicineFrequency, _, _>(
                &medicine_id,
                &DeletePresenter,
                &FixedPrompter::cancel(),
                Some(&freq_id),
            )
            .await
            .unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(editor.pet().medicines()[0].frequencies.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_on_new_frequency_changes_nothing() {
        let medicine = Medicine::new("Aspirin", "1 pill");
        let medicine_id = medicine.id;
        let mut pet = Pet::new("u1").with_name("Rex");
        pet.medicines = Some(vec![medicine]);
        let mut editor = PetEditor::open(
            pet,
            Arc::new(FakeApi::default()),
            Arc::new(RecordingNotifier::default()),
        );

        let outcome = editor
            .edit_frequency::<Medicine, MedicineFrequency, _, _>(
                &medicine_id,
                &DeletePresenter,
                &FixedPrompter::confirm(),
                None,
            )
            .await
            .unwrap();

        assert!(outcome.is_cancelled());
        assert!(!editor.is_dirty());
        assert!(editor.pet().medicines()[0].frequencies.is_empty());
    }

    #[tokio::test]
    async fn test_frequency_lifecycle() {
        let mut editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let medicine = Medicine::new("Aspirin", "1 pill");
        let medicine_id = medicine.id;
        editor.state.attach(medicine);

        let freq = editor
            .edit_frequency::<Medicine, MedicineFrequency, _, _>(
                &medicine_id,
                &FieldPresenter::new(vec![MedicineFrequencyField::Time(
                    TimeOfDay::new(8, 0).unwrap(),
                )]),
                &FixedPrompter::cancel(),
                None,
            )
            .await
            .unwrap()
            .saved()
            .unwrap();
        assert_eq!(editor.pet().medicines()[0].frequencies, vec![freq.clone()]);

        let removed = editor
            .delete_frequency::<Medicine, MedicineFrequency, _>(
                &FixedPrompter::confirm(),
                &medicine_id,
                &freq.id,
            )
            .await;
        assert_eq!(removed, Some(freq));
        assert!(editor.pet().medicines()[0].frequencies.is_empty());
    }

    #[tokio::test]
    async fn test_invite_user_sends_parsed_email() {
        let api = Arc::new(FakeApi::default());
        let editor = editor_with(api.clone(), Arc::default());

        let email = editor
            .invite_user(&FixedPrompter::confirm_with(" friend@example.com "))
            .await
            .unwrap();

        assert_eq!(email.unwrap().as_str(), "friend@example.com");
        assert_eq!(
            api.calls(),
            vec![format!("invite {} friend@example.com", editor.pet().id)]
        );
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let api = Arc::new(FakeApi::default());
        let editor = editor_with(api.clone(), Arc::default());

        let result = editor.invite_user(&FixedPrompter::confirm_with("nope")).await;

        assert!(matches!(result, Err(FurMedsError::Validation(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_invite_without_email_is_rejected() {
        let api = Arc::new(FakeApi::default());
        let editor = editor_with(api.clone(), Arc::default());

        let result = editor.invite_user(&FixedPrompter::confirm()).await;

        assert!(matches!(
            result,
            Err(FurMedsError::Validation(ValidationError::EmptyField("email")))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_invite_notifies() {
        let api = Arc::new(FakeApi::failing());
        let notifier = Arc::new(RecordingNotifier::default());
        let editor = editor_with(api, notifier.clone());

        let result = editor
            .invite_user(&FixedPrompter::confirm_with("friend@example.com"))
            .await;

        assert!(result.is_err());
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_field_presenter_edits_pet() {
        let editor = editor_with(Arc::new(FakeApi::default()), Arc::default());
        let presenter = FieldPresenter::new(vec![PetField::Name("Max".into())]);

        let editor = presenter.present(editor).await.saved().unwrap();

        assert_eq!(editor.pet().name, "Max");
        assert!(editor.is_dirty());
    }
}
