//! Sub-form orchestration
//!
//! A sub-form edits one record (a medicine, a food, a vet appointment, a
//! frequency) on a detached draft. The UI drives the form through a
//! [`FormPresenter`] and hands back an [`Outcome`]; the orchestrator then
//! merges a saved draft into the parent by identity.

mod fields;

pub use fields::{
    FoodField, FoodFrequencyField, MedicineField, MedicineFrequencyField, PetField,
    VetAppointmentField,
};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{FurMedsError, ValidationError};
use crate::state::{self, Holds, SubRecord};
use crate::types::{Pet, RecordId};

/// How a form was dismissed
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Dismissed without saving; no state changes
    Cancelled,
    /// Saved with the edited payload
    Saved(T),
    /// The user asked to delete the record being edited
    Deleted,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn saved(self) -> Option<T> {
        match self {
            Outcome::Saved(value) => Some(value),
            _ => None,
        }
    }

    /// Dismiss role as the UI layer names it
    pub fn role(&self) -> &'static str {
        match self {
            Outcome::Cancelled => "cancel",
            Outcome::Saved(_) => "save",
            Outcome::Deleted => "delete",
        }
    }
}

/// Whether a form creates a record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Update,
}

/// A record that can be edited through a sub-form
pub trait Draft: SubRecord {
    /// Typed field edit accepted by the form
    type Field: Send + Sync;

    /// Empty record with a freshly generated identity
    fn blank() -> Self;

    fn apply(&mut self, field: Self::Field);

    /// Checked when the form is saved, before anything is merged
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Detached draft of one record plus its mode
#[derive(Debug, Clone)]
pub struct SubForm<R> {
    mode: FormMode,
    draft: R,
}

impl<R: Draft> SubForm<R> {
    /// Open pre-populated with `existing` (Update), or blank with a fresh
    /// identity (Add).
    pub fn open(existing: Option<R>) -> Self {
        match existing {
            Some(record) => Self {
                mode: FormMode::Update,
                draft: record,
            },
            None => Self {
                mode: FormMode::Add,
                draft: R::blank(),
            },
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &R {
        &self.draft
    }

    pub fn id(&self) -> &RecordId {
        self.draft.id()
    }

    pub fn apply(&mut self, field: R::Field) {
        self.draft.apply(field);
    }

    /// Validate and release the draft
    pub fn finish(self) -> Result<R, ValidationError> {
        self.draft.validate()?;
        Ok(self.draft)
    }
}

/// A form's draft may itself hold nested records (a medicine draft holds
/// its frequencies), so nested sub-forms can be opened on it.
impl<R, N> Holds<N> for SubForm<R>
where
    R: Draft + Holds<N>,
    N: SubRecord,
{
    fn collection(&self) -> Option<&Vec<N>> {
        self.draft.collection()
    }

    fn collection_mut(&mut self) -> Option<&mut Vec<N>> {
        self.draft.collection_mut()
    }

    fn collection_or_create(&mut self) -> &mut Vec<N> {
        self.draft.collection_or_create()
    }
}

/// The UI side of a form: shows it, lets the user edit, reports how it
/// was dismissed.
#[async_trait]
pub trait FormPresenter<F: Send + 'static>: Send + Sync {
    async fn present(&self, form: F) -> Outcome<F>;
}

/// Present a sub-form for `R` and merge the result into `holder`.
///
/// - `Cancelled`: nothing changes.
/// - `Saved` in Add mode: the draft is appended.
/// - `Saved` in Update mode: the entry with the draft's identity is replaced.
/// - `Deleted` in Update mode: returned unmerged; the caller removes the
///   entry only after confirmation.
/// - `Deleted` in Add mode: treated as `Cancelled`.
///
/// A saved draft that fails validation is rejected before any merge.
/// The holder is never shrunk here.
pub async fn open_sub_form<H, R, P>(
    holder: &mut H,
    presenter: &P,
    existing: Option<&R>,
) -> Result<Outcome<R>, FurMedsError>
where
    H: Holds<R> + Send + ?Sized,
    R: Draft,
    P: FormPresenter<SubForm<R>> + ?Sized,
{
    let form = SubForm::open(existing.cloned());
    let mode = form.mode();
    let id = *form.id();
    info!(kind = R::KIND, ?mode, %id, "Opening sub-form");

    match presenter.present(form).await {
        Outcome::Cancelled => {
            debug!(kind = R::KIND, %id, "Sub-form cancelled");
            Ok(Outcome::Cancelled)
        }
        Outcome::Saved(form) => {
            let record = form.finish()?;
            match mode {
                FormMode::Add => state::attach(holder, record.clone()),
                FormMode::Update => {
                    state::replace(holder, &id, record.clone());
                }
            }
            Ok(Outcome::Saved(record))
        }
        Outcome::Deleted if mode == FormMode::Add => {
            debug!(kind = R::KIND, %id, "Delete on an unsaved draft, treated as cancel");
            Ok(Outcome::Cancelled)
        }
        Outcome::Deleted => {
            debug!(kind = R::KIND, %id, "Sub-form asked for deletion");
            Ok(Outcome::Deleted)
        }
    }
}

/// Form for registering a new pet
///
/// Saving requires a name, a species and an uploaded image, checked in
/// that order.
#[derive(Debug, Clone)]
pub struct AddPetForm {
    draft: Pet,
}

impl AddPetForm {
    pub fn new(user_uid: impl Into<String>) -> Self {
        Self {
            draft: Pet::new(user_uid),
        }
    }

    pub fn draft(&self) -> &Pet {
        &self.draft
    }

    pub fn apply(&mut self, field: PetField) {
        field.apply_to(&mut self.draft);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.draft.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.draft.species.is_none() {
            return Err(ValidationError::MissingSpecies);
        }
        if self.draft.image.as_deref().map_or(true, |i| i.trim().is_empty()) {
            return Err(ValidationError::MissingImage);
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Pet, ValidationError> {
        self.validate()?;
        Ok(self.draft)
    }
}

/// Presenter that applies a fixed list of field edits and saves
///
/// Used where the fields are already known up front (command line,
/// scripted flows).
#[derive(Debug, Clone)]
pub struct FieldPresenter<C> {
    fields: Vec<C>,
}

impl<C> FieldPresenter<C> {
    pub fn new(fields: Vec<C>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[C] {
        &self.fields
    }
}

#[async_trait]
impl<R> FormPresenter<SubForm<R>> for FieldPresenter<R::Field>
where
    R: Draft,
    R::Field: Clone,
{
    async fn present(&self, mut form: SubForm<R>) -> Outcome<SubForm<R>> {
        for field in &self.fields {
            form.apply(field.clone());
        }
        Outcome::Saved(form)
    }
}

#[async_trait]
impl FormPresenter<AddPetForm> for FieldPresenter<PetField> {
    async fn present(&self, mut form: AddPetForm) -> Outcome<AddPetForm> {
        for field in &self.fields {
            form.apply(field.clone());
        }
        Outcome::Saved(form)
    }
}

/// Presenter that dismisses every form without saving
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelPresenter;

#[async_trait]
impl<F: Send + 'static> FormPresenter<F> for CancelPresenter {
    async fn present(&self, _form: F) -> Outcome<F> {
        Outcome::Cancelled
    }
}
