//! In-memory editing state for one pet and its nested collections
//!
//! Every sub-record carries its own [`RecordId`]; all updates and
//! removals match by identity, never by position, because collections
//! are mutated in place and positions shift.
//!
//! # Example
//!
//! ```
//! use furmeds_core::state::PetState;
//! use furmeds_core::{Medicine, Pet};
//!
//! let mut state = PetState::new(Pet::new("user-1").with_name("Rex"));
//! let aspirin = Medicine::new("Aspirin", "1 pill");
//! let id = aspirin.id;
//! state.attach(aspirin);
//!
//! let mut ibuprofen = state.get::<Medicine>(&id).unwrap().clone();
//! ibuprofen.name = "Ibuprofen".to_string();
//! assert!(state.replace(&id, ibuprofen));
//! assert_eq!(state.records::<Medicine>().len(), 1);
//! ```

use std::fmt::Debug;

use tracing::{debug, warn};

use crate::types::{
    Food, FoodFrequency, Medicine, MedicineFrequency, Pet, RecordId, VetAppointment,
};

/// A record nested inside a pet (or inside another sub-record)
pub trait SubRecord: Clone + Debug + Send + Sync + 'static {
    /// Collection name used in logs and prompts
    const KIND: &'static str;

    fn id(&self) -> &RecordId;

    /// Short human-readable label for confirmation prompts
    fn label(&self) -> String;
}

/// A parent that owns a collection of `R`
///
/// The collection may be absent; [`Holds::collection_or_create`] brings
/// it into existence on first attach.
pub trait Holds<R: SubRecord> {
    fn collection(&self) -> Option<&Vec<R>>;
    fn collection_mut(&mut self) -> Option<&mut Vec<R>>;
    fn collection_or_create(&mut self) -> &mut Vec<R>;

    /// Called after a record was actually added, replaced or removed
    fn mark_changed(&mut self) {}
}

/// Append `record`, creating the collection if absent.
///
/// No duplicate-identity check is made: callers use this only for
/// records produced by an Add flow.
pub fn attach<H, R>(holder: &mut H, record: R)
where
    H: Holds<R> + ?Sized,
    R: SubRecord,
{
    debug!(kind = R::KIND, id = %record.id(), "Attaching sub-record");
    holder.collection_or_create().push(record);
    holder.mark_changed();
}

/// Replace the entry whose identity is `id`.
///
/// Returns `false` and leaves the collection untouched when nothing
/// matches.
pub fn replace<H, R>(holder: &mut H, id: &RecordId, record: R) -> bool
where
    H: Holds<R> + ?Sized,
    R: SubRecord,
{
    let slot = holder
        .collection_mut()
        .and_then(|records| records.iter_mut().find(|r| r.id() == id));

    match slot {
        Some(existing) => {
            debug!(kind = R::KIND, %id, "Replacing sub-record");
            *existing = record;
            holder.mark_changed();
            true
        }
        None => {
            warn!(kind = R::KIND, %id, "No sub-record with this identity, update ignored");
            false
        }
    }
}

/// Remove the first entry whose identity is `id`, if any.
pub fn remove<H, R>(holder: &mut H, id: &RecordId) -> Option<R>
where
    H: Holds<R> + ?Sized,
    R: SubRecord,
{
    let records = holder.collection_mut()?;
    let index = records.iter().position(|r| r.id() == id)?;
    debug!(kind = R::KIND, %id, "Removing sub-record");
    let removed = records.remove(index);
    holder.mark_changed();
    Some(removed)
}

/// Look up an entry by identity.
pub fn find<'a, H, R>(holder: &'a H, id: &RecordId) -> Option<&'a R>
where
    H: Holds<R> + ?Sized,
    R: SubRecord,
{
    holder.collection()?.iter().find(|r| r.id() == id)
}

pub fn find_mut<'a, H, R>(holder: &'a mut H, id: &RecordId) -> Option<&'a mut R>
where
    H: Holds<R> + ?Sized,
    R: SubRecord,
{
    holder.collection_mut()?.iter_mut().find(|r| r.id() == id)
}

// ═══════════════════════════════════════════════════════════════════════
// Record kinds
// ═══════════════════════════════════════════════════════════════════════

impl SubRecord for Medicine {
    const KIND: &'static str = "medicine";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl SubRecord for Food {
    const KIND: &'static str = "food";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl SubRecord for VetAppointment {
    const KIND: &'static str = "vet appointment";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl SubRecord for MedicineFrequency {
    const KIND: &'static str = "frequency";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} every {} days", self.time, self.every_days)
    }
}

impl SubRecord for FoodFrequency {
    const KIND: &'static str = "feeding time";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        self.time.to_string()
    }
}

macro_rules! holds_optional {
    ($parent:ty, $record:ty, $field:ident) => {
        impl Holds<$record> for $parent {
            fn collection(&self) -> Option<&Vec<$record>> {
                self.$field.as_ref()
            }

            fn collection_mut(&mut self) -> Option<&mut Vec<$record>> {
                self.$field.as_mut()
            }

            fn collection_or_create(&mut self) -> &mut Vec<$record> {
                self.$field.get_or_insert_with(Vec::new)
            }
        }
    };
}

macro_rules! holds_required {
    ($parent:ty, $record:ty, $field:ident) => {
        impl Holds<$record> for $parent {
            fn collection(&self) -> Option<&Vec<$record>> {
                Some(&self.$field)
            }

            fn collection_mut(&mut self) -> Option<&mut Vec<$record>> {
                Some(&mut self.$field)
            }

            fn collection_or_create(&mut self) -> &mut Vec<$record> {
                &mut self.$field
            }
        }
    };
}

holds_optional!(Pet, Medicine, medicines);
holds_optional!(Pet, Food, foods);
holds_optional!(Pet, VetAppointment, vet_appointments);
holds_required!(Medicine, MedicineFrequency, frequencies);
holds_required!(Food, FoodFrequency, frequencies);

// ═══════════════════════════════════════════════════════════════════════
// PetState
// ═══════════════════════════════════════════════════════════════════════

/// Authoritative local copy of one pet during an editing session
///
/// Mutations stay in memory until the caller persists the pet.
#[derive(Debug, Clone)]
pub struct PetState {
    pet: Pet,
    dirty: bool,
}

impl PetState {
    pub fn new(pet: Pet) -> Self {
        Self { pet, dirty: false }
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    /// Mutable access to the pet's own fields
    pub fn pet_mut(&mut self) -> &mut Pet {
        self.dirty = true;
        &mut self.pet
    }

    pub fn into_pet(self) -> Pet {
        self.pet
    }

    /// Whether anything changed since the state was opened
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn attach<R>(&mut self, record: R)
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        attach(&mut self.pet, record);
        self.dirty = true;
    }

    pub fn replace<R>(&mut self, id: &RecordId, record: R) -> bool
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        let replaced = replace(&mut self.pet, id, record);
        self.dirty |= replaced;
        replaced
    }

    pub fn remove<R>(&mut self, id: &RecordId) -> Option<R>
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        let removed = remove(&mut self.pet, id);
        self.dirty |= removed.is_some();
        removed
    }

    pub fn get<R>(&self, id: &RecordId) -> Option<&R>
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        find(&self.pet, id)
    }

    pub fn get_mut<R>(&mut self, id: &RecordId) -> Option<&mut R>
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        find_mut(&mut self.pet, id)
    }

    /// All records of kind `R` (empty when the collection is absent)
    pub fn records<R>(&self) -> &[R]
    where
        Pet: Holds<R>,
        R: SubRecord,
    {
        <Pet as Holds<R>>::collection(&self.pet)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl<R> Holds<R> for PetState
where
    Pet: Holds<R>,
    R: SubRecord,
{
    fn collection(&self) -> Option<&Vec<R>> {
        <Pet as Holds<R>>::collection(&self.pet)
    }

    fn collection_mut(&mut self) -> Option<&mut Vec<R>> {
        <Pet as Holds<R>>::collection_mut(&mut self.pet)
    }

    fn collection_or_create(&mut self) -> &mut Vec<R> {
        <Pet as Holds<R>>::collection_or_create(&mut self.pet)
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
    }
}
