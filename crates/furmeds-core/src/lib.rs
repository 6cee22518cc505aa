//! FurMeds Core Library
//!
//! Pet care tracking: pets, medicine and food schedules, vet
//! appointments, photos and sharing pets with other users.
//!
//! ## Overview
//!
//! The backend owns the data; this crate is the client side of it. A pet
//! is opened into a [`PetState`], edited through typed sub-forms, and
//! written back as a whole. Destructive actions go through a
//! confirmation, failures through a notifier.
//!
//! ## Core Principles
//!
//! - **Identity, not position**: every sub-record is updated and removed
//!   by its [`RecordId`]
//! - **Validate at the boundary**: raw input becomes typed field edits
//!   before it reaches any state
//! - **Explicit context**: the session and preferences live in a
//!   [`SessionContext`] handed to whoever needs them
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use furmeds_core::{ApiClient, LogNotifier, PetList, SessionContext, Storage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Storage::new("~/.furmeds/data/furmeds.redb")?;
//!     let session = SessionContext::load(storage)?;
//!     let api = Arc::new(ApiClient::new(furmeds_core::api::DEFAULT_API_URL, session));
//!
//!     let mut pets = PetList::new(api, Arc::new(LogNotifier));
//!     pets.refresh().await;
//!     for pet in pets.pets() {
//!         println!("{} ({} medicines)", pet.name, pet.medicines().len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod confirm;
pub mod error;
pub mod flows;
pub mod form;
pub mod notify;
pub mod providers;
pub mod session;
pub mod state;
pub mod storage;
pub mod types;

// Re-exports
pub use api::{ApiClient, PetsApi, DEFAULT_API_URL};
pub use confirm::{confirm, Decision, FixedPrompter, Prompt, PromptInput, Prompter};
pub use error::{FurMedsError, FurMedsResult, ValidationError};
pub use flows::{InviteList, PetEditor, PetList};
pub use form::{
    open_sub_form, AddPetForm, CancelPresenter, Draft, FieldPresenter, FormMode, FormPresenter,
    Outcome, SubForm,
};
pub use notify::{LogNotifier, Notification, Notifier};
pub use session::{Language, Session, SessionContext, Theme};
pub use state::{Holds, PetState, SubRecord};
pub use storage::Storage;
pub use types::*;
