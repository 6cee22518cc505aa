//! Open share invites addressed to the signed-in user

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::PetsApi;
use crate::error::FurMedsResult;
use crate::notify::{Notification, Notifier};
use crate::types::{PetShareInvite, RecordId};

pub struct InviteList {
    api: Arc<dyn PetsApi>,
    notifier: Arc<dyn Notifier>,
    invites: Vec<PetShareInvite>,
}

impl InviteList {
    pub fn new(api: Arc<dyn PetsApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            invites: Vec::new(),
        }
    }

    pub fn invites(&self) -> &[PetShareInvite] {
        &self.invites
    }

    pub fn is_empty(&self) -> bool {
        self.invites.is_empty()
    }

    /// Reload open invites; a failure empties the list.
    pub async fn load(&mut self) {
        match self.api.list_share_invites().await {
            Ok(invites) => self.invites = invites,
            Err(e) => {
                warn!(error = %e, "Loading share invites failed");
                self.invites.clear();
                self.notifier
                    .notify(Notification::request_failed("Loading invites", &e));
            }
        }
    }

    /// Accept the invite for `pet_id`. The invite leaves the list only
    /// once the backend confirms.
    pub async fn accept(&mut self, pet_id: &RecordId) -> FurMedsResult<()> {
        let result = self.api.accept_invite(pet_id).await;
        self.resolve(pet_id, "Accepting invite", result)
    }

    pub async fn deny(&mut self, pet_id: &RecordId) -> FurMedsResult<()> {
        let result = self.api.deny_invite(pet_id).await;
        self.resolve(pet_id, "Denying invite", result)
    }

    fn resolve(
        &mut self,
        pet_id: &RecordId,
        action: &str,
        result: FurMedsResult<()>,
    ) -> FurMedsResult<()> {
        match result {
            Ok(()) => {
                info!(%pet_id, action, "Share invite resolved");
                self.invites.retain(|invite| &invite.pet.id != pet_id);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::request_failed(action, &e));
                Err(e)
            }
        }
    }
}
