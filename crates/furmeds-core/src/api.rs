//! REST gateway to the pets backend
//!
//! Every request carries the bearer credential from the
//! [`SessionContext`] when one exists. Without a credential the request
//! is still sent and the server decides. Transport and server failures
//! are logged and collapsed into [`FurMedsError::Api`]; nothing retries.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{FurMedsError, FurMedsResult};
use crate::session::SessionContext;
use crate::types::{EmailAddress, Food, Medicine, Pet, PetShareInvite, RecordId, ToDo};

/// Production backend
pub const DEFAULT_API_URL: &str = "https://pets-api-fh65cjqo3q-ez.a.run.app/api/v1";

/// Operations the app performs against the backend
///
/// Pet create, update and delete answer with the caller's full pet list.
#[async_trait]
pub trait PetsApi: Send + Sync {
    async fn list_pets(&self) -> FurMedsResult<Vec<Pet>>;

    async fn create_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>>;

    async fn update_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>>;

    async fn delete_pet(&self, id: &RecordId) -> FurMedsResult<()>;

    /// Medicines stored for `pet_id` on the backend's record endpoints.
    ///
    /// The record endpoints answer with the caller's medicine (or food)
    /// list. They exist beside the whole-pet update; the screen flows
    /// persist through [`PetsApi::update_pet`].
    async fn list_pet_medicines(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Medicine>>;

    async fn add_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>>;

    async fn update_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>>;

    async fn delete_pet_medicine(&self, id: &RecordId) -> FurMedsResult<Vec<Medicine>>;

    async fn list_pet_foods(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Food>>;

    async fn add_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>>;

    async fn update_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>>;

    async fn delete_pet_food(&self, id: &RecordId) -> FurMedsResult<Vec<Food>>;

    async fn invite_user_to_shared_pet(
        &self,
        pet_id: &RecordId,
        email: &EmailAddress,
    ) -> FurMedsResult<()>;

    async fn list_share_invites(&self) -> FurMedsResult<Vec<PetShareInvite>>;

    async fn accept_invite(&self, pet_id: &RecordId) -> FurMedsResult<()>;

    async fn deny_invite(&self, pet_id: &RecordId) -> FurMedsResult<()>;

    async fn list_todos(&self) -> FurMedsResult<Vec<ToDo>>;

    async fn generate_todos(&self) -> FurMedsResult<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareInviteRequest<'a> {
    pet_uuid: &'a RecordId,
    user_mail_to_invite: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareAnswerRequest<'a> {
    pet_uuid: &'a RecordId,
}

/// HTTP client for the pets backend
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the bearer credential if signed in.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> FurMedsResult<Response> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "An error occurred while contacting the backend");
            FurMedsError::Api(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Backend returned an error");
            return Err(FurMedsError::Api(format!("status {status}: {body}")));
        }

        Ok(response)
    }

    /// Send and decode a JSON list. A `null` body is an empty list.
    async fn send_list<T: DeserializeOwned>(&self, builder: RequestBuilder) -> FurMedsResult<Vec<T>> {
        let response = self.send(builder).await?;
        let list: Option<Vec<T>> = response.json().await.map_err(|e| {
            error!(error = %e, "Backend response could not be decoded");
            FurMedsError::Api(format!("invalid response: {e}"))
        })?;
        Ok(list.unwrap_or_default())
    }
}

#[async_trait]
impl PetsApi for ApiClient {
    async fn list_pets(&self) -> FurMedsResult<Vec<Pet>> {
        debug!("Listing pets");
        self.send_list(self.request(Method::GET, "pets")).await
    }

    async fn create_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
        debug!(pet_id = %pet.id, name = %pet.name, "Creating pet");
        self.send_list(self.request(Method::POST, "pet").json(pet))
            .await
    }

    async fn update_pet(&self, pet: &Pet) -> FurMedsResult<Vec<Pet>> {
        debug!(pet_id = %pet.id, "Updating pet");
        self.send_list(self.request(Method::PUT, "pet").json(pet))
            .await
    }

    async fn delete_pet(&self, id: &RecordId) -> FurMedsResult<()> {
        debug!(pet_id = %id, "Deleting pet");
        self.send(self.request(Method::DELETE, &format!("pet/{id}")))
            .await
            .map(drop)
    }

    async fn list_pet_medicines(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
        debug!(%pet_id, "Listing pet medicines");
        self.send_list(self.request(Method::GET, &format!("pet/{pet_id}/medicines")))
            .await
    }

    async fn add_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
        debug!(medicine_id = %medicine.id, name = %medicine.name, "Adding pet medicine");
        self.send_list(self.request(Method::POST, "pet/medicine").json(medicine))
            .await
    }

    async fn update_pet_medicine(&self, medicine: &Medicine) -> FurMedsResult<Vec<Medicine>> {
        debug!(medicine_id = %medicine.id, "Updating pet medicine");
        self.send_list(self.request(Method::PUT, "pet/medicine").json(medicine))
            .await
    }

    async fn delete_pet_medicine(&self, id: &RecordId) -> FurMedsResult<Vec<Medicine>> {
        debug!(medicine_id = %id, "Deleting pet medicine");
        self.send_list(self.request(Method::DELETE, &format!("pet/medicine/{id}")))
            .await
    }

    async fn list_pet_foods(&self, pet_id: &RecordId) -> FurMedsResult<Vec<Food>> {
        debug!(%pet_id, "Listing pet foods");
        self.send_list(self.request(Method::GET, &format!("pet/{pet_id}/foods")))
            .await
    }

    async fn add_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
        debug!(food_id = %food.id, name = %food.name, "Adding pet food");
        self.send_list(self.request(Method::POST, "pet/food").json(food))
            .await
    }

    async fn update_pet_food(&self, food: &Food) -> FurMedsResult<Vec<Food>> {
        debug!(food_id = %food.id, "Updating pet food");
        self.send_list(self.request(Method::PUT, "pet/food").json(food))
            .await
    }

    async fn delete_pet_food(&self, id: &RecordId) -> FurMedsResult<Vec<Food>> {
        debug!(food_id = %id, "Deleting pet food");
        self.send_list(self.request(Method::DELETE, &format!("pet/food/{id}")))
            .await
    }

    async fn invite_user_to_shared_pet(
        &self,
        pet_id: &RecordId,
        email: &EmailAddress,
    ) -> FurMedsResult<()> {
        debug!(%pet_id, email = %email, "Inviting user to shared pet");
        let body = ShareInviteRequest {
            pet_uuid: pet_id,
            user_mail_to_invite: email.as_str(),
        };
        self.send(self.request(Method::POST, "pet/share/invite").json(&body))
            .await
            .map(drop)
    }

    async fn list_share_invites(&self) -> FurMedsResult<Vec<PetShareInvite>> {
        debug!("Listing share invites");
        self.send_list(self.request(Method::GET, "pet/share/invites"))
            .await
    }

    async fn accept_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
        debug!(%pet_id, "Accepting share invite");
        let body = ShareAnswerRequest { pet_uuid: pet_id };
        self.send(self.request(Method::POST, "pet/share/accept").json(&body))
            .await
            .map(drop)
    }

    async fn deny_invite(&self, pet_id: &RecordId) -> FurMedsResult<()> {
        debug!(%pet_id, "Denying share invite");
        let body = ShareAnswerRequest { pet_uuid: pet_id };
        self.send(self.request(Method::POST, "pet/share/deny").json(&body))
            .await
            .map(drop)
    }

    async fn list_todos(&self) -> FurMedsResult<Vec<ToDo>> {
        self.send_list(self.request(Method::GET, "todos")).await
    }

    async fn generate_todos(&self) -> FurMedsResult<()> {
        self.send(self.request(Method::POST, "todos/generate"))
            .await
            .map(drop)
    }
}
