//! Pet photos
//!
//! Camera permission, capture and upload to object storage under
//! `{user_uid}/{pet_id}`.

use tracing::{debug, warn};

use crate::error::{FurMedsError, FurMedsResult};
use crate::providers::{Camera, ObjectStorage, Permission};
use crate::types::RecordId;

/// Object path of a pet's photo
pub fn photo_path(user_uid: &str, pet_id: &RecordId) -> String {
    format!("{}/{}", user_uid, pet_id)
}

/// Take a photo and upload it as the pet's picture.
///
/// Asks for camera permission when it is not granted yet. Returns the
/// public URL of the uploaded image.
pub async fn capture_and_upload<C, S>(
    camera: &C,
    storage: &S,
    user_uid: &str,
    pet_id: &RecordId,
) -> FurMedsResult<String>
where
    C: Camera + ?Sized,
    S: ObjectStorage + ?Sized,
{
    let mut permission = camera.check_permission().await;
    if permission != Permission::Granted {
        debug!(?permission, "Requesting camera permission");
        permission = camera.request_permission().await;
    }
    if permission != Permission::Granted {
        warn!(?permission, "Camera permission not granted");
        return Err(FurMedsError::PermissionDenied("camera".to_string()));
    }

    let payload = camera.capture().await?;
    storage.upload(&photo_path(user_uid, pet_id), &payload).await
}
