//! External services the app consumes
//!
//! Each service sits behind a trait so flows can be driven by fakes in
//! tests. The concrete implementations talk to the hosted identity and
//! object storage REST APIs, or read images from disk.

pub mod auth;
pub mod camera;
pub mod object_storage;

pub use auth::{AuthProvider, AuthService, IdentityToolkitAuth};
pub use camera::{Camera, FileCamera, ImagePayload, Permission};
pub use object_storage::{FirebaseStorage, ObjectStorage};
