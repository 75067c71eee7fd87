//! Google Slides uploader backend.
//!
//! Turns a folder of rendered slide images into a new Google Slides
//! presentation: images are staged on Google Drive, then placed full-bleed
//! on blank slides through a single `batchUpdate` call.

pub mod assets;
pub mod auth;
pub mod drive;
mod http;
pub mod slides;
pub mod uploader;

pub use assets::{enumerate_images, ImageAsset};
pub use auth::{
    CachedCredentialProvider, ClientSecret, Credential, CredentialProvider, LoopbackAuthorizer,
    OAuthClient, TokenCache,
};
pub use drive::{DriveClient, ImageStore};
pub use http::build_client;
pub use slides::{PresentationService, Request, SlidesClient};
pub use uploader::{PresentationUploader, UploadProgress, UploadReport};
