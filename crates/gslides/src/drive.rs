//! Google Drive staging for slide images.
//!
//! Slides can only place images it can fetch by URL, so each image is
//! uploaded to Drive and shared with "anyone with the link" first.

use crate::assets::ImageAsset;
use crate::http;
use chrono::Utc;
use deck_core::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

const BOUNDARY_PREFIX: &str = "deck_gslides_part";

/// Storage that can host images at a publicly readable URL.
pub trait ImageStore {
    /// Upload an image, returning its file id.
    fn upload(&self, asset: &ImageAsset) -> Result<String>;

    /// Grant read access to anyone with the link.
    fn share_publicly(&self, file_id: &str) -> Result<()>;

    /// URL the image can be fetched from once shared.
    fn public_url(&self, file_id: &str) -> String {
        direct_url(file_id)
    }
}

/// Direct download URL for a Drive file.
pub fn direct_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?id={}", file_id)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct CreatedFile {
    id: String,
}

#[derive(Serialize)]
struct Permission {
    #[serde(rename = "type")]
    kind: &'static str,
    role: &'static str,
}

/// Drive v3 REST client.
pub struct DriveClient {
    http: Client,
    token: String,
}

impl DriveClient {
    pub fn new(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }
}

impl ImageStore for DriveClient {
    fn upload(&self, asset: &ImageAsset) -> Result<String> {
        let metadata = serde_json::to_string(&FileMetadata {
            name: &asset.name,
            mime_type: asset.mime_type(),
        })
        .map_err(|e| deck_core::Error::SerializationError(e.to_string()))?;
        let data = asset.read()?;

        let boundary = boundary_avoiding(
            Utc::now().timestamp_micros().unsigned_abs(),
            &[metadata.as_bytes(), &data],
        );

        log::debug!("Uploading {} ({} bytes)", asset.name, data.len());
        let request = self
            .http
            .post(UPLOAD_URL)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .bearer_auth(&self.token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(multipart_related(&boundary, &metadata, asset.mime_type(), &data));

        let created: CreatedFile = http::read_json(http::send(request)?)?;
        log::debug!("Uploaded {} as {}", asset.name, created.id);
        Ok(created.id)
    }

    fn share_publicly(&self, file_id: &str) -> Result<()> {
        let request = self
            .http
            .post(format!("{}/{}/permissions", FILES_URL, file_id))
            .bearer_auth(&self.token)
            .json(&Permission {
                kind: "anyone",
                role: "reader",
            });

        http::send(request)?;
        Ok(())
    }
}

/// First boundary, counting up from `seed`, that occurs in none of `parts`.
fn boundary_avoiding(seed: u64, parts: &[&[u8]]) -> String {
    (seed..)
        .map(|n| format!("{}_{:016x}", BOUNDARY_PREFIX, n))
        .find(|candidate| !parts.iter().any(|part| contains(part, candidate.as_bytes())))
        .unwrap_or_else(|| BOUNDARY_PREFIX.to_string())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Build a `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related(boundary: &str, metadata_json: &str, mime_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + metadata_json.len() + 256);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: {t}\r\n\r\n",
            b = boundary,
            m = metadata_json,
            t = mime_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
