//! Google Slides presentation creation and batch updates.

use crate::http;
use deck_core::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const PRESENTATIONS_URL: &str = "https://slides.googleapis.com/v1/presentations";

/// Default 16:9 page size, in points.
pub const PAGE_WIDTH_PT: f64 = 720.0;
pub const PAGE_HEIGHT_PT: f64 = 405.0;

/// Object id of the slide created for the image at `index` (zero-based).
pub fn slide_object_id(index: usize) -> String {
    format!("slide_{:03}", index)
}

/// Edit URL of a presentation.
pub fn presentation_url(presentation_id: &str) -> String {
    format!("https://docs.google.com/presentation/d/{}/edit", presentation_id)
}

/// One entry of a `batchUpdate` request list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    CreateSlide(CreateSlide),
    CreateImage(CreateImage),
    DeleteObject(DeleteObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlide {
    pub object_id: String,
    pub insertion_index: usize,
    pub slide_layout_reference: LayoutReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReference {
    pub predefined_layout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImage {
    pub url: String,
    pub element_properties: ElementProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    pub page_object_id: String,
    pub size: Size,
    pub transform: AffineTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: String,
}

impl Dimension {
    pub fn points(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "PT".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffineTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub unit: String,
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            unit: "PT".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObject {
    pub object_id: String,
}

/// The create-slide / place-image pair for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSlideOperation {
    pub slide_id: String,
    pub create: Request,
    pub place: Request,
}

impl RemoteSlideOperation {
    /// Blank slide at `index` with the image stretched over the whole page.
    pub fn for_image(index: usize, image_url: impl Into<String>) -> Self {
        let slide_id = slide_object_id(index);

        let create = Request::CreateSlide(CreateSlide {
            object_id: slide_id.clone(),
            insertion_index: index,
            slide_layout_reference: LayoutReference {
                predefined_layout: "BLANK".into(),
            },
        });

        let place = Request::CreateImage(CreateImage {
            url: image_url.into(),
            element_properties: ElementProperties {
                page_object_id: slide_id.clone(),
                size: Size {
                    width: Dimension::points(PAGE_WIDTH_PT),
                    height: Dimension::points(PAGE_HEIGHT_PT),
                },
                transform: AffineTransform::identity(),
            },
        });

        Self {
            slide_id,
            create,
            place,
        }
    }
}

/// Build the full request list: one slide per image URL, in order, then the
/// deletion of the presentation's default slide.
pub fn build_batch(image_urls: &[String], default_slide_id: Option<&str>) -> Vec<Request> {
    let mut requests = Vec::with_capacity(image_urls.len() * 2 + 1);

    for (index, url) in image_urls.iter().enumerate() {
        let op = RemoteSlideOperation::for_image(index, url.as_str());
        requests.push(op.create);
        requests.push(op.place);
    }

    if let Some(slide_id) = default_slide_id {
        requests.push(Request::DeleteObject(DeleteObject {
            object_id: slide_id.to_string(),
        }));
    }

    requests
}

/// A freshly created presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPresentation {
    pub presentation_id: String,
    /// The blank slide the service adds on creation, if any.
    pub default_slide_id: Option<String>,
}

/// Presentation-level operations of the Slides API.
pub trait PresentationService {
    fn create_presentation(&self, title: &str) -> Result<NewPresentation>;

    /// Apply every request atomically.
    fn batch_update(&self, presentation_id: &str, requests: &[Request]) -> Result<()>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresentationResponse {
    presentation_id: String,
    #[serde(default)]
    slides: Vec<PageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    object_id: String,
}

#[derive(Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [Request],
}

/// Slides v1 REST client.
pub struct SlidesClient {
    http: Client,
    token: String,
}

impl SlidesClient {
    pub fn new(http: Client, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }
}

impl PresentationService for SlidesClient {
    fn create_presentation(&self, title: &str) -> Result<NewPresentation> {
        let request = self
            .http
            .post(PRESENTATIONS_URL)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "title": title }));

        let created: PresentationResponse = http::read_json(http::send(request)?)?;
        Ok(NewPresentation {
            default_slide_id: created.slides.into_iter().next().map(|p| p.object_id),
            presentation_id: created.presentation_id,
        })
    }

    fn batch_update(&self, presentation_id: &str, requests: &[Request]) -> Result<()> {
        let request = self
            .http
            .post(format!("{}/{}:batchUpdate", PRESENTATIONS_URL, presentation_id))
            .bearer_auth(&self.token)
            .json(&BatchUpdateBody { requests });

        http::send(request)?;
        Ok(())
    }
}
