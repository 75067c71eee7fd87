//! Upload orchestration: images in, one new presentation out.
//!
//! The pipeline is strictly sequential and has no recovery: the first failing
//! call aborts the run, and anything already created remotely (the
//! presentation, uploaded images) is left behind.

use crate::assets::ImageAsset;
use crate::drive::ImageStore;
use crate::slides::{build_batch, presentation_url, PresentationService};
use deck_core::{Error, Result};

/// Progress notifications for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress<'a> {
    /// The presentation exists and images are about to be uploaded.
    Created { presentation_id: &'a str },
    /// Image `index` (1-based) of `total` is being uploaded.
    Uploading {
        asset: &'a ImageAsset,
        index: usize,
        total: usize,
    },
    /// The batch request is about to be sent.
    Submitting { requests: usize },
}

/// Outcome of a finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub presentation_id: String,
    pub url: String,
    pub slide_count: usize,
}

/// Builds a presentation from images using the given store and service.
pub struct PresentationUploader<'a> {
    store: &'a dyn ImageStore,
    service: &'a dyn PresentationService,
    title: String,
}

impl<'a> PresentationUploader<'a> {
    pub fn new(
        store: &'a dyn ImageStore,
        service: &'a dyn PresentationService,
        title: impl Into<String>,
    ) -> Self {
        Self {
            store,
            service,
            title: title.into(),
        }
    }

    pub fn upload(&self, assets: &[ImageAsset]) -> Result<UploadReport> {
        self.upload_with_progress(assets, |_| {})
    }

    /// Run the whole pipeline, reporting each step to `on_progress`.
    pub fn upload_with_progress<F>(
        &self,
        assets: &[ImageAsset],
        mut on_progress: F,
    ) -> Result<UploadReport>
    where
        F: FnMut(UploadProgress<'_>),
    {
        if assets.is_empty() {
            return Err(Error::EmptyInput("no slide images to upload".into()));
        }

        let presentation = self.service.create_presentation(&self.title)?;
        log::info!("Created presentation {}", presentation.presentation_id);
        on_progress(UploadProgress::Created {
            presentation_id: &presentation.presentation_id,
        });

        let total = assets.len();
        let mut urls = Vec::with_capacity(total);
        for (idx, asset) in assets.iter().enumerate() {
            on_progress(UploadProgress::Uploading {
                asset,
                index: idx + 1,
                total,
            });

            let file_id = self.store.upload(asset)?;
            self.store.share_publicly(&file_id)?;
            urls.push(self.store.public_url(&file_id));
        }

        if presentation.default_slide_id.is_none() {
            log::warn!("Presentation has no default slide to remove");
        }
        let requests = build_batch(&urls, presentation.default_slide_id.as_deref());

        on_progress(UploadProgress::Submitting {
            requests: requests.len(),
        });
        self.service
            .batch_update(&presentation.presentation_id, &requests)?;

        Ok(UploadReport {
            url: presentation_url(&presentation.presentation_id),
            presentation_id: presentation.presentation_id,
            slide_count: total,
        })
    }
}
