//! Two-phase listing creation.
//!
//! A [`ListingDraft`] is validated into a [`StagedListing`] before any
//! generator is called. Enrichment (or an explicit skip) produces an
//! [`EnrichedListing`], which is finalized into a [`Listing`] ready for
//! [`CatalogStore::add`](crate::catalog::CatalogStore::add). Generator
//! failures never abort the pipeline; they are kept as notices.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::validate_fields;
use crate::config::CatalogConfig;
use crate::error::{GenerationError, ValidationError};
use crate::generation::{DescriptionGenerator, DescriptionRequest, ImageGenerator};
use crate::listing::{Category, Listing, ListingDraft, Popularity};

/// Which collaborator a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStep {
    Description,
    Image,
}

/// A generation failure that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationNotice {
    pub step: GenerationStep,
    pub error: GenerationError,
}

impl ListingDraft {
    /// Validate name and price. Blank description/image inputs count as absent.
    pub fn stage(self, config: &CatalogConfig) -> Result<StagedListing, ValidationError> {
        validate_fields(&self.name, self.price, config.effective_price_floor())?;
        Ok(StagedListing {
            name: self.name.trim().to_string(),
            category: self.category,
            price: self.price,
            keywords: self.keywords,
            description: non_blank(self.description),
            image_reference: non_blank(self.image_reference),
            generate_description: self.generate_description,
            generate_image: self.generate_image,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A validated draft waiting for enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedListing {
    name: String,
    category: Category,
    price: u64,
    keywords: String,
    description: Option<String>,
    image_reference: Option<String>,
    generate_description: bool,
    generate_image: bool,
}

impl StagedListing {
    fn wants_description(&self) -> bool {
        self.generate_description && self.description.is_none()
    }

    fn wants_image(&self) -> bool {
        self.generate_image && self.image_reference.is_none()
    }

    /// Run the requested generation calls concurrently.
    ///
    /// User-supplied text or image references are never overwritten.
    pub async fn enrich<D, I>(self, describer: &D, imager: &I) -> EnrichedListing
    where
        D: DescriptionGenerator,
        I: ImageGenerator,
    {
        let request = DescriptionRequest {
            name: self.name.clone(),
            category: self.category,
            keywords: self.keywords.clone(),
        };
        let description = async {
            if self.wants_description() {
                Some(describer.describe(&request).await)
            } else {
                None
            }
        };
        let image = async {
            if self.wants_image() {
                Some(imager.image_for(self.category).await)
            } else {
                None
            }
        };
        let (description, image) = futures::join!(description, image);

        let mut enriched = self.skip_enrichment();
        match description {
            Some(Ok(text)) if !text.trim().is_empty() => {
                enriched.description = Some(text.trim().to_string());
            }
            Some(Ok(_)) => enriched.record(
                GenerationStep::Description,
                GenerationError::Unusable("empty description".into()),
            ),
            Some(Err(e)) => enriched.record(GenerationStep::Description, e),
            None => {}
        }
        match image {
            Some(Ok(reference)) if !reference.trim().is_empty() => {
                enriched.image_reference = Some(reference.trim().to_string());
            }
            Some(Ok(_)) => enriched.record(
                GenerationStep::Image,
                GenerationError::Unusable("empty image reference".into()),
            ),
            Some(Err(e)) => enriched.record(GenerationStep::Image, e),
            None => {}
        }
        enriched
    }

    /// Finish staging without calling any generator.
    pub fn skip_enrichment(self) -> EnrichedListing {
        EnrichedListing {
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description,
            image_reference: self.image_reference,
            notices: Vec::new(),
        }
    }
}

/// A staged listing with whatever content enrichment produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedListing {
    name: String,
    category: Category,
    price: u64,
    description: Option<String>,
    image_reference: Option<String>,
    notices: Vec<GenerationNotice>,
}

impl EnrichedListing {
    fn record(&mut self, step: GenerationStep, error: GenerationError) {
        warn!(name = %self.name, ?step, %error, "generation failed, falling back");
        self.notices.push(GenerationNotice { step, error });
    }

    pub fn notices(&self) -> &[GenerationNotice] {
        &self.notices
    }

    /// Build the final listing, filling gaps with an empty description and
    /// the configured placeholder image. Returns the notices alongside.
    pub fn finalize(
        self,
        popularity: Popularity,
        config: &CatalogConfig,
    ) -> (Listing, Vec<GenerationNotice>) {
        let listing = Listing {
            name: self.name,
            category: self.category,
            price: self.price,
            description: self.description.unwrap_or_default(),
            image_reference: self
                .image_reference
                .unwrap_or_else(|| config.placeholder_image.clone()),
            popularity,
            created_at: Utc::now(),
        };
        (listing, self.notices)
    }
}
