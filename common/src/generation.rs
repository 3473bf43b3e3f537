use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::listing::Category;

/// Input for a generated listing description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRequest {
    pub name: String,
    pub category: Category,
    pub keywords: String,
}

impl DescriptionRequest {
    pub fn prompt(&self) -> String {
        format!(
            "Write a short 3-line creative description for a handmade tribal product named '{}' \
             in the '{}' category. Mention its cultural value and features like {}.",
            self.name, self.category, self.keywords
        )
    }
}

/// Prompt sent to the image generator for a category.
pub fn image_prompt(category: Category) -> String {
    format!(
        "A realistic high-quality photo of an Indian tribal artisan-made {category}, detailed and vibrant."
    )
}

/// Produces descriptive text for a listing.
///
/// Calls are not retried and carry no timeout of their own.
pub trait DescriptionGenerator: Send + Sync {
    fn describe(
        &self,
        request: &DescriptionRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Produces an image reference (usually a URL) for a category.
pub trait ImageGenerator: Send + Sync {
    fn image_for(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Generators that always refuse. Listings fall back to user input and the
/// placeholder image.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerators;

impl DescriptionGenerator for DisabledGenerators {
    async fn describe(&self, _request: &DescriptionRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

impl ImageGenerator for DisabledGenerators {
    async fn image_for(&self, _category: Category) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_prompt_mentions_inputs() {
        let request = DescriptionRequest {
            name: "Dokra Horse".into(),
            category: Category::Handicraft,
            keywords: "brass, lost-wax casting".into(),
        };
        let prompt = request.prompt();
        assert!(prompt.contains("'Dokra Horse'"));
        assert!(prompt.contains("'Handicraft' category"));
        assert!(prompt.contains("brass, lost-wax casting"));
        assert!(prompt.contains("3-line"));
    }

    #[test]
    fn image_prompt_uses_category_label() {
        assert!(image_prompt(Category::HomeDecor).contains("artisan-made Home Decor"));
    }
}
