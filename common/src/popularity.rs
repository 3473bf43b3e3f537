use rand::Rng;

use crate::listing::Popularity;
use crate::pipeline::StagedListing;

/// Assigns the popularity score a listing is created with.
pub trait PopularityScorer {
    fn score(&mut self, listing: &StagedListing) -> Popularity;
}

/// Uniform random score over the whole `0..=100` range.
#[derive(Debug, Clone)]
pub struct RandomPopularity<R = rand::rngs::ThreadRng> {
    rng: R,
}

impl RandomPopularity {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomPopularity {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPopularity<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PopularityScorer for RandomPopularity<R> {
    fn score(&mut self, _listing: &StagedListing) -> Popularity {
        let value = self.rng.gen_range(0..=Popularity::MAX);
        Popularity::new(value).unwrap_or_default()
    }
}

/// Same score for every listing.
#[derive(Debug, Clone, Copy)]
pub struct FixedPopularity(pub Popularity);

impl PopularityScorer for FixedPopularity {
    fn score(&mut self, _listing: &StagedListing) -> Popularity {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::listing::{Category, ListingDraft};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn staged() -> StagedListing {
        ListingDraft {
            name: "Warli Painting".into(),
            category: Category::Art,
            price: 400,
            keywords: String::new(),
            description: None,
            image_reference: None,
            generate_description: false,
            generate_image: false,
        }
        .stage(&CatalogConfig::default())
        .unwrap()
    }

    #[test]
    fn random_scores_stay_in_range() {
        let mut scorer = RandomPopularity::with_rng(StdRng::seed_from_u64(7));
        let staged = staged();
        for _ in 0..1000 {
            assert!(scorer.score(&staged).value() <= Popularity::MAX);
        }
    }

    #[test]
    fn fixed_score_is_returned() {
        let score = Popularity::new(77).unwrap();
        assert_eq!(FixedPopularity(score).score(&staged()), score);
    }
}
