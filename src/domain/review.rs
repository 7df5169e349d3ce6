use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OwnerId;

pub type ReviewId = Uuid;

/// A note or customer review the shopkeeper files for themselves.
/// Ratings are clamped to 1..=5 at creation; stored data is trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub owner_id: OwnerId,
    pub subject: String,
    pub content: Option<String>,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(owner_id: OwnerId, subject: impl Into<String>, rating: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            subject: subject.into(),
            content: None,
            rating: rating.clamp(1, 5),
            created_at: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Mean rating across reviews; None when there are none.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|review| review.rating as u32).sum();
    Some(sum as f64 / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_is_clamped() {
        let owner = Uuid::new_v4();
        assert_eq!(Review::new(owner, "Great supplier", 9).rating, 5);
        assert_eq!(Review::new(owner, "Late delivery", 0).rating, 1);
        assert_eq!(Review::new(owner, "Fine", 3).rating, 3);
    }

    #[test]
    fn test_average_rating() {
        let owner = Uuid::new_v4();
        let reviews = vec![
            Review::new(owner, "a", 5),
            Review::new(owner, "b", 4),
            Review::new(owner, "c", 3),
        ];
        assert_eq!(average_rating(&reviews), Some(4.0));
        assert_eq!(average_rating(&[]), None);
    }
}
