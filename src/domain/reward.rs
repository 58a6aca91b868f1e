use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lesson::Badge;

/// An NFT-badge grant. Append-only, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    pub id: String,
    pub lesson_id: u32,
    pub image: String,
    pub name: String,
    pub awarded_at: DateTime<Utc>,
}

impl RewardRecord {
    pub fn for_badge(lesson_id: u32, badge: &Badge) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            lesson_id,
            image: badge.image.clone(),
            name: badge.name.clone(),
            awarded_at: Utc::now(),
        }
    }
}
