use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub mod status;
pub use endpoints::{CampaignBody, CreateCampaignBody, UpdateCampaignBody};
pub use status::{evaluate_status, CampaignStatus};

pub type CampaignId = TypedId<Campaign>;

/// Longest name a campaign may have, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub name: String,
    pub budget: Money,
    pub spend: Money,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl Campaign {
    /// Status as of the currently held budget and spend. Never stored.
    pub fn status(&self) -> CampaignStatus {
        evaluate_status(self.budget, self.spend)
    }
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}
