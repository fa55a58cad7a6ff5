use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::money::Money;

use super::{Campaign, CampaignId, MAX_NAME_LENGTH};

/// Fields to change on an existing campaign. Absent fields are kept.
#[derive(Clone, Debug, Default)]
pub struct CampaignPatch {
    pub name: Option<String>,
    pub budget: Option<Money>,
    pub spend: Option<Money>,
}

fn validate_name(name: String) -> Result<String, Error> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();
    if length == 0 || length > MAX_NAME_LENGTH {
        return Err(Error::InvalidCampaignName { name });
    }

    Ok(trimmed.to_string())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    name: String,
    budget: Money,
    spend: Option<Money>,
) -> Result<Campaign, Error> {
    let name = validate_name(name)?;

    let now = Utc::now();
    let campaign = Campaign {
        id: CampaignId::new(),
        name,
        budget,
        spend: spend.unwrap_or_default(),
        created_at: now,
        modified_at: now,
    };

    db.campaigns().insert_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    patch: CampaignPatch,
) -> Result<Campaign, Error> {
    let mut campaign = get_campaign_by_id(db, campaign_id).await?;

    if patch.name.is_none() && patch.budget.is_none() && patch.spend.is_none() {
        return Ok(campaign);
    }

    if let Some(name) = patch.name {
        campaign.name = validate_name(name)?;
    }
    if let Some(budget) = patch.budget {
        campaign.budget = budget;
    }
    if let Some(spend) = patch.spend {
        campaign.spend = spend;
    }
    campaign.modified_at = Utc::now();

    db.campaigns().update_campaign(&campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    db.campaigns().delete_campaign(campaign_id).await
}
