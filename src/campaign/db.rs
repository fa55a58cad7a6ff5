use async_trait::async_trait;
use dashmap::DashMap;
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{bson, Database};

use crate::database::MongoCampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId};

pub const CAMPAIGNS: &str = "campaigns";

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    /// All campaigns, oldest first.
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    /// Replaces the stored record with the same id. Last writer wins.
    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error>;

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), Error>;

    async fn clear(&self) -> Result<(), Error>;
}

pub async fn initialize(db: &Database) -> Result<(), Error> {
    db.run_command(
        bson::doc! {
            "createIndexes": CAMPAIGNS,
            "indexes": [
                { "key": { "created_at": 1 }, "name": "by_created_at" },
            ]
        },
        None,
    )
    .await?;

    Ok(())
}

#[async_trait]
impl CampaignStore for MongoCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.insert_one(campaign, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let options = FindOptions::builder()
            .sort(bson::doc! { "created_at": 1 })
            .build();

        let campaigns: Vec<Campaign> = self
            .find(bson::doc! {}, options)
            .await?
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = self
            .find_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        let result = self
            .replace_one(bson::doc! { "_id": campaign.id }, campaign, None)
            .await?;

        if result.matched_count == 0 {
            return Err(Error::CampaignNotFound {
                campaign_id: campaign.id,
            });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), Error> {
        let result = self
            .delete_one(bson::doc! { "_id": campaign_id }, None)
            .await?;

        if result.deleted_count == 0 {
            return Err(Error::CampaignNotFound { campaign_id });
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> Result<(), Error> {
        self.delete_many(bson::doc! {}, None).await?;

        Ok(())
    }
}

/// Process-local campaign storage for development and tests.
#[derive(Debug, Default)]
pub struct MemoryCampaignStore {
    campaigns: DashMap<CampaignId, Campaign>,
}

impl MemoryCampaignStore {
    pub fn new() -> MemoryCampaignStore {
        MemoryCampaignStore::default()
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        self.campaigns.insert(campaign.id, campaign.clone());

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        campaigns.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign = self
            .campaigns
            .get(&campaign_id)
            .map(|entry| entry.value().clone());

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
        match self.campaigns.get_mut(&campaign.id) {
            Some(mut entry) => {
                *entry.value_mut() = campaign.clone();
                Ok(())
            }
            None => Err(Error::CampaignNotFound {
                campaign_id: campaign.id,
            }),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), Error> {
        self.campaigns
            .remove(&campaign_id)
            .map(|_| ())
            .ok_or(Error::CampaignNotFound { campaign_id })
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> Result<(), Error> {
        self.campaigns.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::money::Money;

    fn campaign(name: &str, age_minutes: i64) -> Campaign {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        Campaign {
            id: CampaignId::new(),
            name: name.to_string(),
            budget: Money::from_cents(10000),
            spend: Money::zero(),
            created_at,
            modified_at: created_at,
        }
    }

    #[tokio::test]
    async fn memory_store_lists_oldest_first() {
        let store = MemoryCampaignStore::new();
        store.insert_campaign(&campaign("newer", 1)).await.unwrap();
        store.insert_campaign(&campaign("older", 10)).await.unwrap();

        let names: Vec<String> = store
            .fetch_campaigns()
            .await
            .unwrap()
            .into_iter()
            .map(|campaign| campaign.name)
            .collect();

        assert_eq!(names, vec!["older".to_string(), "newer".to_string()]);
    }

    #[tokio::test]
    async fn memory_store_updates_and_deletes() {
        let store = MemoryCampaignStore::new();
        let mut stored = campaign("Autumn Sale", 0);
        store.insert_campaign(&stored).await.unwrap();

        stored.spend = Money::from_cents(9000);
        store.update_campaign(&stored).await.unwrap();

        let fetched = store.fetch_campaign_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.spend, Money::from_cents(9000));

        store.delete_campaign(stored.id).await.unwrap();
        assert!(store.fetch_campaign_by_id(stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_store_reports_missing_records() {
        let store = MemoryCampaignStore::new();
        let missing = campaign("Missing", 0);

        assert_eq!(
            store.update_campaign(&missing).await.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: missing.id
            }
        );
        assert_eq!(
            store.delete_campaign(missing.id).await.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: missing.id
            }
        );
    }
}
