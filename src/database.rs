use async_trait::async_trait;
use mongodb::{bson, Client, Collection};
use tracing::info;

use crate::campaign::db::{self as campaign_db, CampaignStore, MemoryCampaignStore, CAMPAIGNS};
use crate::campaign::Campaign;
use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::error::Error;

pub type MongoCampaignStore = Collection<Campaign>;

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    /// Removes every stored record.
    async fn clear(&self) -> Result<(), Error>;
}

/// Opens the backend selected in `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<Box<dyn Database>, Error> {
    let db: Box<dyn Database> = match config.backend {
        DatabaseBackend::Mongo => Box::new(MongoDatabase::connect(config).await?),
        DatabaseBackend::Memory => {
            info!("using in-memory database");
            Box::new(MemoryDatabase::new())
        }
    };

    Ok(db)
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: Collection<Campaign>,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub fn new(db: mongodb::Database) -> MongoDatabase {
        MongoDatabase {
            campaigns: db.collection(CAMPAIGNS),
            db,
        }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<MongoDatabase, Error> {
        info!("connecting to db: {}", config.uri);
        let db = Client::with_uri_str(&config.uri)
            .await?
            .database(&config.name);

        // ping the database to ensure connection is established
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        MongoDatabase::initialize(db).await
    }

    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        campaign_db::initialize(&db).await?;

        Ok(MongoDatabase::new(db))
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn clear(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        campaign_db::initialize(&self.db).await?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn clear(&self) -> Result<(), Error> {
        self.campaigns.clear().await
    }
}
