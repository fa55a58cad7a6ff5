use tracing::info;

use crate::campaign::manager;
use crate::database::Database;
use crate::error::Error;
use crate::money::Money;

/// Demo campaigns as `(name, budget cents, spend cents)`, one per status.
const DEMO_CAMPAIGNS: &[(&str, u32, u32)] = &[
    ("Spring Launch", 500_000, 125_000),
    ("Summer Retargeting", 250_000, 212_550),
    ("Black Friday Blitz", 1_000_000, 1_043_020),
    ("Brand Awareness Draft", 0, 0),
];

pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.clear().await?;

    for &(name, budget, spend) in DEMO_CAMPAIGNS {
        let campaign = manager::create_campaign(
            db,
            name.to_string(),
            Money::from_cents(budget),
            Some(Money::from_cents(spend)),
        )
        .await?;

        info!(campaign_id = %campaign.id, status = %campaign.status(), "seeded campaign");
    }

    Ok(())
}
