use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, patch, post, put, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::money::Money;

use super::manager::{self, CampaignPatch};
use super::{Campaign, CampaignId, CampaignStatus};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCampaignBody {
    pub name: String,
    pub budget: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<Money>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateCampaignBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<Money>,
}

/// The external representation of a campaign. `status` is derived from the
/// stored budget and spend each time a campaign is rendered; request bodies
/// never carry it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub name: String,
    pub budget: Money,
    pub spend: Money,
    pub status: CampaignStatus,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            status: campaign.status(),
            id: campaign.id,
            name: campaign.name,
            budget: campaign.budget,
            spend: campaign.spend,
        }
    }
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<HttpResponse, Error> {
    let db = &**db.get_ref();
    let body = body.into_inner();

    let campaign = manager::create_campaign(db, body.name, body.budget, body.spend).await?;

    Ok(HttpResponse::Created().json(CampaignBody::render(campaign)))
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: Data<Box<dyn Database>>) -> Result<Json<Vec<CampaignBody>>, Error> {
    let db = &**db.get_ref();

    let campaigns = manager::get_campaigns(db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(body))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<CampaignBody>, Error> {
    let db = &**db.get_ref();
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(db, campaign_id).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[patch("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<UpdateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let db = &**db.get_ref();
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let patch = CampaignPatch {
        name: body.name,
        budget: body.budget,
        spend: body.spend,
    };
    let campaign = manager::update_campaign(db, campaign_id, patch).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

/// Full replacement of the writable fields. A missing `spend` keeps the
/// stored value.
#[put("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn replace_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<CampaignBody>, Error> {
    let db = &**db.get_ref();
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let patch = CampaignPatch {
        name: Some(body.name),
        budget: Some(body.budget),
        spend: body.spend,
    };
    let campaign = manager::update_campaign(db, campaign_id, patch).await?;

    Ok(Json(CampaignBody::render(campaign)))
}

#[delete("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<HttpResponse, Error> {
    let db = &**db.get_ref();
    let campaign_id = params.into_inner();

    manager::delete_campaign(db, campaign_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn render_exposes_exactly_five_fields() {
        let now = Utc::now();
        let campaign = Campaign {
            id: CampaignId::new(),
            name: "Holiday Push".to_string(),
            budget: Money::from_cents(100000),
            spend: Money::from_cents(85000),
            created_at: now,
            modified_at: now,
        };

        let value = serde_json::to_value(CampaignBody::render(campaign.clone())).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["budget", "id", "name", "spend", "status"]);

        assert_eq!(object["id"], campaign.id.to_string());
        assert_eq!(object["name"], "Holiday Push");
        assert_eq!(object["budget"], "1000.00");
        assert_eq!(object["spend"], "850.00");
        assert_eq!(object["status"], "Warning");
    }

    #[test]
    fn rendered_fields_read_back_as_stored_values() {
        let now = Utc::now();
        let campaign = Campaign {
            id: CampaignId::new(),
            name: "Back To School".to_string(),
            budget: Money::from_cents(123456),
            spend: Money::from_cents(7),
            created_at: now,
            modified_at: now,
        };

        let json = serde_json::to_string(&CampaignBody::render(campaign.clone())).unwrap();
        let body: CampaignBody = serde_json::from_str(&json).unwrap();

        assert_eq!(body.id, campaign.id);
        assert_eq!(body.name, campaign.name);
        assert_eq!(body.budget, campaign.budget);
        assert_eq!(body.spend, campaign.spend);
    }

    #[test]
    fn update_body_ignores_status() {
        let body: UpdateCampaignBody =
            serde_json::from_str(r#"{"spend": "10.00", "status": "On Track"}"#).unwrap();

        assert_eq!(body.spend, Some(Money::from_cents(1000)));
        assert!(body.name.is_none());
        assert!(body.budget.is_none());
    }
}
