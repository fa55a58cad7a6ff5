use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::NormalizePath;
use actix_web::web::{self, Data, JsonConfig, PathConfig, QueryConfig};
use actix_web::{App, HttpServer, ResponseError};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod error;
pub mod money;
pub mod seed;
pub mod typedid;

pub use crate::campaign::{CampaignBody, CreateCampaignBody, UpdateCampaignBody};
pub use crate::config::Config;
pub use crate::error::Error;

use crate::database::Database;

/// Registers the extractor error formats and every route under `/api`.
///
/// The `Data<Box<dyn Database>>` the handlers use is expected to be provided
/// by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        // format json errors with custom format
        Error::InvalidJson(err).into()
    }))
    .app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(
        web::scope("/api")
            .service(campaign::endpoints::create_campaign)
            .service(campaign::endpoints::get_campaigns)
            .service(campaign::endpoints::get_campaign_by_id)
            .service(campaign::endpoints::update_campaign)
            .service(campaign::endpoints::replace_campaign)
            .service(campaign::endpoints::delete_campaign),
    )
    .default_service(web::to(|| async { Error::PathNotFound.error_response() }));
}

/// Lets the browser frontend on `allowed_origins` call the API.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |builder, origin| builder.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

pub async fn run(config: Config) -> Result<(), Error> {
    let db = database::connect(&config.database).await?;

    if config.seed {
        info!("seeding database");
        seed::seed(db.as_ref()).await?;
    }

    let db: Data<Box<dyn Database>> = Data::new(db);
    let allowed_origins = config.cors.allowed_origins.clone();

    info!("listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&config.bind)?
    .run()
    .await?;

    Ok(())
}
