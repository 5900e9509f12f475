use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use broker_match::config::{LoggingSettings, Settings};
use broker_match::core::BrokerFilterService;
use broker_match::routes::{self, brokers::AppState};
use broker_match::services::{AppwriteClient, CacheManager, CatalogLoader};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// RUST_LOG, when set, takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_cache(settings: &Settings) -> CacheManager {
    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(16);

    match settings.cache.redis_url.as_deref() {
        Some(url) => match CacheManager::new(url, l1_size, ttl).await {
            Ok(cache) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis enabled)", l1_size, ttl);
                cache
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                CacheManager::local(l1_size, ttl)
            }
        },
        None => {
            info!("No Redis configured, using in-process cache only");
            CacheManager::local(l1_size, ttl)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().unwrap_or_else(|e| {
        panic!("Configuration error: {}", e);
    });

    init_logging(&settings.logging);

    info!("Starting Broker Match service...");
    info!("Configuration loaded successfully");

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        settings.collection.brokers.clone(),
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let cache = build_cache(&settings).await;
    let loader = CatalogLoader::new(Arc::new(appwrite), Arc::new(cache));

    let filter_settings = settings.filtering.to_filter_settings();
    let service = Arc::new(BrokerFilterService::new(filter_settings));

    info!("Filter service initialized with {:?}", filter_settings);

    match loader.load(false).await {
        Ok(brokers) => service.set_brokers(brokers),
        Err(e) => error!("Initial catalog load failed, starting with an empty catalog: {}", e),
    }

    let app_state = AppState {
        service,
        loader,
        max_limit: settings.filtering.max_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
