use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{BrokerFilterService, FilterError};
use crate::models::{
    CatalogResponse, ErrorResponse, FilterBrokersResponse, HealthResponse, RecommendationEntry,
    RecommendationsRequest, RecommendationsResponse, UserPreferences,
};
use crate::services::CatalogLoader;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BrokerFilterService>,
    pub loader: CatalogLoader,
    pub max_limit: usize,
}

/// Configure all broker routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/brokers", web::get().to(list_brokers))
        .route("/brokers/filter", web::post().to(filter_brokers))
        .route("/brokers/recommendations", web::post().to(recommendations))
        .route("/brokers/reload", web::post().to(reload_catalog));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.service.brokers().len();
    let status = if catalog_size > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        cache: state.loader.cache_stats(),
        timestamp: chrono::Utc::now(),
    })
}

/// Current broker catalog
///
/// GET /api/v1/brokers
async fn list_brokers(state: web::Data<AppState>) -> impl Responder {
    let brokers = state.service.brokers();
    HttpResponse::Ok().json(CatalogResponse {
        count: brokers.len(),
        brokers: brokers.as_ref().clone(),
    })
}

/// Final-step filtering
///
/// POST /api/v1/brokers/filter
///
/// Request body:
/// ```json
/// {
///   "country": "GB",
///   "assets": ["forex"],
///   "experience": "first-timer",
///   "feePreference": "low-cost",
///   "frequency": "daily",
///   "depositAmount": "51-200"
/// }
/// ```
async fn filter_brokers(
    state: web::Data<AppState>,
    req: web::Json<UserPreferences>,
) -> impl Responder {
    match state.service.filter_brokers_immediate(&req) {
        Ok(brokers) => {
            tracing::info!("Filter request returned {} brokers", brokers.len());
            HttpResponse::Ok().json(FilterBrokersResponse {
                total_results: brokers.len(),
                brokers,
            })
        }
        Err(e) => filter_error_response(e),
    }
}

/// Explained recommendations
///
/// POST /api/v1/brokers/recommendations
///
/// Request body:
/// ```json
/// { "preferences": { "feePreference": "zero-commission" }, "limit": 5 }
/// ```
async fn recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = req.limit.map(|l| (l as usize).min(state.max_limit));

    match state.service.get_broker_recommendations(&req.preferences, limit) {
        Ok(recs) => {
            tracing::info!("Returning {} recommendations", recs.len());
            HttpResponse::Ok().json(RecommendationsResponse {
                recommendations: recs.into_iter().map(RecommendationEntry::from).collect(),
            })
        }
        Err(e) => filter_error_response(e),
    }
}

/// Refetch the catalog from Appwrite
///
/// POST /api/v1/brokers/reload
async fn reload_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.loader.load(true).await {
        Ok(brokers) => {
            let count = brokers.len();
            state.service.set_brokers(brokers);
            let brokers = state.service.brokers();
            HttpResponse::Ok().json(CatalogResponse {
                brokers: brokers.as_ref().clone(),
                count,
            })
        }
        Err(e) => {
            tracing::error!("Failed to reload broker catalog: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to reload catalog".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

fn filter_error_response(e: FilterError) -> HttpResponse {
    tracing::error!("Broker filtering failed: {}", e);
    HttpResponse::UnprocessableEntity().json(ErrorResponse {
        error: "Invalid broker catalog".to_string(),
        message: e.to_string(),
        status_code: 422,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Broker;
    use crate::services::{AppwriteClient, CacheManager};
    use actix_web::{test, App};

    fn create_broker(id: &str, rating: f64, spreads_from: f64) -> Broker {
        Broker {
            id: id.to_string(),
            name: format!("Broker {}", id),
            rating,
            trust_score: None,
            verified: true,
            featured: false,
            spreads_from,
            min_deposit: 50.0,
            max_leverage: 30.0,
            platforms: vec!["Web".to_string()],
            restricted_countries: vec![],
        }
    }

    fn create_state(brokers: Vec<Broker>) -> AppState {
        let service = Arc::new(BrokerFilterService::default());
        service.set_brokers(brokers);

        let appwrite = AppwriteClient::new(
            "http://127.0.0.1:9/v1".to_string(),
            "key".to_string(),
            "project".to_string(),
            "db".to_string(),
            "brokers".to_string(),
        )
        .unwrap();

        AppState {
            service,
            loader: CatalogLoader::new(Arc::new(appwrite), Arc::new(CacheManager::local(4, 60))),
            max_limit: 2,
        }
    }

    #[actix_web::test]
    async fn test_filter_endpoint() {
        let state = create_state(vec![
            create_broker("wide", 4.0, 2.0),
            create_broker("tight", 4.0, 0.0),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/brokers/filter")
            .set_json(serde_json::json!({ "feePreference": "zero-commission" }))
            .to_request();
        let resp: FilterBrokersResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_results, 2);
        assert_eq!(resp.brokers[0].id, "tight");
    }

    #[actix_web::test]
    async fn test_recommendations_clamped_to_max_limit() {
        let state = create_state(vec![
            create_broker("a", 4.0, 1.0),
            create_broker("b", 3.0, 1.0),
            create_broker("c", 2.0, 1.0),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/brokers/recommendations")
            .set_json(serde_json::json!({ "preferences": {}, "limit": 10 }))
            .to_request();
        let resp: RecommendationsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.recommendations.len(), 2);
        assert_eq!(resp.recommendations[0].explanations, vec!["Verified broker"]);
    }

    #[actix_web::test]
    async fn test_invalid_catalog_is_unprocessable() {
        let state = create_state(vec![create_broker("bad", 11.0, 1.0)]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/brokers/filter")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 422);
    }

    #[actix_web::test]
    async fn test_health_reports_catalog_size() {
        let state = create_state(vec![create_broker("a", 4.0, 1.0)]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.catalog_size, 1);
        assert!(!resp.cache.redis_enabled);
    }
}
