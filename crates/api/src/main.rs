use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrimarket_core::domain::market::{PriceSeries, PriceSnapshot};
use agrimarket_core::domain::news::NewsItem;
use agrimarket_core::domain::recommendation::RecommendationResult;
use agrimarket_core::engine::HISTORY_DAYS;
use agrimarket_core::{MarketError, MarketService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = agrimarket_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let service = MarketService::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;

    let app = router(AppState { service });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/prices", get(get_current_prices))
        .route("/prices/:commodity/history", get(get_historical_prices))
        .route("/recommendations/:commodity", get(get_recommendation))
        .route("/news", get(get_news))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    service: MarketService,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: &'static str,
    message: String,
}

#[derive(Debug)]
struct ApiFailure(MarketError);

impl From<MarketError> for ApiFailure {
    fn from(err: MarketError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            MarketError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            MarketError::DataUnavailable { .. } => {
                tracing::warn!(error = %self.0, "market data unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = ApiError {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Maps a malformed query string onto the same JSON error body as service errors.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiFailure> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => Err(ApiFailure(MarketError::invalid(
            "query",
            rejection.body_text(),
        ))),
    }
}

async fn get_current_prices(
    State(state): State<AppState>,
) -> Result<Json<Vec<PriceSnapshot>>, ApiFailure> {
    Ok(Json(state.service.current_prices().await?))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    days: Option<usize>,
}

async fn get_historical_prices(
    State(state): State<AppState>,
    Path(commodity): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<PriceSeries>, ApiFailure> {
    let days = query_params(query)?.days.unwrap_or(HISTORY_DAYS);
    Ok(Json(
        state.service.historical_prices(&commodity, days).await?,
    ))
}

#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    inventory_tons: f64,
    #[serde(default)]
    monthly_storage_cost: f64,
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path(commodity): Path<String>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationResult>, ApiFailure> {
    let query = query_params(query)?;
    let result = state
        .service
        .market_recommendation(&commodity, query.inventory_tons, query.monthly_storage_cost)
        .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    commodity: Option<String>,
}

async fn get_news(
    State(state): State<AppState>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> Result<Json<Vec<NewsItem>>, ApiFailure> {
    let query = query_params(query)?;
    Ok(Json(
        state
            .service
            .commodity_news(query.commodity.as_deref())
            .await,
    ))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &agrimarket_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimarket_core::config::Settings;
    use agrimarket_core::domain::recommendation::Action;

    fn state() -> AppState {
        let settings = Settings {
            series_seed: Some(99),
            ..Settings::default()
        };
        AppState {
            service: MarketService::from_settings(&settings).unwrap(),
        }
    }

    #[test]
    fn error_kinds_map_to_status_codes() {
        let bad = ApiFailure(MarketError::invalid("inventory_tons", "must be > 0 (got 0)"));
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);

        let down = ApiFailure(MarketError::unavailable("http_json_feed", "timeout"));
        assert_eq!(down.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn history_defaults_to_a_year() {
        let Json(series) = get_historical_prices(
            State(state()),
            Path("Wheat".to_string()),
            Ok(Query(HistoryQuery { days: None })),
        )
        .await
        .unwrap();
        assert_eq!(series.len(), HISTORY_DAYS);
    }

    #[tokio::test]
    async fn recommendation_handler_returns_result() {
        let Json(result) = get_recommendation(
            State(state()),
            Path("White Maize".to_string()),
            Ok(Query(RecommendationQuery {
                inventory_tons: 100.0,
                monthly_storage_cost: 5000.0,
            })),
        )
        .await
        .unwrap();
        // 50 per ton against a 1% threshold of 42.5 always fires the storage rule.
        assert_ne!(result.action, Action::Hold);
        assert!(!result.reasoning.is_empty());
    }

    #[tokio::test]
    async fn zero_inventory_is_bad_request() {
        let res = get_recommendation(
            State(state()),
            Path("White Maize".to_string()),
            Ok(Query(RecommendationQuery {
                inventory_tons: 0.0,
                monthly_storage_cost: 0.0,
            })),
        )
        .await;
        let failure = res.unwrap_err();
        assert!(matches!(failure.0, MarketError::InvalidInput { .. }));
        assert_eq!(failure.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn news_filter_passes_through() {
        let Json(items) = get_news(
            State(state()),
            Ok(Query(NewsQuery {
                commodity: Some("Wheat".to_string()),
            })),
        )
        .await
        .unwrap();
        assert!(items.iter().all(|n| n.is_about("Wheat")));
    }

    fn query<T: serde::de::DeserializeOwned>(uri: &str) -> Result<Query<T>, QueryRejection> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[tokio::test]
    async fn malformed_recommendation_query_is_invalid_input() {
        for uri in [
            "/recommendations/White%20Maize?monthly_storage_cost=50",
            "/recommendations/White%20Maize?inventory_tons=abc",
        ] {
            let failure = get_recommendation(
                State(state()),
                Path("White Maize".to_string()),
                query(uri),
            )
            .await
            .unwrap_err();
            assert!(matches!(
                failure.0,
                MarketError::InvalidInput { field: "query", .. }
            ));
            assert_eq!(failure.0.kind(), "invalid_input");
            assert_eq!(failure.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn negative_or_oversized_days_is_bad_request() {
        for uri in ["/prices/Wheat/history?days=-1", "/prices/Wheat/history?days=200000000"] {
            let failure = get_historical_prices(
                State(state()),
                Path("Wheat".to_string()),
                query(uri),
            )
            .await
            .unwrap_err();
            assert!(matches!(failure.0, MarketError::InvalidInput { .. }));
            assert_eq!(failure.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
