//! HTTP endpoint serving single-listing price predictions.
//!
//! One read-only route: `GET /predict` with the ten features as query
//! parameters. `brand` and `model` arrive separately and are concatenated
//! into the `brand_model` composite the preprocessor was trained on. Every
//! pipeline error becomes a 500 whose `detail` carries the kind-specific
//! message.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::predict::{Listing, PredictPipeline};

/// Query parameters of `GET /predict`.
#[derive(Clone, Debug, Deserialize)]
pub struct PredictQuery {
    pub manufacture_date: i64,
    pub brand: String,
    pub model: String,
    pub origin: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub seats: f64,
    pub gearbox: String,
    pub fuel: String,
    pub color: String,
    pub mileage_v2: f64,
    pub condition: String,
}

impl PredictQuery {
    fn into_listing(self) -> Listing {
        Listing {
            manufacture_date: self.manufacture_date,
            brand_model: format!("{} {}", self.brand, self.model),
            origin: self.origin,
            vehicle_type: self.vehicle_type,
            seats: self.seats,
            gearbox: self.gearbox,
            fuel: self.fuel,
            color: self.color,
            mileage_v2: self.mileage_v2,
            condition: self.condition,
        }
    }
}

/// Build the router around a prediction pipeline.
pub fn app(pipeline: PredictPipeline) -> Router {
    Router::new()
        .route("/predict", get(predict_handler))
        .with_state(Arc::new(pipeline))
}

async fn predict_handler(
    State(pipeline): State<Arc<PredictPipeline>>,
    Query(query): Query<PredictQuery>,
) -> Response {
    let listing = query.into_listing();
    match pipeline.predict(&listing) {
        Ok(prediction) => Json(json!({ "predictions": [prediction] })).into_response(),
        Err(err) => {
            log::error!("prediction failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": err.to_string() })),
            )
                .into_response()
        }
    }
}
