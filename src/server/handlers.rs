use actix_web::{
    http::header::{HeaderName, HeaderValue},
    web, HttpResponse, ResponseError,
};
use futures::FutureExt;
use serde_json::json;
use std::panic::AssertUnwindSafe;
use uuid::Uuid;

use crate::{
    error::AdGenError,
    generation::GenerationClient,
    models::{default_styles, GenerationRequest},
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn health_check(client: web::Data<GenerationClient>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "provider": client.provider_kind().map(|kind| kind.as_str()),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn list_styles() -> HttpResponse {
    HttpResponse::Ok().json(default_styles())
}

/// `POST /api/generate`. Every outcome, a panic included, is answered with
/// the uniform response shape.
pub async fn generate(
    client: web::Data<GenerationClient>,
    request: web::Json<GenerationRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();
    let request = request.into_inner();
    log::info!(
        "[req:{}] generate: style={:?} custom_prompt={} aspect_ratio={:?}",
        request_id,
        request.style.as_ref().map(|s| s.id.as_str()),
        request.custom_prompt.is_some(),
        request.aspect_ratio
    );

    let outcome = AssertUnwindSafe(client.generate(&request))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(AdGenError::InternalError("generation panicked".into())));

    let mut response = match outcome {
        Ok(body) => {
            log::info!("[req:{}] generated image", request_id);
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            log::error!("[req:{}] Generation error: {}", request_id, e);
            e.error_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
