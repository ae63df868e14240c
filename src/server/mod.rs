pub mod handlers;

use actix_web::{
    http::StatusCode, middleware::Logger, web, App, HttpResponse, HttpServer, ResponseError,
};

use crate::{
    config::Config,
    error::AdGenError,
    generation::GenerationClient,
    models::GenerationResponse,
};

/// A 10MB image is about 13.4MB once base64-encoded into a data URL.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl ResponseError for AdGenError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .json(GenerationResponse::failure(self.public_message()))
    }
}

/// Undecodable bodies get the same uniform failure shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            AdGenError::SerializationError(err.to_string()).into()
        })
}

/// Routes and shared state, for `App::configure`.
pub fn configure(client: GenerationClient) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(client))
            .app_data(json_config())
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/api")
                    .route("/generate", web::post().to(handlers::generate))
                    .route("/styles", web::get().to(handlers::list_styles)),
            );
    }
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let client = GenerationClient::new(config.provider.clone());
    let bind_addr = config.bind_addr();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Dms"))
            .configure(configure(client.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
