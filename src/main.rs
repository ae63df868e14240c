use adforge::{logger, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    if let Err(e) = logger::init_with_config(logger::LoggerConfig::for_app(&config)) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info("adforge", env!("CARGO_PKG_VERSION"), &config);
    logger::log_config_info(&config);

    adforge::server::run(config).await
}
