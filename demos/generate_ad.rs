//! Drives a session against a running server:
//!
//! ```text
//! cargo run --example generate_ad -- ./bottle.png modern-minimal landscape
//! cargo run --example generate_ad -- ./bottle.png "floating over a misty lake"
//! ```

use adforge::{find_style, AdSession, AspectRatio, HttpGenerateApi, SelectionMode};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    adforge::logger::init()?;

    let mut args = env::args().skip(1);
    let image = args.next().ok_or("usage: generate_ad <image> <style-id|prompt> [ratio]")?;
    let style_or_prompt = args.next().unwrap_or_else(|| "modern-minimal".to_string());
    let aspect_ratio = match args.next().as_deref() {
        Some("landscape") => AspectRatio::Landscape,
        Some("portrait") => AspectRatio::Portrait,
        _ => AspectRatio::Square,
    };

    let base_url = env::var("ADGEN_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let api = HttpGenerateApi::new(&base_url);

    let mut session = AdSession::new();
    session.load_file(&image).await?;
    session.set_aspect_ratio(aspect_ratio);

    match find_style(&style_or_prompt) {
        Some(style) => session.select_style(Some(style.clone())),
        None => {
            session.set_mode(SelectionMode::Custom);
            session.set_custom_prompt(style_or_prompt);
        }
    }

    log::info!("🎨 Sending request to {}", api.endpoint());
    session.generate(&api).await;

    if let Some(error) = session.error() {
        log::error!("❌ {}", error);
        return Ok(());
    }

    let path = session.download(".").await?;
    println!("{}", path.display());
    Ok(())
}
