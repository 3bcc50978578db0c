use std::sync::Arc;

use mlb_core::{config::Config, ports::PasteService};
use mlb_mclogs::McLogsClient;

#[tokio::main]
async fn main() -> Result<(), mlb_core::Error> {
    mlb_core::logging::init("mlb")?;

    let cfg = Arc::new(Config::load()?);

    let paste: Arc<dyn PasteService> = Arc::new(
        McLogsClient::new(cfg.http_timeout)?.with_base_url(cfg.mclogs_api_url.clone()),
    );

    mlb_telegram::router::run_polling(cfg, paste)
        .await
        .map_err(|e| mlb_core::Error::Messaging(format!("telegram bot failed: {e:#}")))?;

    Ok(())
}
