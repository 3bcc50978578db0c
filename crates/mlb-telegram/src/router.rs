use std::sync::Arc;

use anyhow::Context;
use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::info;

use mlb_core::{
    config::Config,
    messaging::port::MessagingPort,
    pipeline::{Pipeline, PipelineLimits},
    ports::{AttachmentFetcher, PasteService},
    reply::Branding,
};

use crate::handlers::{self, media_group::MediaGroupBuffer};
use crate::shutdown::install_signal_handler;
use crate::{TelegramFetcher, TelegramMessenger};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub pipeline: Pipeline,
    pub paste: Arc<dyn PasteService>,
    pub fetcher: Arc<dyn AttachmentFetcher>,
    pub messenger: Arc<dyn MessagingPort>,
    pub media_groups: Arc<MediaGroupBuffer>,
}

impl AppState {
    pub fn new(
        cfg: Arc<Config>,
        paste: Arc<dyn PasteService>,
        fetcher: Arc<dyn AttachmentFetcher>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        let pipeline = Pipeline::new(
            paste.clone(),
            fetcher.clone(),
            messenger.clone(),
            PipelineLimits::from(cfg.as_ref()),
            Branding {
                site_url: cfg.mclogs_site_url.clone(),
                icon_url: None,
            },
        );
        let media_groups = MediaGroupBuffer::new(pipeline.clone());
        Self {
            cfg,
            pipeline,
            paste,
            fetcher,
            messenger,
            media_groups,
        }
    }
}

/// Log in, then long-poll Telegram until SIGINT/SIGTERM.
///
/// A failed login is fatal. On a signal polling stops and the function returns without waiting
/// for uploads still in flight.
pub async fn run_polling(cfg: Arc<Config>, paste: Arc<dyn PasteService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let me = bot
        .get_me()
        .await
        .context("failed to log in to Telegram")?;
    info!(username = %me.username(), "bot started");
    info!(
        api = %cfg.mclogs_api_url,
        max_attachments = cfg.max_attachments,
        max_attachment_bytes = cfg.max_attachment_bytes,
        "upload policy"
    );

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let fetcher: Arc<dyn AttachmentFetcher> = Arc::new(TelegramFetcher::new(bot.clone()));
    let state = Arc::new(AppState::new(cfg, paste, fetcher, messenger));

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .build();

    let shutdown = install_signal_handler();
    tokio::select! {
        _ = dispatcher.dispatch() => {}
        _ = shutdown.cancelled() => {}
    }

    info!("shutting down");
    Ok(())
}
