/// Core error type for the bot.
///
/// Adapter crates map their specific errors (`reqwest`, `teloxide`) into this type so the
/// pipeline can log and isolate failures consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("service error: {0}")]
    Service(String),

    #[error("attachment too large: {size} bytes exceeds the {limit} byte limit")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("messaging error: {0}")]
    Messaging(String),
}

impl Error {
    /// Classify a `reqwest` failure: body decoding problems vs everything on the wire.
    ///
    /// The request URL is dropped from the message; download URLs can embed credentials.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            Error::Decoding(e.to_string())
        } else {
            Error::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_message_names_both_sizes() {
        let e = Error::SizeLimitExceeded {
            size: 11,
            limit: 10,
        };
        assert_eq!(
            e.to_string(),
            "attachment too large: 11 bytes exceeds the 10 byte limit"
        );
    }

    #[tokio::test]
    async fn reqwest_errors_do_not_leak_the_url() {
        let err = reqwest::get("http://127.0.0.1:9/file/bot123456:SECRETTOKEN/documents/file_1.txt")
            .await
            .unwrap_err();
        let e = Error::from_reqwest(err);
        assert!(matches!(e, Error::Transport(_)));
        assert!(!e.to_string().contains("SECRETTOKEN"), "{e}");
    }
}
