use shared::EvnavError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("evnav request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Evnav(#[from] EvnavError),
}
