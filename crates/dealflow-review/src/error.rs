use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No queued message with id {0}")]
    UnknownMessage(Uuid),
}
