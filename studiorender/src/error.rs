use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not produce pdf: {0}")]
    Pdf(String),
    #[error("attachment {url} unavailable: {reason}")]
    Attachment {
        url: String,
        reason: String,
    },
    #[error("attachment {url} is not a usable image: {reason}")]
    Image {
        url: String,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
