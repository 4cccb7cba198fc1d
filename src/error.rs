use std::path::PathBuf;

use thiserror::Error;

/// Library error type for site-carousel operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The carousel was given no images to rotate through.
    #[error("carousel requires at least one image")]
    EmptySequence,

    /// The business-info document could not be read.
    #[error("failed to read business info from {}", .path.display())]
    InfoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The business-info document is not valid JSON for [`crate::business::BusinessInfo`].
    #[error("failed to parse business info from {}", .path.display())]
    InfoParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
