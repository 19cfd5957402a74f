use thiserror::Error;

use crate::tree::arena::NodeKey;

/// Failures that abort a single layout pass. The caller keeps whatever
/// geometry it rendered last.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SunburstError {
    #[error("No parentless record found and no root override given")]
    MissingRoot,

    #[error("Root override '{0}' does not match any node")]
    UnknownRootOverride(NodeKey),
}

pub type Result<T> = std::result::Result<T, SunburstError>;
