use thiserror::Error;

/// The remote artifact a generation call was producing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum Artifact {
    #[strum(serialize = "brand strategy")]
    Strategy,
    #[strum(serialize = "primary logo")]
    PrimaryLogo,
    #[strum(serialize = "secondary mark")]
    SecondaryMark,
    #[strum(serialize = "chat reply")]
    ChatReply,
}

#[derive(Debug, Error)]
pub enum BrandError {
    /// Rejected input, raised before any request leaves the process.
    #[error("{0}")]
    Validation(String),

    /// Transport errors, empty payloads and schema mismatches.
    #[error("Failed to generate {artifact}: {message}")]
    Generation { artifact: Artifact, message: String },
}

impl BrandError {
    pub fn generation(artifact: Artifact, err: impl std::fmt::Display) -> BrandError {
        return BrandError::Generation {
            artifact,
            message: format!("{err:#}"),
        };
    }

    pub fn is_validation(&self) -> bool {
        return matches!(self, BrandError::Validation(_));
    }

    pub fn artifact(&self) -> Option<Artifact> {
        match self {
            BrandError::Validation(_) => return None,
            BrandError::Generation { artifact, .. } => return Some(*artifact),
        }
    }
}
