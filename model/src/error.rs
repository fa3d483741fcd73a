use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire model crate.
pub type Result<T> = std::result::Result<T, ModelErr>;

/// The model crate's error type.
#[derive(Debug)]
pub enum ModelErr {
    Io(io::Error),
    Json(serde_json::Error),
    /// Wraps a failure that happened while loading the artifact at `path`.
    Load {
        path: PathBuf,
        source: Box<ModelErr>,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidArtifact(String),
    NonFinite {
        what: &'static str,
    },
    /// The features handed to a scaler or regressor contain NaN or infinity.
    NonFiniteInput,
}

impl Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelErr::Io(e) => write!(f, "io error: {e}"),
            ModelErr::Json(e) => write!(f, "malformed artifact: {e}"),
            ModelErr::Load { path, source } => {
                write!(f, "failed to load {}: {source}", path.display())
            }
            ModelErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "X has {got} features, but the {what} is expecting {expected} features as input"
            ),
            ModelErr::InvalidArtifact(msg) => write!(f, "invalid artifact: {msg}"),
            ModelErr::NonFinite { what } => write!(f, "the {what} produced a non-finite value"),
            ModelErr::NonFiniteInput => write!(f, "Input X contains NaN or infinity"),
        }
    }
}

impl Error for ModelErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelErr::Io(e) => Some(e),
            ModelErr::Json(e) => Some(e),
            ModelErr::Load { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for ModelErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ModelErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Checks that an input of length `got` fits something expecting `expected` features.
pub(crate) fn ensure_len(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(ModelErr::SizeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

/// Checks that every value in `values` is finite.
pub(crate) fn ensure_finite<'a, I>(what: &'static str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a f64>,
{
    if values.into_iter().all(|v| v.is_finite()) {
        return Ok(());
    }

    Err(ModelErr::NonFinite { what })
}

/// Checks that the features about to be transformed are all finite.
pub(crate) fn ensure_finite_input(x: &[f64]) -> Result<()> {
    if x.iter().all(|v| v.is_finite()) {
        return Ok(());
    }

    Err(ModelErr::NonFiniteInput)
}
