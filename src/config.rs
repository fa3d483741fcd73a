use std::{
    env,
    error::Error,
    fmt::{self, Display},
    num::NonZeroUsize,
    path::PathBuf,
    str::FromStr,
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MODEL_PATH: &str = "best_house_price_model.json";
const DEFAULT_SCALER_PATH: &str = "scaler.json";
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Runtime settings of the service, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    /// Number of HTTP workers, actix-web picks one per core when unset.
    pub workers: Option<NonZeroUsize>,
    pub max_body_bytes: usize,
}

/// An environment variable held a value that couldn't be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErr {
    var: &'static str,
    value: String,
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: '{}'", self.var, self.value)
    }
}

impl Error for ConfigErr {}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: DEFAULT_MODEL_PATH.into(),
            scaler_path: DEFAULT_SCALER_PATH.into(),
            workers: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Reads `HOST`, `PORT`, `MODEL_PATH`, `SCALER_PATH`, `WORKERS` and `MAX_BODY_BYTES`
    /// from the process environment, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigErr> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`ServiceConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            model_path: lookup("MODEL_PATH").map_or(defaults.model_path, PathBuf::from),
            scaler_path: lookup("SCALER_PATH").map_or(defaults.scaler_path, PathBuf::from),
            workers: parse_var(&lookup, "WORKERS")?,
            max_body_bytes: parse_var(&lookup, "MAX_BODY_BYTES")?
                .unwrap_or(defaults.max_body_bytes),
        })
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigErr>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigErr { var, value })
}
