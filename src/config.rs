use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use num_bigint::BigUint;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    modular::CrtCoefficients,
    obfuscator::IdentityObfuscator,
    types::{ModulusPair, REFERENCE_P, REFERENCE_Q},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML config: {details}")]
    Parse { details: String },
    #[error("configuration invalid: {0}")]
    Validation(String),
}

/// Per-deployment settings.
///
/// ```toml
/// [moduli]
/// p = "107"
/// q = "113"
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub moduli: ModuliSection,
}

/// Decimal strings so moduli of any size survive TOML's 64-bit integers.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModuliSection {
    #[serde(default = "default_p")]
    pub p: String,
    #[serde(default = "default_q")]
    pub q: String,
}

fn default_p() -> String {
    REFERENCE_P.to_string()
}

fn default_q() -> String {
    REFERENCE_Q.to_string()
}

impl Default for ModuliSection {
    fn default() -> Self {
        Self { p: default_p(), q: default_q() }
    }
}

fn parse_modulus(name: &str, value: &str) -> Result<BigUint, ConfigError> {
    let modulus = BigUint::from_str(value.trim())
        .map_err(|err| ConfigError::Validation(format!("modulus {name} = {value:?}: {err}")))?;
    if modulus <= BigUint::from(1u8) {
        return Err(ConfigError::Validation(format!("modulus {name} must be greater than one")));
    }
    Ok(modulus)
}

impl DeploymentConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and `ConfigError::Validation`
    /// for unusable moduli.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|err| ConfigError::Parse { details: err.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`DeploymentConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a modulus is not a decimal integer
    /// greater than one or the pair is not coprime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pair = self.modulus_pair()?;
        CrtCoefficients::compute(&pair)
            .map(|_| ())
            .map_err(|err| ConfigError::Validation(format!("moduli p and q must be coprime: {err}")))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a modulus does not parse or is `<= 1`.
    pub fn modulus_pair(&self) -> Result<ModulusPair, ConfigError> {
        let p = parse_modulus("p", &self.moduli.p)?;
        let q = parse_modulus("q", &self.moduli.q)?;
        Ok(ModulusPair::new(p, q))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when the moduli are unusable.
    pub fn obfuscator(&self) -> Result<IdentityObfuscator, ConfigError> {
        IdentityObfuscator::new(self.modulus_pair()?)
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }
}
