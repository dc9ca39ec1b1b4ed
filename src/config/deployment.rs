use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How the hardware is paid for
///
/// Labels match exactly (`local`, `cloud`, `hosted`). Anything else, including
/// other casings, is kept as `Unrecognized` and priced at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DeploymentMode {
    /// Owned hardware amortized over three years plus electricity
    #[default]
    Local,
    /// Rented by the hour
    Cloud,
    /// Flat per-request API price
    Hosted,
    Unrecognized(String),
}

impl DeploymentMode {
    pub fn label(&self) -> &str {
        match self {
            DeploymentMode::Local => "local",
            DeploymentMode::Cloud => "cloud",
            DeploymentMode::Hosted => "hosted",
            DeploymentMode::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeploymentMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "local" => DeploymentMode::Local,
            "cloud" => DeploymentMode::Cloud,
            "hosted" => DeploymentMode::Hosted,
            _ => DeploymentMode::Unrecognized(s.to_string()),
        })
    }
}

impl From<&str> for DeploymentMode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(mode) => mode,
            Err(never) => match never {},
        }
    }
}

impl Serialize for DeploymentMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DeploymentMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(DeploymentMode::from(label.as_str()))
    }
}
