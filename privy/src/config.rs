use std::path::Path;

use privy_core::{
    Casemapping, NetworkFeatures, PrivilegeLevel,
    isupport::{ChannelModes, DEFAULT_CHANMODES, DEFAULT_PREFIX, PrefixMap},
};
use serde::{Deserialize, Deserializer};
use smart_default::SmartDefault;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("network.prefix is not a valid PREFIX value: {0:?}")]
    Prefix(String),
}

#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    pub bot: Bot,
    pub network: Network,
    pub commands: Commands,
}

#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Bot {
    #[default("privy".into())]
    pub nick: String,
    #[default("!".into())]
    pub prefix: String,
    /// joined once the replay starts
    pub channels: Vec<String>,
}

/// what to assume about the network until its 005 says otherwise
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Network {
    pub casemapping: Casemapping,
    #[default(DEFAULT_PREFIX.into())]
    pub prefix: String,
    #[default(DEFAULT_CHANMODES.into())]
    pub chanmodes: String,
}

#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Commands {
    #[default(PrivilegeLevel::OP)]
    #[serde(deserialize_with = "privilege_level")]
    pub ops_min_privilege: PrivilegeLevel,
    /// nicks allowed to use `join`, `part` and `quit`, they also need to be
    /// logged in to services
    pub admins: Vec<String>,
}

fn privilege_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PrivilegeLevel, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

impl Config {
    /// reads `path` when given, the defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    #[cfg(test)]
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }
}

impl Network {
    pub fn features(&self) -> Result<NetworkFeatures, ConfigError> {
        let prefixes =
            PrefixMap::parse(&self.prefix).ok_or_else(|| ConfigError::Prefix(self.prefix.clone()))?;
        Ok(NetworkFeatures {
            prefixes,
            chanmodes: ChannelModes::parse(&self.chanmodes),
            casemapping: self.casemapping,
            ..Default::default()
        })
    }
}
