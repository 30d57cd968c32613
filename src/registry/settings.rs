use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::registry::types::{InjectError, InjectResult};

pub const REDECLARE_POLICY_ENV: &str = "DEPINJECT_REDECLARE_POLICY";

static GLOBAL_REDECLARE_POLICY: AtomicU8 = AtomicU8::new(RedeclarePolicy::Strict as u8);

/// What `declare` does when the slot already holds a construction function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RedeclarePolicy {
    /// Reject with `AlreadyDeclared`; the first declaration stays in effect.
    #[default]
    Strict = 0,
    /// Replace the declaration and drop any cached shared instance.
    #[serde(alias = "overwrite")]
    Permissive = 1,
}

impl RedeclarePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            RedeclarePolicy::Strict => "strict",
            RedeclarePolicy::Permissive => "permissive",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => RedeclarePolicy::Permissive,
            _ => RedeclarePolicy::Strict,
        }
    }
}

impl fmt::Display for RedeclarePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedeclarePolicy {
    type Err = InjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(RedeclarePolicy::Strict),
            "permissive" | "overwrite" => Ok(RedeclarePolicy::Permissive),
            _ => Err(InjectError::InvalidPolicy {
                value: s.to_string(),
            }),
        }
    }
}

pub trait IntoRedeclarePolicy {
    fn into_redeclare_policy(self) -> InjectResult<RedeclarePolicy>;
}

impl IntoRedeclarePolicy for RedeclarePolicy {
    fn into_redeclare_policy(self) -> InjectResult<RedeclarePolicy> {
        Ok(self)
    }
}

impl IntoRedeclarePolicy for &str {
    fn into_redeclare_policy(self) -> InjectResult<RedeclarePolicy> {
        RedeclarePolicy::from_str(self)
    }
}

impl IntoRedeclarePolicy for String {
    fn into_redeclare_policy(self) -> InjectResult<RedeclarePolicy> {
        RedeclarePolicy::from_str(&self)
    }
}

/// Process-wide registry configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectSettings {
    pub redeclare_policy: RedeclarePolicy,
}

impl InjectSettings {
    pub fn with_redeclare_policy<P>(mut self, policy: P) -> InjectResult<Self>
    where
        P: IntoRedeclarePolicy,
    {
        self.redeclare_policy = policy.into_redeclare_policy()?;
        Ok(self)
    }

    /// Parses settings from a JSON document such as
    /// `{"redeclare_policy": "permissive"}`. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> InjectResult<Self> {
        serde_json::from_str(json).map_err(|err| InjectError::InvalidSettings {
            message: err.to_string(),
        })
    }

    /// Reads `DEPINJECT_REDECLARE_POLICY`, falling back to the defaults when
    /// the variable is unset. A set but unrecognised value is an error.
    pub fn from_env() -> InjectResult<Self> {
        match env::var(REDECLARE_POLICY_ENV) {
            Ok(value) => Self::default().with_redeclare_policy(value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(raw)) => Err(InjectError::InvalidPolicy {
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }
}

pub fn redeclare_policy() -> RedeclarePolicy {
    RedeclarePolicy::from_u8(GLOBAL_REDECLARE_POLICY.load(Ordering::SeqCst))
}

pub fn set_redeclare_policy<P>(policy: P) -> InjectResult<()>
where
    P: IntoRedeclarePolicy,
{
    let policy = policy.into_redeclare_policy()?;
    GLOBAL_REDECLARE_POLICY.store(policy as u8, Ordering::SeqCst);
    log::debug!("redeclare policy set to {policy}");
    Ok(())
}

pub fn configure(settings: &InjectSettings) {
    GLOBAL_REDECLARE_POLICY.store(settings.redeclare_policy as u8, Ordering::SeqCst);
    log::debug!("registry configured: {settings:?}");
}
