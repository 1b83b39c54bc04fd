use std::fmt;
use std::str::FromStr;

use secrecy::{
    ExposeSecret,
    SecretString,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    PluginError,
    PluginResult,
};

/// Final status of a CI build as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    /// Status color the host associates with this result
    pub fn color(self) -> BallColor {
        match self {
            BuildResult::Success => BallColor::Blue,
            BuildResult::Unstable => BallColor::Yellow,
            BuildResult::Failure => BallColor::Red,
            BuildResult::NotBuilt => BallColor::NotBuilt,
            BuildResult::Aborted => BallColor::Aborted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
        }
    }
}

impl FromStr for BuildResult {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(BuildResult::Success),
            "UNSTABLE" => Ok(BuildResult::Unstable),
            "FAILURE" => Ok(BuildResult::Failure),
            "NOT_BUILT" => Ok(BuildResult::NotBuilt),
            "ABORTED" => Ok(BuildResult::Aborted),
            other => Err(PluginError::InvalidConfig(format!(
                "Unknown build result: {other}"
            ))),
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status ball colors; the lower-case name is what the traffic light firmware
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    Blue,
    Yellow,
    Red,
    Grey,
    Disabled,
    Aborted,
    NotBuilt,
}

impl BallColor {
    pub fn description(self) -> &'static str {
        match self {
            BallColor::Blue => "blue",
            BallColor::Yellow => "yellow",
            BallColor::Red => "red",
            BallColor::Grey => "grey",
            BallColor::Disabled => "disabled",
            BallColor::Aborted => "aborted",
            BallColor::NotBuilt => "notbuilt",
        }
    }
}

/// Payload sent to the device, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    description: String,
}

impl BuildOutcome {
    pub fn new(description: impl Into<String>) -> PluginResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(PluginError::InvalidConfig(
                "Build outcome description cannot be empty".to_string(),
            ));
        }
        Ok(Self { description })
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<BallColor> for BuildOutcome {
    fn from(color: BallColor) -> Self {
        Self {
            description: color.description().to_string(),
        }
    }
}

impl From<BuildResult> for BuildOutcome {
    fn from(result: BuildResult) -> Self {
        result.color().into()
    }
}

/// Identifier of the target device in the API path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> PluginResult<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(PluginError::InvalidConfig(
                "Device ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = PluginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer token for the cloud API. An empty token is allowed, the API rejects it.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn empty() -> Self {
        Self::new(String::new())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl Default for AccessToken {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// Code reported when no HTTP response was obtained
pub const TRANSPORT_FAILURE_CODE: i32 = -1;

/// Outcome of a single notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationResult {
    Status(u16),
    TransportFailure,
}

impl NotificationResult {
    pub fn code(self) -> i32 {
        match self {
            NotificationResult::Status(status) => i32::from(status),
            NotificationResult::TransportFailure => TRANSPORT_FAILURE_CODE,
        }
    }

    pub fn is_success(self) -> bool {
        self == NotificationResult::Status(200)
    }
}

impl fmt::Display for NotificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of validating a credential from the settings form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum ValidationResult {
    Ok,
    Warning(String),
    Error(String),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Ok)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationResult::Ok => None,
            ValidationResult::Warning(msg) | ValidationResult::Error(msg) => Some(msg),
        }
    }
}
