//! The group resource and its request schemas.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("hex color pattern compiles")
});

/// Opaque identifier of a group, taken verbatim from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a group ID from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named, optionally colored label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Hex color, `#RRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of a create-group request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateGroup {
    /// Display name, 1 to 50 characters.
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// Optional hex color.
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

/// Body of an update-group request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateGroup {
    /// New display name.
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    /// New hex color.
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

impl UpdateGroup {
    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Returns `true` if `color` is a `#`-prefixed 6-digit hex color.
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color")
            .with_message("color must be a 6-digit hex color such as #FF00FF".into()))
    }
}
