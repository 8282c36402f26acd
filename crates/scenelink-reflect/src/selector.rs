//! Selector wire types.

use serde::Deserialize;
use serde_json::Value;

use scenelink_core::BridgeError;

/// Which live entities a command targets.
///
/// `names` and `paths` are explicit tokens; `filter` is a predicate. A
/// present `filter`, even `{}`, counts as a selector on its own.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Selector {
    /// Display labels.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    /// Structural paths.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    /// Predicate filter.
    #[serde(default)]
    pub filter: Option<Filter>,
}

/// Predicate over entities. Every present clause must pass.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Filter {
    /// Case-insensitive class name substring.
    #[serde(default, alias = "class")]
    pub class_contains: Option<String>,
    /// Case-insensitive glob over the display label.
    #[serde(default)]
    pub name_pattern: Option<String>,
    /// Class names to drop, compared case-insensitively.
    #[serde(default)]
    pub exclude_classes: Vec<String>,
    /// Property rules, AND-combined.
    #[serde(default)]
    pub property_match: Vec<PropertyMatch>,
}

/// One `property_match` rule.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PropertyMatch {
    /// Property name.
    pub name: String,
    /// Expected substring of the property's text form.
    pub value: String,
}

impl Selector {
    /// Parse the `targets` object of a request.
    pub fn from_value(value: &Value) -> Result<Self, BridgeError> {
        if !value.is_object() {
            return Err(BridgeError::invalid_params("Missing object: targets"));
        }
        Self::deserialize(value).map_err(|e| BridgeError::invalid_params(format!("Invalid targets: {e}")))
    }

    /// Selector over explicit labels.
    pub fn by_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Selector that keeps every entity passing `filter`.
    pub fn by_filter(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    /// Non-empty `names`.
    pub(crate) fn name_tokens(&self) -> &[String] {
        self.names.as_deref().unwrap_or_default()
    }

    /// Non-empty `paths`.
    pub(crate) fn path_tokens(&self) -> &[String] {
        self.paths.as_deref().unwrap_or_default()
    }

    /// Whether any explicit token was supplied.
    pub fn has_explicit_tokens(&self) -> bool {
        !self.name_tokens().is_empty() || !self.path_tokens().is_empty()
    }
}
