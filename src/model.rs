//! Data models for the UTM builder
//!
//! Field names serialize in camel case so the persisted history and the JSON
//! surface keep the layout the browser client already reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// One of the six composer inputs
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    WebsiteUrl,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    UtmTerm,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::WebsiteUrl,
        Field::UtmSource,
        Field::UtmMedium,
        Field::UtmCampaign,
        Field::UtmContent,
        Field::UtmTerm,
    ];

    /// Name used in JSON bodies and paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::WebsiteUrl => "websiteUrl",
            Field::UtmSource => "utmSource",
            Field::UtmMedium => "utmMedium",
            Field::UtmCampaign => "utmCampaign",
            Field::UtmContent => "utmContent",
            Field::UtmTerm => "utmTerm",
        }
    }

    /// Query parameter appended for this field, `None` for the base address
    pub fn query_key(&self) -> Option<&'static str> {
        match self {
            Field::WebsiteUrl => None,
            Field::UtmSource => Some("utm_source"),
            Field::UtmMedium => Some("utm_medium"),
            Field::UtmCampaign => Some("utm_campaign"),
            Field::UtmContent => Some("utm_content"),
            Field::UtmTerm => Some("utm_term"),
        }
    }

    /// Whether the form marks this field as mandatory
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Field::WebsiteUrl | Field::UtmSource | Field::UtmMedium | Field::UtmCampaign
        )
    }

    /// Tracking fields restricted to letters, digits, `_` and `-`
    pub fn is_token(&self) -> bool {
        matches!(self, Field::UtmCampaign | Field::UtmContent | Field::UtmTerm)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ApiError::UnknownField(s.to_string()))
    }
}

/// The six raw input values
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct UtmFields {
    pub website_url: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub utm_content: String,
    pub utm_term: String,
}

impl UtmFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::WebsiteUrl => &self.website_url,
            Field::UtmSource => &self.utm_source,
            Field::UtmMedium => &self.utm_medium,
            Field::UtmCampaign => &self.utm_campaign,
            Field::UtmContent => &self.utm_content,
            Field::UtmTerm => &self.utm_term,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::WebsiteUrl => &mut self.website_url,
            Field::UtmSource => &mut self.utm_source,
            Field::UtmMedium => &mut self.utm_medium,
            Field::UtmCampaign => &mut self.utm_campaign,
            Field::UtmContent => &mut self.utm_content,
            Field::UtmTerm => &mut self.utm_term,
        };
        *slot = value;
    }
}

/// Validation messages keyed by field; a missing key means "no error"
pub type FieldErrors = BTreeMap<Field, String>;

/// A previously generated URL, stored in the persisted history
///
/// Immutable once created. `timestamp` (Unix milliseconds) doubles as the
/// entry's unique key.
///
/// # Example
/// ```json
/// {
///   "url": "https://example.com/?utm_source=google&utm_medium=cpc",
///   "domain": "example.com",
///   "source": "google",
///   "medium": "cpc",
///   "campaign": "-",
///   "timestamp": 1737121200000
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The full composed URL at the time it was recorded
    pub url: String,

    /// Host component of `url`
    pub domain: String,

    /// Decoded `utm_source`, or the placeholder when absent
    pub source: String,

    /// Decoded `utm_medium`, or the placeholder when absent
    pub medium: String,

    /// Decoded `utm_campaign`, or the placeholder when absent
    pub campaign: String,

    pub timestamp: i64,
}

/// Everything the UI needs to render one frame
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub fields: UtmFields,
    pub errors: FieldErrors,
    pub generated_url: String,
    pub missing_required: Vec<Field>,
    pub history: Vec<HistoryEntry>,
}

/// Request body for updating a single field
#[derive(Deserialize)]
pub struct SetFieldRequest {
    pub value: String,
}

/// Request body for running a validator on demand
#[derive(Deserialize)]
pub struct ValidateRequest {
    pub field: Field,
    pub value: String,
}

#[derive(Serialize, Debug)]
pub struct ValidateResponse {
    pub valid: bool,
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub generated_url: String,
}

/// Query parameters for the preset lookup
///
/// # Example
/// Query string: `?q=insta`
#[derive(Deserialize)]
pub struct OptionsParams {
    pub q: Option<String>,
}
