//! URL composition and per-field validation state
//!
//! `compose` is a pure function of the six input fields. `Composer` owns the
//! live form state and calls it explicitly after every mutation, so the
//! generated URL is never stale and never depends on anything else.

use tracing::debug;
use url::Url;

use crate::error::ComposeError;
use crate::model::{Field, FieldErrors, UtmFields};
use crate::validation::{
    is_valid_token, is_valid_website_url, INVALID_TOKEN_MESSAGE, INVALID_URL_MESSAGE,
};

/// Tracking fields in the order their parameters are appended
pub const TRACKING_FIELDS: [Field; 5] = [
    Field::UtmSource,
    Field::UtmMedium,
    Field::UtmCampaign,
    Field::UtmContent,
    Field::UtmTerm,
];

/// Builds the tracking URL, or an empty string when there is nothing to build
pub fn compose(fields: &UtmFields) -> String {
    compose_checked(fields).unwrap_or_default()
}

/// Like [`compose`], but tells "no base URL yet" apart from "base URL does not parse"
///
/// Existing query parameters on the base URL are kept; tracking parameters
/// are appended after them even when a key already exists.
pub fn compose_checked(fields: &UtmFields) -> Result<String, ComposeError> {
    if fields.website_url.is_empty() {
        return Err(ComposeError::Empty);
    }

    let mut url = Url::parse(&fields.website_url)?;

    let params: Vec<(&str, &str)> = TRACKING_FIELDS
        .iter()
        .filter_map(|field| {
            let key = field.query_key()?;
            let value = fields.get(*field);
            if value.is_empty() {
                None
            } else {
                Some((key, value))
            }
        })
        .collect();

    // Opening the serializer on a query-less URL would leave a bare '?'
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url.to_string())
}

/// Live form state: inputs, validation errors, and the derived URL
#[derive(Debug, Clone, Default)]
pub struct Composer {
    fields: UtmFields,
    errors: FieldErrors,
    generated_url: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &UtmFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn generated_url(&self) -> &str {
        &self.generated_url
    }

    /// Updates one input, re-validates it and recomputes the generated URL
    ///
    /// `websiteUrl` is checked with the URL rule and the campaign, content
    /// and term fields with the token rule. Source and medium come from
    /// preset lists and are stored as given.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();

        match field {
            Field::WebsiteUrl => {
                self.validate_website_url(&value);
            }
            f if f.is_token() => {
                self.validate_token(&value, Some(f));
            }
            _ => {}
        }

        self.fields.set(field, value);
        self.generated_url = compose(&self.fields);

        debug!(field = %field, generated_url = %self.generated_url, "field updated");
    }

    /// Replaces all six inputs, re-validating each one
    pub fn apply(&mut self, fields: UtmFields) {
        for field in Field::ALL {
            self.set_field(field, fields.get(field));
        }
    }

    /// Checks a base address and records or clears its error
    pub fn validate_website_url(&mut self, value: &str) -> bool {
        let valid = is_valid_website_url(value);
        self.mark(Field::WebsiteUrl, valid, INVALID_URL_MESSAGE);
        valid
    }

    /// Checks a tracking token; the error entry is only touched when `field` is given
    pub fn validate_token(&mut self, value: &str, field: Option<Field>) -> bool {
        let valid = is_valid_token(value);
        if let Some(field) = field {
            self.mark(field, valid, INVALID_TOKEN_MESSAGE);
        }
        valid
    }

    /// Required fields that are still empty, in form order
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.fields.get(*field).is_empty())
            .collect()
    }

    fn mark(&mut self, field: Field, valid: bool, message: &str) {
        if valid {
            self.errors.remove(&field);
        } else {
            self.errors.insert(field, message.to_string());
        }
    }
}
