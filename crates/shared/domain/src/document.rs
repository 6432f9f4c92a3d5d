//! Document templates with `{{ variable }}` placeholders.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

string_enum! {
    /// Kinds of documents a landlord can template.
    pub enum DocumentType {
        LeaseAgreement => "lease_agreement",
        LeaseRenewal => "lease_renewal",
        RentInvoice => "rent_invoice",
        PaymentReceipt => "payment_receipt",
        LatePaymentNotice => "late_payment_notice",
        EvictionNotice => "eviction_notice",
        MoveInInspection => "move_in_inspection",
        MoveOutInspection => "move_out_inspection",
    }
}

/// Document template entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentType,
    /// HTML body
    pub body: String,
    pub variables: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentTemplate {
    /// Distinct placeholder names in `body`, sorted.
    pub fn placeholders(body: &str) -> Vec<String> {
        PLACEHOLDER
            .captures_iter(body)
            .map(|c| c[1].to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Substitute every placeholder with its value.
    ///
    /// Declared variables must all be supplied. Values are HTML-escaped.
    /// Placeholders that are not declared and have no value are left
    /// untouched.
    pub fn render(&self, values: &HashMap<String, String>) -> DomainResult<String> {
        let missing: Vec<String> = self
            .variables
            .iter()
            .filter(|v| !values.contains_key(*v))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::MissingVariables(missing));
        }

        let rendered = PLACEHOLDER.replace_all(&self.body, |caps: &Captures| {
            values
                .get(&caps[1])
                .map(|value| html_escape::encode_safe(value).into_owned())
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(rendered.into_owned())
    }
}
