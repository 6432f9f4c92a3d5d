//! Custom field rules for `#[validate(custom(...))]`.
//!
//! Membership rules fail with code `in` and carry the allowed values, so
//! the rendered message matches the built-in rules.

use std::borrow::Cow;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use domain::{
    BillingCycle, Currency, DocumentType, LeaseStatus, PaymentMethod, Role, SubscriptionStatus,
    SubscriptionTier, UnitStatus,
};

/// Wire format of date-only fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable pattern is valid"));

fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("in");
    err.add_param(Cow::from("values"), &allowed.join(","));
    Err(err)
}

pub fn subscription_tier(value: &str) -> Result<(), ValidationError> {
    one_of(value, &SubscriptionTier::values())
}

pub fn subscription_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &SubscriptionStatus::values())
}

pub fn billing_cycle(value: &str) -> Result<(), ValidationError> {
    one_of(value, &BillingCycle::values())
}

/// Roles a landlord user can hold; `super_admin` is never accepted.
pub fn assignable_role(value: &str) -> Result<(), ValidationError> {
    one_of(value, &Role::assignable())
}

pub fn document_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, &DocumentType::values())
}

pub fn currency(value: &str) -> Result<(), ValidationError> {
    one_of(value, &Currency::values())
}

pub fn unit_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &UnitStatus::values())
}

pub fn lease_status(value: &str) -> Result<(), ValidationError> {
    one_of(value, &LeaseStatus::values())
}

pub fn payment_method(value: &str) -> Result<(), ValidationError> {
    one_of(value, &PaymentMethod::values())
}

pub fn date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::new("date"))
}

/// Template variable names: identifiers usable inside `{{ }}`.
pub fn variable_names(names: &[String]) -> Result<(), ValidationError> {
    if names.iter().all(|n| VARIABLE_NAME.is_match(n)) {
        return Ok(());
    }
    let mut err = ValidationError::new("variables");
    err.message = Some(Cow::from(
        "Variable names may only contain letters, digits and underscores.",
    ));
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_value_passes() {
        for tier in SubscriptionTier::values() {
            assert!(subscription_tier(tier).is_ok());
        }
        for kind in DocumentType::values() {
            assert!(document_type(kind).is_ok());
        }
        for code in Currency::values() {
            assert!(currency(code).is_ok());
        }
        for method in PaymentMethod::values() {
            assert!(payment_method(method).is_ok());
        }
    }

    #[test]
    fn test_values_outside_list_fail_with_in_code() {
        let err = subscription_tier("platinum").unwrap_err();
        assert_eq!(err.code, "in");
        assert!(currency("EUR").is_err());
        assert!(document_type("Lease_Agreement").is_err());
        assert!(billing_cycle("weekly").is_err());
    }

    #[test]
    fn test_super_admin_is_not_assignable() {
        assert!(assignable_role("super_admin").is_err());
        assert!(assignable_role("manager").is_ok());
    }

    #[test]
    fn test_date_format() {
        assert!(date("2025-02-28").is_ok());
        assert!(date("2025-02-30").is_err());
        assert!(date("28/02/2025").is_err());
    }

    #[test]
    fn test_variable_names() {
        assert!(variable_names(&["tenant_name".to_string(), "_x1".to_string()]).is_ok());
        assert!(variable_names(&["tenant name".to_string()]).is_err());
    }
}
