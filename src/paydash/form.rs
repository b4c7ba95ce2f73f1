//! # Customer Form
//!
//! The add/update modal's data and its submit-time validation. Validation is
//! resolved here and never reaches the data layer: a form either becomes a
//! [`CustomerDraft`] or a list of per-field errors to show inline.

use crate::model::{Customer, CustomerDraft, CustomerPatch, CustomerStatus};
use std::fmt;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const RATE_RANGE: (f64, f64) = (0.0, 10_000.0);
pub const BALANCE_RANGE: (f64, f64) = (-100_000.0, 100_000.0);
pub const DEPOSIT_RANGE: (f64, f64) = (0.0, 100_000.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Status,
    Rate,
    Balance,
    Deposit,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Status => "Status",
            Field::Rate => "Rate (CAD)",
            Field::Balance => "Balance (CAD)",
            Field::Deposit => "Deposit (CAD)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The first message for `field`, the way an inline form message shows it.
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push(&mut self, field: Field, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Values currently held by the form modal.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub description: String,
    pub status: CustomerStatus,
    pub rate: f64,
    pub balance: f64,
    pub deposit: f64,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: CustomerStatus::Open,
            rate: 70.0,
            balance: 0.0,
            deposit: 500.0,
        }
    }
}

impl CustomerForm {
    /// Pre-populates the form from the record being edited.
    pub fn from_customer(customer: &Customer) -> Self {
        customer.draft().into()
    }

    /// Overwrites the fields present in `patch`, as typing into the inputs would.
    pub fn merge(self, patch: CustomerPatch) -> Self {
        let mut draft = self.draft();
        draft.apply(patch);
        draft.into()
    }

    fn draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            rate: self.rate,
            balance: self.balance,
            deposit: self.deposit,
        }
    }

    pub fn validate(&self) -> Result<CustomerDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name_len = self.name.chars().count();
        if name_len < NAME_MIN_CHARS {
            errors.push(Field::Name, "Name must be at least 2 characters");
        } else if name_len > NAME_MAX_CHARS {
            errors.push(Field::Name, "Name must be less than 100 characters");
        }

        let description_len = self.description.chars().count();
        if description_len == 0 {
            errors.push(Field::Description, "Description is required");
        } else if description_len > DESCRIPTION_MAX_CHARS {
            errors.push(
                Field::Description,
                "Description must be less than 500 characters",
            );
        }

        check_range(
            &mut errors,
            Field::Rate,
            self.rate,
            RATE_RANGE,
            "Rate must be positive",
            "Rate must be less than 10,000",
        );
        check_range(
            &mut errors,
            Field::Balance,
            self.balance,
            BALANCE_RANGE,
            "Balance is too low",
            "Balance is too high",
        );
        check_range(
            &mut errors,
            Field::Deposit,
            self.deposit,
            DEPOSIT_RANGE,
            "Deposit must be positive",
            "Deposit must be less than 100,000",
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.draft())
    }
}

impl From<CustomerDraft> for CustomerForm {
    fn from(draft: CustomerDraft) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            status: draft.status,
            rate: draft.rate,
            balance: draft.balance,
            deposit: draft.deposit,
        }
    }
}

fn check_range(
    errors: &mut ValidationErrors,
    field: Field,
    value: f64,
    (min, max): (f64, f64),
    too_low: &str,
    too_high: &str,
) {
    if !value.is_finite() {
        errors.push(field, "Expected a number");
    } else if value < min {
        errors.push(field, too_low);
    } else if value > max {
        errors.push(field, too_high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CustomerForm {
        CustomerForm {
            name: "Leo Stanton".into(),
            description: "Monthly retainer".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_match_the_add_form() {
        let form = CustomerForm::default();
        assert_eq!(form.status, CustomerStatus::Open);
        assert_eq!(form.rate, 70.0);
        assert_eq!(form.balance, 0.0);
        assert_eq!(form.deposit, 500.0);
        assert!(form.name.is_empty());
    }

    #[test]
    fn valid_form_becomes_a_draft() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.name, "Leo Stanton");
        assert_eq!(draft.deposit, 500.0);
    }

    #[test]
    fn empty_default_form_reports_name_and_description() {
        let errors = CustomerForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field(Field::Name),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            errors.for_field(Field::Description),
            Some("Description is required")
        );
    }

    #[test]
    fn length_limits_count_characters() {
        let mut form = valid_form();
        form.name = "é".repeat(100);
        assert!(form.validate().is_ok());

        form.name = "a".repeat(101);
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.for_field(Field::Name),
            Some("Name must be less than 100 characters")
        );

        let mut form = valid_form();
        form.description = "x".repeat(501);
        assert!(form.validate().unwrap_err().for_field(Field::Description).is_some());
    }

    #[test]
    fn numeric_ranges_are_inclusive() {
        let mut form = valid_form();
        form.rate = 10_000.0;
        form.balance = -100_000.0;
        form.deposit = 0.0;
        assert!(form.validate().is_ok());

        form.rate = -0.01;
        form.balance = 100_000.01;
        form.deposit = 100_001.0;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field(Field::Rate), Some("Rate must be positive"));
        assert_eq!(errors.for_field(Field::Balance), Some("Balance is too high"));
        assert_eq!(
            errors.for_field(Field::Deposit),
            Some("Deposit must be less than 100,000")
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut form = valid_form();
        form.rate = f64::NAN;
        form.balance = f64::INFINITY;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.for_field(Field::Rate), Some("Expected a number"));
        assert_eq!(errors.for_field(Field::Balance), Some("Expected a number"));
    }

    #[test]
    fn merge_overwrites_only_given_fields() {
        let form = valid_form().merge(CustomerPatch {
            status: Some(CustomerStatus::Due),
            ..Default::default()
        });
        assert_eq!(form.status, CustomerStatus::Due);
        assert_eq!(form.name, "Leo Stanton");
    }

    #[test]
    fn form_and_record_merge_the_same_way() {
        let patch = CustomerPatch {
            name: Some("Zain Calzoni".into()),
            balance: Some(-40.0),
            ..Default::default()
        };
        let mut customer = crate::seed::generate_customers(1).remove(0);
        let form = CustomerForm::from_customer(&customer).merge(patch.clone());
        customer.apply(patch);

        assert_eq!(form, CustomerForm::from_customer(&customer));
        assert_eq!(form.validate().unwrap(), customer.draft());
    }
}
