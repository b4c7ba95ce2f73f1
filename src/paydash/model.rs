use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, immutable identifier of a stored customer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh identifier that cannot collide with seeded (`customer-N`) ones.
    pub fn generate() -> Self {
        Self(format!("customer-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CustomerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Open,
    Paid,
    Inactive,
    Due,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 4] = [
        CustomerStatus::Open,
        CustomerStatus::Paid,
        CustomerStatus::Inactive,
        CustomerStatus::Due,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Open => "Open",
            CustomerStatus::Paid => "Paid",
            CustomerStatus::Inactive => "Inactive",
            CustomerStatus::Due => "Due",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CustomerStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid status: {} (expected one of Open, Paid, Inactive, Due)",
                    s
                )
            })
    }
}

/// A stored customer record, serialized the way the dashboard persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    // Display-only, derived from the collection size at creation time
    pub customer_id: String,
    pub name: String,
    pub description: String,
    pub status: CustomerStatus,
    pub rate: f64,
    pub balance: f64,
    pub deposit: f64,
}

impl Customer {
    pub fn from_draft(id: CustomerId, customer_id: String, draft: CustomerDraft) -> Self {
        Self {
            id,
            customer_id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            rate: draft.rate,
            balance: draft.balance,
            deposit: draft.deposit,
        }
    }

    /// Merges every field present in `patch`; identifiers are never touched.
    pub fn apply(&mut self, patch: CustomerPatch) {
        let mut draft = self.draft();
        draft.apply(patch);
        *self = Customer::from_draft(self.id.clone(), self.customer_id.clone(), draft);
    }

    pub fn draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            rate: self.rate,
            balance: self.balance,
            deposit: self.deposit,
        }
    }
}

/// The editable part of a customer: what the form produces and `create` consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub description: String,
    pub status: CustomerStatus,
    pub rate: f64,
    pub balance: f64,
    pub deposit: f64,
}

impl CustomerDraft {
    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(rate) = patch.rate {
            self.rate = rate;
        }
        if let Some(balance) = patch.balance {
            self.balance = balance;
        }
        if let Some(deposit) = patch.deposit {
            self.deposit = deposit;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<CustomerStatus>,
    pub rate: Option<f64>,
    pub balance: Option<f64>,
    pub deposit: Option<f64>,
}

impl From<CustomerDraft> for CustomerPatch {
    fn from(draft: CustomerDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            status: Some(draft.status),
            rate: Some(draft.rate),
            balance: Some(draft.balance),
            deposit: Some(draft.deposit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer {
            id: CustomerId::from("customer-1"),
            customer_id: "5684236526".into(),
            name: "Ann Culhane".into(),
            description: "Lorem ipsum".into(),
            status: CustomerStatus::Open,
            rate: 70.0,
            balance: -270.0,
            deposit: 500.0,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "customer-1");
        assert_eq!(json["customerId"], "5684236526");
        assert_eq!(json["status"], "Open");
        assert!(json.get("customer_id").is_none());
    }

    #[test]
    fn parses_persisted_record() {
        let raw = r#"{"id":"customer-9","customerId":"5684236534","name":"Alfredo Aminoff",
            "description":"x","status":"Due","rate":70.0,"balance":460,"deposit":500}"#;
        let customer: Customer = serde_json::from_str(raw).unwrap();
        assert_eq!(customer.id.as_str(), "customer-9");
        assert_eq!(customer.status, CustomerStatus::Due);
        assert_eq!(customer.balance, 460.0);
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut customer = sample();
        customer.apply(CustomerPatch {
            status: Some(CustomerStatus::Paid),
            balance: Some(0.0),
            ..Default::default()
        });
        assert_eq!(customer.status, CustomerStatus::Paid);
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.name, "Ann Culhane");
        assert_eq!(customer.id.as_str(), "customer-1");
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("paid".parse::<CustomerStatus>(), Ok(CustomerStatus::Paid));
        assert_eq!("INACTIVE".parse::<CustomerStatus>(), Ok(CustomerStatus::Inactive));
        assert!("closed".parse::<CustomerStatus>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = CustomerId::generate();
        let b = CustomerId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("customer-"));
    }
}
