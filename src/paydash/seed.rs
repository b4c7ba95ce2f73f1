//! Deterministic demo data used to populate an empty store on first read.

use crate::model::{Customer, CustomerId, CustomerStatus};

pub const DEFAULT_SEED_COUNT: usize = 97;

const NAMES: [&str; 20] = [
    "Ann Culhane",
    "Ahmad Rosser",
    "Zain Calzoni",
    "Leo Stanton",
    "Kaiya Vetrovs",
    "Ryan Westervelt",
    "Corey Stanton",
    "Adison Aminoff",
    "Alfredo Aminoff",
    "Maria Garcia",
    "James Wilson",
    "Sarah Johnson",
    "Michael Brown",
    "Emily Davis",
    "Robert Miller",
    "Jennifer Taylor",
    "David Anderson",
    "Lisa Thomas",
    "William Jackson",
    "Patricia White",
];

const BALANCES: [f64; 12] = [
    -270.0, 270.0, -20.0, 600.0, -350.0, -270.0, 30.0, -270.0, 460.0, 150.0, -180.0, 320.0,
];

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nulla...";

/// Secondary, human-readable id for the record created at collection size `index`.
pub fn customer_number(index: usize) -> String {
    format!("5684236{}", 526 + index)
}

pub fn generate_customers(count: usize) -> Vec<Customer> {
    (0..count)
        .map(|index| Customer {
            id: CustomerId::new(format!("customer-{}", index + 1)),
            customer_id: customer_number(index),
            name: NAMES[index % NAMES.len()].to_string(),
            description: DESCRIPTION.to_string(),
            status: CustomerStatus::ALL[index % CustomerStatus::ALL.len()],
            rate: 70.0,
            balance: BALANCES[index % BALANCES.len()],
            deposit: 500.0,
        })
        .collect()
}
