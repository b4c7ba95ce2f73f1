//! # Row Selectors
//!
//! Front ends refer to rows the way the table shows them: by row number, the
//! 1-based position in the currently filtered list. Stored records are keyed
//! by their opaque [`CustomerId`], so this module maps one onto the other.
//!
//! Supported inputs:
//! - Row number: `3`
//! - Range of row numbers: `3-5` (rows 3, 4 and 5)
//! - Raw identifier: `customer-12` (anything that is not a number or range)
//!
//! Row numbers always resolve against the filtered list, not just the visible
//! page, so `12` addresses the twelfth match even while page 1 is showing.

use crate::error::{DashError, Result};
use crate::model::{Customer, CustomerId};
use crate::view::filter_customers;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelector {
    Number(usize),
    /// Inclusive; only expanded once resolved against the filtered list.
    Range(usize, usize),
    Id(CustomerId),
}

impl fmt::Display for RowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSelector::Number(n) => write!(f, "{}", n),
            RowSelector::Range(start, end) => write!(f, "{}-{}", start, end),
            RowSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Parses one input, which may be a row number, a range of row numbers, or an id.
pub fn parse_selector(s: &str) -> std::result::Result<Vec<RowSelector>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty row selector".to_string());
    }
    if let Ok(n) = s.parse::<usize>() {
        return number(n).map(|sel| vec![sel]);
    }

    // "3-5" is a range; "customer-12" is an id because its start is not a number.
    if let Some((start, end)) = s.split_once('-') {
        if let (Ok(start), Ok(end)) = (start.parse::<usize>(), end.parse::<usize>()) {
            return range(start, end).map(|sel| vec![sel]);
        }
    }

    Ok(vec![RowSelector::Id(CustomerId::from(s))])
}

pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<RowSelector>> {
    let mut selectors = Vec::new();
    for input in inputs {
        let parsed = parse_selector(input.as_ref()).map_err(DashError::Api)?;
        selectors.extend(parsed);
    }
    Ok(selectors)
}

fn number(n: usize) -> std::result::Result<RowSelector, String> {
    if n == 0 {
        return Err("Row numbers start at 1".to_string());
    }
    Ok(RowSelector::Number(n))
}

fn range(start: usize, end: usize) -> std::result::Result<RowSelector, String> {
    if start == 0 {
        return Err("Row numbers start at 1".to_string());
    }
    if start > end {
        return Err(format!(
            "Invalid range: start ({}) must be <= end ({})",
            start, end
        ));
    }
    Ok(RowSelector::Range(start, end))
}

/// Resolves selectors to ids, in input order and without duplicates.
///
/// Row numbers are looked up in `customers` filtered by `query`. Ids must name
/// a record in `customers`, whether or not the filter shows it.
pub fn resolve_selectors(
    customers: &[Customer],
    query: &str,
    selectors: &[RowSelector],
) -> Result<Vec<CustomerId>> {
    let filtered = filter_customers(customers, query);
    let mut resolved: Vec<CustomerId> = Vec::with_capacity(selectors.len());

    let mut push = |id: CustomerId| {
        if !resolved.contains(&id) {
            resolved.push(id);
        }
    };

    for selector in selectors {
        match selector {
            RowSelector::Number(n) => push(row(&filtered, *n)?),
            RowSelector::Range(start, end) => {
                // Reject before expanding so only rows that exist are visited.
                if *end > filtered.len() {
                    let missing = (*start).max(filtered.len() + 1);
                    return Err(DashError::Api(format!("Row {} not found", missing)));
                }
                for n in *start..=*end {
                    push(row(&filtered, n)?);
                }
            }
            RowSelector::Id(id) => push(
                customers
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| DashError::NotFound(id.clone()))?,
            ),
        }
    }

    Ok(resolved)
}

fn row(filtered: &[&Customer], n: usize) -> Result<CustomerId> {
    n.checked_sub(1)
        .and_then(|i| filtered.get(i))
        .map(|c| c.id.clone())
        .ok_or_else(|| DashError::Api(format!("Row {} not found", n)))
}
