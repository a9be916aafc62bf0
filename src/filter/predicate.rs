//! Attribute predicates over record lists.
//!
//! Every predicate keeps the records that pass its test, in their original
//! order. A record without the tested attribute aborts the whole selection
//! with [`InfoError::MissingAttribute`].

use num_bigint::BigInt;

use crate::error::InfoError;
use crate::filter::Record;

/// Keep records whose `attr` equals `value`.
pub fn exact(records: Vec<Record>, attr: &str, value: &str) -> Result<Vec<Record>, InfoError> {
    select(records, attr, |field| Ok(field == value))
}

/// Keep records whose `attr` contains `value`.
pub fn substring(
    records: Vec<Record>,
    attr: &str,
    value: &str,
) -> Result<Vec<Record>, InfoError> {
    select(records, attr, |field| Ok(field.contains(value)))
}

/// Keep records whose `attr`, read as an integer, is below `value`.
pub fn less_than(
    records: Vec<Record>,
    attr: &str,
    value: &str,
) -> Result<Vec<Record>, InfoError> {
    let bound = parse_integer(value)?;
    select(records, attr, |field| Ok(parse_integer(field)? < bound))
}

/// Keep records whose `attr`, read as an integer, is above `value`.
pub fn greater_than(
    records: Vec<Record>,
    attr: &str,
    value: &str,
) -> Result<Vec<Record>, InfoError> {
    let bound = parse_integer(value)?;
    select(records, attr, |field| Ok(parse_integer(field)? > bound))
}

fn select<F>(records: Vec<Record>, attr: &str, mut keep: F) -> Result<Vec<Record>, InfoError>
where
    F: FnMut(&str) -> Result<bool, InfoError>,
{
    let mut selected = Vec::with_capacity(records.len());
    for record in records {
        let field = record
            .get(attr)
            .ok_or_else(|| InfoError::MissingAttribute(attr.to_string()))?;
        if keep(field.as_str())? {
            selected.push(record);
        }
    }
    Ok(selected)
}

/// Integers of any size, so every value the grammar accepts compares.
fn parse_integer(text: &str) -> Result<BigInt, InfoError> {
    text.parse().map_err(|_| InfoError::NotAnInteger {
        value: text.to_string(),
    })
}
