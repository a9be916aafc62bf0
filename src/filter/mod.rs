//! Client-side filtering of image and server records.
//!
//! A filter expression such as `name~sles,publishedon>20200101` is parsed
//! into a [`FilterChain`]. Applying the chain narrows a record list one
//! filter at a time, so the filters combine as a logical AND.

mod parser;
pub mod predicate;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::InfoError;

/// One image or server descriptor: attribute name to attribute value.
pub type Record = BTreeMap<String, String>;

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`: string equality.
    Exact,
    /// `~`: substring containment.
    Substring,
    /// `<`: integer less-than.
    LessThan,
    /// `>`: integer greater-than.
    GreaterThan,
}

impl Operator {
    /// The symbol used for this operator in filter expressions.
    pub fn symbol(self) -> char {
        match self {
            Operator::Exact => '=',
            Operator::Substring => '~',
            Operator::LessThan => '<',
            Operator::GreaterThan => '>',
        }
    }

    fn select(
        self,
        records: Vec<Record>,
        attr: &str,
        value: &str,
    ) -> Result<Vec<Record>, InfoError> {
        match self {
            Operator::Exact => predicate::exact(records, attr, value),
            Operator::Substring => predicate::substring(records, attr, value),
            Operator::LessThan => predicate::less_than(records, attr, value),
            Operator::GreaterThan => predicate::greater_than(records, attr, value),
        }
    }
}

impl FromStr for Operator {
    type Err = InfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Exact),
            "~" => Ok(Operator::Substring),
            "<" => Ok(Operator::LessThan),
            ">" => Ok(Operator::GreaterThan),
            _ => Err(InfoError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single validated `attr<op>value` filter.
///
/// Only produced by [`FilterChain::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    attr: String,
    operator: Operator,
    value: String,
}

impl FilterDescriptor {
    pub(crate) fn new(attr: &str, operator: &str, value: &str) -> Result<Self, InfoError> {
        Ok(Self {
            attr: attr.to_string(),
            operator: operator.parse()?,
            value: value.to_string(),
        })
    }

    pub fn attr(&self) -> &str {
        &self.attr
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Narrow `records` to those passing this filter.
    pub fn apply(&self, records: Vec<Record>) -> Result<Vec<Record>, InfoError> {
        self.operator.select(records, &self.attr, &self.value)
    }
}

impl fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.attr, self.operator, self.value)
    }
}

/// Ordered filters parsed from one filter expression, plus the phrases
/// that were rejected on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    filters: Vec<FilterDescriptor>,
    rejected: Vec<String>,
}

impl FilterChain {
    /// Parse a comma-separated filter expression.
    ///
    /// Phrases that match no grammar rule are logged as warnings and
    /// dropped; they never fail the parse. Whitespace is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns `InfoError::UnknownOperator` if a grammar rule captures an
    /// operator outside of `=`, `~`, `<` and `>`.
    pub fn parse(expression: &str) -> Result<Self, InfoError> {
        parser::parse(expression)
    }

    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Phrases that matched no grammar rule, in input order.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every filter in order; see [`apply_filters`].
    pub fn apply(&self, records: Vec<Record>) -> Result<Vec<Record>, InfoError> {
        apply_filters(records, &self.filters)
    }
}

/// Fold `filters` over `records`, each filter narrowing the output of the
/// previous one. An empty filter list returns `records` unchanged.
pub fn apply_filters(
    records: Vec<Record>,
    filters: &[FilterDescriptor],
) -> Result<Vec<Record>, InfoError> {
    filters.iter().try_fold(records, |working, filter| {
        let before = working.len();
        let selected = filter.apply(working)?;
        debug!(%filter, before, after = selected.len(), "applied filter");
        Ok(selected)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, name: &str, publishedon: &str) -> Record {
        Record::from([
            ("id".to_string(), id.to_string()),
            ("name".to_string(), name.to_string()),
            ("publishedon".to_string(), publishedon.to_string()),
        ])
    }

    fn catalog() -> Vec<Record> {
        vec![
            image("ami-1", "suse-sles-12-sp5", "20190101"),
            image("ami-2", "suse-sles-15-sp4", "20220601"),
            image("ami-3", "opensuse-leap-15", "20230101"),
            image("ami-4", "suse-sles-15-sp5", "20230615"),
        ]
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Exact);
        assert_eq!("~".parse::<Operator>().unwrap(), Operator::Substring);
        assert_eq!("<".parse::<Operator>().unwrap(), Operator::LessThan);
        assert_eq!(">".parse::<Operator>().unwrap(), Operator::GreaterThan);
    }

    #[test]
    fn test_unknown_operator() {
        let result = FilterDescriptor::new("id", "!", "1");
        assert!(matches!(result, Err(InfoError::UnknownOperator(op)) if op == "!"));
    }

    #[test]
    fn test_descriptor_display() {
        let filter = FilterDescriptor::new("publishedon", ">", "20200101").unwrap();
        assert_eq!(filter.to_string(), "publishedon>20200101");
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let result = apply_filters(catalog(), &[]).unwrap();
        assert_eq!(result, catalog());
        assert_eq!(FilterChain::default().apply(catalog()).unwrap(), catalog());
    }

    #[test]
    fn test_chain_narrows_sequentially() {
        let chain = FilterChain::parse("name~sles,publishedon>20200101").unwrap();
        let result = chain.apply(catalog()).unwrap();
        let ids: Vec<&str> = result.iter().map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, ["ami-2", "ami-4"]);
    }

    #[test]
    fn test_independent_filters_commute() {
        let forward = FilterChain::parse("name~suse,publishedon<20230601").unwrap();
        let backward = FilterChain::parse("publishedon<20230601,name~suse").unwrap();
        assert_eq!(
            forward.apply(catalog()).unwrap(),
            backward.apply(catalog()).unwrap()
        );
    }

    #[test]
    fn test_chain_stops_on_error() {
        let mut records = catalog();
        records[2].remove("publishedon");
        let chain = FilterChain::parse("publishedon>20200101").unwrap();
        assert!(matches!(
            chain.apply(records),
            Err(InfoError::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_earlier_filter_shields_later_one() {
        let mut records = catalog();
        records[0].insert("publishedon".to_string(), "unknown".to_string());
        let chain = FilterChain::parse("id=ami-4,publishedon>20200101").unwrap();
        let result = chain.apply(records).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["id"], "ami-4");
    }
}
