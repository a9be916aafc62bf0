//! Filter expression grammar.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::InfoError;
use crate::filter::{FilterChain, FilterDescriptor};

/// Attribute name and full-phrase pattern for every filterable attribute.
const RULES: &[(&str, &str)] = &[
    ("id", r"^(?P<attr>id)(?P<operator>=)(?P<value>.+)$"),
    (
        "replacementid",
        r"^(?P<attr>replacementid)(?P<operator>=)(?P<value>.+)$",
    ),
    (
        "ip",
        r"^(?P<attr>ip)(?P<operator>=)(?P<value>[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)$",
    ),
    ("name", r"^(?P<attr>name)(?P<operator>~)(?P<value>.+)$"),
    (
        "replacementname",
        r"^(?P<attr>replacementname)(?P<operator>~)(?P<value>.+)$",
    ),
    (
        "publishedon",
        r"^(?P<attr>publishedon)(?P<operator>[<=>])(?P<value>[0-9]+)$",
    ),
    (
        "deprecatedon",
        r"^(?P<attr>deprecatedon)(?P<operator>[<=>])(?P<value>[0-9]+)$",
    ),
    (
        "deletedon",
        r"^(?P<attr>deletedon)(?P<operator>[<=>])(?P<value>[0-9]+)$",
    ),
];

static GRAMMAR: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(attr, pattern)| {
            Regex::new(pattern).unwrap_or_else(|e| panic!("bad grammar rule for {attr}: {e}"))
        })
        .collect()
});

pub(super) fn parse(expression: &str) -> Result<FilterChain, InfoError> {
    let mut chain = FilterChain::default();
    if expression.is_empty() {
        return Ok(chain);
    }

    for phrase in expression.split(',') {
        match match_phrase(&GRAMMAR, phrase)? {
            Some(filter) => chain.filters.push(filter),
            None => {
                warn!("invalid filter phrase '{phrase}' will be ignored");
                chain.rejected.push(phrase.to_string());
            }
        }
    }

    debug!(filters = ?chain.filters, "parsed filter expression");
    Ok(chain)
}

/// First grammar rule matching the whole phrase, as a descriptor.
fn match_phrase(rules: &[Regex], phrase: &str) -> Result<Option<FilterDescriptor>, InfoError> {
    for rule in rules {
        if let Some(caps) = rule.captures(phrase) {
            return FilterDescriptor::new(&caps["attr"], &caps["operator"], &caps["value"])
                .map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::filter::Operator;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn parse_logged(expression: &str) -> (FilterChain, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let chain = tracing::subscriber::with_default(subscriber, || parse_ok(expression));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (chain, output)
    }

    fn parse_ok(expression: &str) -> FilterChain {
        parse(expression).unwrap()
    }

    fn single(expression: &str) -> FilterDescriptor {
        let chain = parse_ok(expression);
        assert!(chain.rejected().is_empty(), "rejected: {:?}", chain.rejected());
        assert_eq!(chain.filters().len(), 1);
        chain.filters()[0].clone()
    }

    #[test]
    fn test_grammar_compiles() {
        assert_eq!(GRAMMAR.len(), RULES.len());
    }

    #[test]
    fn test_parse_id() {
        let filter = single("id=42");
        assert_eq!(filter.attr(), "id");
        assert_eq!(filter.operator(), Operator::Exact);
        assert_eq!(filter.value(), "42");
    }

    #[test]
    fn test_parse_bogus_phrase() {
        let chain = parse_ok("bogus!!");
        assert!(chain.is_empty());
        assert_eq!(chain.rejected(), ["bogus!!"]);
    }

    #[test]
    fn test_parse_bogus_phrase_warns_once() {
        let (chain, logs) = parse_logged("bogus!!");
        assert!(chain.is_empty());
        assert_eq!(logs.matches("WARN").count(), 1);
        assert!(logs.contains("invalid filter phrase 'bogus!!' will be ignored"));
    }

    #[test]
    fn test_valid_phrases_do_not_warn() {
        let (chain, logs) = parse_logged("id=42,name~sles");
        assert_eq!(chain.filters().len(), 2);
        assert!(logs.is_empty(), "unexpected warnings: {logs}");
    }

    #[test]
    fn test_parse_empty_expression() {
        let chain = parse_ok("");
        assert!(chain.is_empty());
        assert!(chain.rejected().is_empty());
    }

    #[test]
    fn test_parse_keeps_order_and_skips_invalid() {
        let chain = parse_ok("name~opensuse,size>3,publishedon>20200101");
        let phrases: Vec<String> = chain.filters().iter().map(|f| f.to_string()).collect();
        assert_eq!(phrases, ["name~opensuse", "publishedon>20200101"]);
        assert_eq!(chain.rejected(), ["size>3"]);
    }

    #[test]
    fn test_parse_date_operators() {
        for (expression, operator) in [
            ("deletedon<20200101", Operator::LessThan),
            ("deprecatedon=20200101", Operator::Exact),
            ("publishedon>20200101", Operator::GreaterThan),
        ] {
            assert_eq!(single(expression).operator(), operator);
        }
    }

    #[test]
    fn test_parse_date_requires_integer() {
        assert!(parse_ok("publishedon>yesterday").is_empty());
        assert!(parse_ok("publishedon~2020").is_empty());
    }

    #[test]
    fn test_parse_wrong_operator_for_attribute() {
        assert!(parse_ok("name=sles").is_empty());
        assert!(parse_ok("id~ami").is_empty());
        assert!(parse_ok("ip~10.0").is_empty());
    }

    #[test]
    fn test_parse_ip() {
        assert_eq!(single("ip=52.28.210.131").value(), "52.28.210.131");
        assert!(parse_ok("ip=52.28.210").is_empty());
        assert!(parse_ok("ip=52x28x210x131").is_empty());
    }

    #[test]
    fn test_parse_replacement_attributes() {
        assert_eq!(single("replacementid=ami-9").attr(), "replacementid");
        assert_eq!(single("replacementname~sp5").attr(), "replacementname");
    }

    #[test]
    fn test_parse_does_not_trim_whitespace() {
        let chain = parse_ok("id=1, name~sles");
        assert_eq!(chain.filters().len(), 1);
        assert_eq!(chain.rejected(), [" name~sles"]);
    }

    #[test]
    fn test_parse_value_keeps_inner_whitespace() {
        assert_eq!(single("name~sles 15").value(), "sles 15");
    }

    #[test]
    fn test_parse_empty_value_rejected() {
        assert!(parse_ok("id=").is_empty());
        assert_eq!(parse_ok("id=1,,name~x").rejected(), [""]);
    }

    #[test]
    fn test_unknown_operator_in_rule_is_an_error() {
        let rules = [Regex::new(r"^(?P<attr>id)(?P<operator>!)(?P<value>.+)$").unwrap()];
        let result = match_phrase(&rules, "id!42");
        assert!(matches!(result, Err(InfoError::UnknownOperator(op)) if op == "!"));
        assert!(matches!(match_phrase(&rules, "id=42"), Ok(None)));
    }
}
