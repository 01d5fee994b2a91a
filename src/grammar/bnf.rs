//! Plain-text BNF front end.
//!
//! One rule per line: `<name> ::= sym sym | sym ...`. Symbols are
//! whitespace-separated. `<angle>` tokens and bare tokens matching a declared
//! rule name are rule references; quoted tokens and everything else are
//! literals. Blank lines and `#` comments are ignored.

use std::collections::HashSet;

use crate::error::{GramevoError, Result};
use crate::grammar::{Grammar, RawSymbol};

pub fn parse(text: &str) -> Result<Grammar> {
    let mut lines = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (lhs, rhs) = line.split_once("::=").ok_or_else(|| {
            GramevoError::Grammar(format!("line {}: missing '::='", lineno + 1))
        })?;
        let lhs = lhs.trim();
        let name = strip_angle(lhs).unwrap_or(lhs);
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(GramevoError::Grammar(format!(
                "line {}: bad rule name '{}'",
                lineno + 1,
                lhs
            )));
        }
        lines.push((name.to_string(), rhs.to_string()));
    }

    let declared: HashSet<&str> = lines.iter().map(|(n, _)| n.as_str()).collect();

    let mut defs = Vec::with_capacity(lines.len());
    for (name, rhs) in &lines {
        let mut alternatives = Vec::new();
        for alt in rhs.split('|') {
            let symbols: Vec<RawSymbol> = alt
                .split_whitespace()
                .map(|token| classify(token, &declared))
                .collect();
            alternatives.push(symbols);
        }
        defs.push((name.clone(), alternatives));
    }

    Grammar::from_rules(defs)
}

fn classify(token: &str, declared: &HashSet<&str>) -> RawSymbol {
    if let Some(quoted) = strip_quotes(token) {
        return RawSymbol::Literal(quoted.to_string());
    }
    if let Some(name) = strip_angle(token) {
        return RawSymbol::Rule(name.to_string());
    }
    if declared.contains(token) {
        return RawSymbol::Rule(token.to_string());
    }
    RawSymbol::Literal(token.to_string())
}

fn strip_angle(token: &str) -> Option<&str> {
    token
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .filter(|t| !t.is_empty())
}

fn strip_quotes(token: &str) -> Option<&str> {
    let inner = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| token.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')));
    inner.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Symbol;

    #[test]
    fn parses_rule_references_and_literals() {
        let g = parse(
            "# expression grammar\n\
             <expr> ::= <expr> + <term> | <term>\n\
             <term> ::= \"x\" | \"1\"",
        )
        .unwrap();
        assert_eq!(g.rules().len(), 2);
        let expr = g.start_rule();
        assert_eq!(expr.name(), "expr");
        let first = expr.productions()[0].symbols();
        assert_eq!(first.len(), 3);
        assert!(matches!(first[0], Symbol::Rule(_)));
        assert_eq!(first[1], Symbol::Literal("+".to_string()));
        assert!(matches!(first[2], Symbol::Rule(_)));
    }

    #[test]
    fn bare_token_matching_a_rule_name_is_a_reference() {
        let g = parse(
            "S ::= a S | \"b\"\n\
             a ::= \"a\"",
        )
        .unwrap();
        let s = g.start_rule();
        assert!(matches!(s.productions()[0].symbols()[0], Symbol::Rule(_)));
        assert!(matches!(s.productions()[0].symbols()[1], Symbol::Rule(0)));
    }

    #[test]
    fn missing_separator_is_an_error() {
        assert!(parse("<S> = \"a\"").is_err());
    }
}
