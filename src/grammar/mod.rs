pub mod bnf;

use std::collections::{HashMap, HashSet};

use crate::error::{GramevoError, Result};

pub type RuleId = usize;

/// One pre-parsed grammar symbol, before rule-name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSymbol {
    Rule(String),
    Literal(String),
}

/// A symbol inside a production: either a reference to another rule or an
/// atomic literal that becomes leaf text in the derivation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Rule(RuleId),
    Literal(String),
}

/// One expansion alternative for a rule.
///
/// `min_depth` and `recursive` are computed once at grammar construction:
/// `min_depth` is 1 + the largest `min_depth` of any referenced rule (1 for a
/// literal-only production), and a production is `recursive` when expanding it
/// can eventually reintroduce its own rule.
#[derive(Debug, Clone)]
pub struct Production {
    symbols: Vec<Symbol>,
    min_depth: usize,
    recursive: bool,
}

impl Production {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }
}

/// A named nonterminal and its ordered expansion alternatives.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    productions: Vec<Production>,
    min_depth: usize,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Smallest tree depth at which this rule can fully terminate.
    pub fn min_depth(&self) -> usize {
        self.min_depth
    }
}

/// Immutable grammar model.
///
/// Built once per configuration, then shared read-only by every constructor
/// and mapper. Construction rejects grammars that cannot bottom out (every
/// production of some rule recursive with no terminating alternative), so the
/// builders never have to handle a non-terminating rule at runtime.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    start: RuleId,
    by_name: HashMap<String, RuleId>,
}

impl Grammar {
    /// Build a grammar from pre-parsed rule definitions. The first rule is
    /// the start rule. Productions reference rules by name; an unresolved
    /// name is a grammar error.
    pub fn from_rules(defs: Vec<(String, Vec<Vec<RawSymbol>>)>) -> Result<Grammar> {
        if defs.is_empty() {
            return Err(GramevoError::Grammar("grammar has no rules".to_string()));
        }

        let mut by_name = HashMap::new();
        for (idx, (name, _)) in defs.iter().enumerate() {
            if by_name.insert(name.clone(), idx).is_some() {
                return Err(GramevoError::Grammar(format!(
                    "rule <{}> defined more than once",
                    name
                )));
            }
        }

        let mut rules = Vec::with_capacity(defs.len());
        for (name, alternatives) in &defs {
            if alternatives.is_empty() {
                return Err(GramevoError::Grammar(format!(
                    "rule <{}> has no productions",
                    name
                )));
            }
            let mut productions = Vec::with_capacity(alternatives.len());
            for alt in alternatives {
                if alt.is_empty() {
                    return Err(GramevoError::Grammar(format!(
                        "rule <{}> has an empty production",
                        name
                    )));
                }
                let symbols = alt
                    .iter()
                    .map(|raw| match raw {
                        RawSymbol::Rule(n) => by_name
                            .get(n)
                            .map(|&id| Symbol::Rule(id))
                            .ok_or_else(|| {
                                GramevoError::Grammar(format!("unknown rule <{}>", n))
                            }),
                        RawSymbol::Literal(text) => Ok(Symbol::Literal(text.clone())),
                    })
                    .collect::<Result<Vec<_>>>()?;
                productions.push(Production {
                    symbols,
                    min_depth: 0,
                    recursive: false,
                });
            }
            rules.push(Rule {
                name: name.clone(),
                productions,
                min_depth: 0,
            });
        }

        let mut grammar = Grammar {
            rules,
            start: 0,
            by_name,
        };
        grammar.compute_min_depths()?;
        grammar.compute_recursion();
        Ok(grammar)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.by_name.get(name).copied()
    }

    pub fn start(&self) -> RuleId {
        self.start
    }

    pub fn start_rule(&self) -> &Rule {
        &self.rules[self.start]
    }

    /// Smallest depth at which the start rule can terminate; the global
    /// lower bound for every depth budget handed to a constructor.
    pub fn min_depth(&self) -> usize {
        self.rules[self.start].min_depth
    }

    /// Fixpoint iteration over rule minimum depths. A rule that never
    /// reaches a finite depth cannot bottom out, which is a configuration
    /// error detected here, before any construction begins.
    fn compute_min_depths(&mut self) -> Result<()> {
        let n = self.rules.len();
        let mut rule_depth: Vec<Option<usize>> = vec![None; n];

        loop {
            let mut changed = false;
            for id in 0..n {
                let mut best: Option<usize> = None;
                for prod in &self.rules[id].productions {
                    if let Some(d) = production_depth(&prod.symbols, &rule_depth) {
                        best = Some(best.map_or(d, |b: usize| b.min(d)));
                    }
                }
                if best.is_some() && best != rule_depth[id] {
                    rule_depth[id] = best;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        for (id, depth) in rule_depth.iter().enumerate() {
            match depth {
                Some(d) => self.rules[id].min_depth = *d,
                None => {
                    return Err(GramevoError::Configuration(format!(
                        "rule <{}> can never terminate: every production is recursive",
                        self.rules[id].name
                    )))
                }
            }
        }

        for id in 0..n {
            for p in 0..self.rules[id].productions.len() {
                let d = production_depth(&self.rules[id].productions[p].symbols, &rule_depth)
                    .expect("all rules have finite min depth");
                self.rules[id].productions[p].min_depth = d;
            }
        }
        Ok(())
    }

    /// Reachability closure: `reach[r]` is every rule that some expansion
    /// chain starting at `r` can mention. A production of rule R is
    /// recursive when one of its referenced rules is R or can reach R.
    fn compute_recursion(&mut self) {
        let n = self.rules.len();
        let mut reach: Vec<HashSet<RuleId>> = vec![HashSet::new(); n];

        for id in 0..n {
            for prod in &self.rules[id].productions {
                for sym in &prod.symbols {
                    if let Symbol::Rule(r) = sym {
                        reach[id].insert(*r);
                    }
                }
            }
        }

        loop {
            let mut changed = false;
            for id in 0..n {
                let current: Vec<RuleId> = reach[id].iter().copied().collect();
                for r in current {
                    let extra: Vec<RuleId> = reach[r].iter().copied().collect();
                    for e in extra {
                        if reach[id].insert(e) {
                            changed = true;
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        for id in 0..n {
            for p in 0..self.rules[id].productions.len() {
                let recursive = self.rules[id].productions[p]
                    .symbols
                    .iter()
                    .any(|sym| match sym {
                        Symbol::Rule(r) => *r == id || reach[*r].contains(&id),
                        Symbol::Literal(_) => false,
                    });
                self.rules[id].productions[p].recursive = recursive;
            }
        }
    }
}

fn production_depth(symbols: &[Symbol], rule_depth: &[Option<usize>]) -> Option<usize> {
    let mut deepest = 0;
    for sym in symbols {
        if let Symbol::Rule(r) = sym {
            deepest = deepest.max(rule_depth[*r]?);
        }
    }
    Some(1 + deepest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::bnf::parse;

    #[test]
    fn min_depth_of_right_recursive_rule() {
        let g = parse("<S> ::= \"a\" <S> | \"b\"").unwrap();
        assert_eq!(g.min_depth(), 1);
        let s = g.start_rule();
        assert_eq!(s.productions()[0].min_depth(), 2);
        assert_eq!(s.productions()[1].min_depth(), 1);
    }

    #[test]
    fn recursion_flags_cover_indirect_cycles() {
        let g = parse(
            "<A> ::= <B> | \"x\"\n\
             <B> ::= <A> \"y\" | \"z\"",
        )
        .unwrap();
        let a = g.rule(g.rule_id("A").unwrap());
        assert!(a.productions()[0].is_recursive());
        assert!(!a.productions()[1].is_recursive());
        let b = g.rule(g.rule_id("B").unwrap());
        assert!(b.productions()[0].is_recursive());
        assert!(!b.productions()[1].is_recursive());
    }

    #[test]
    fn min_depth_propagates_through_chained_rules() {
        let g = parse(
            "<S> ::= <A> <B>\n\
             <A> ::= \"a\"\n\
             <B> ::= <A> <A>",
        )
        .unwrap();
        assert_eq!(g.min_depth(), 3);
        assert_eq!(g.rule(g.rule_id("B").unwrap()).min_depth(), 2);
    }

    #[test]
    fn non_terminating_grammar_is_rejected() {
        let err = parse("<S> ::= \"a\" <S>").unwrap_err();
        assert!(matches!(err, GramevoError::Configuration(_)));
    }

    #[test]
    fn unknown_rule_reference_is_rejected() {
        let defs = vec![(
            "S".to_string(),
            vec![vec![RawSymbol::Rule("missing".to_string())]],
        )];
        assert!(Grammar::from_rules(defs).is_err());
    }
}
