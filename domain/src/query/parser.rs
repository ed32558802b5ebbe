//! Boolean query parser implementation.

use serde::{Deserialize, Serialize};

/// A free-text query parsed into boolean term sets.
///
/// Invariant: a term appears in at most one of `must_terms`,
/// `should_terms`, `must_not_terms`. Quoted phrases are kept as single
/// atomic terms with their internal whitespace intact. All terms are
/// normalized to lowercase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// All of these must be present (AND).
    pub must_terms: Vec<String>,
    /// At least one of these must be present when non-empty (OR).
    pub should_terms: Vec<String>,
    /// None of these may be present (NOT).
    pub must_not_terms: Vec<String>,
}

/// A lexed token: either a bare word or a quoted phrase.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Phrase(String),
}

impl ParsedQuery {
    /// Parse a free-text query into boolean term sets.
    ///
    /// Operators `AND` / `OR` / `NOT` are case-insensitive. The default
    /// combinator between bare terms is `AND`. `NOT` applies to the single
    /// term or phrase immediately following it and resets after
    /// consumption. `OR` moves both the preceding and the following term
    /// into the should-set.
    ///
    /// If parsing yields no usable terms at all, the entire query is kept
    /// as a single must-phrase so callers always get something searchable.
    pub fn parse(query: &str) -> Self {
        let tokens = lex(query);
        let mut parsed = ParsedQuery::default();

        let mut pending_not = false;
        let mut pending_should = false;

        for token in tokens {
            match &token {
                Token::Word(w) => {
                    let upper = w.to_uppercase();
                    match upper.as_str() {
                        // Default combinator is already AND.
                        "AND" => continue,
                        "OR" => {
                            // The previous must-term joins the should-set,
                            // and so does whatever comes next.
                            if let Some(last) = parsed.must_terms.pop() {
                                push_unique(&mut parsed.should_terms, last);
                            }
                            pending_should = true;
                            continue;
                        }
                        "NOT" => {
                            pending_not = true;
                            continue;
                        }
                        _ => {}
                    }
                }
                Token::Phrase(_) => {}
            }

            let term = term_of(token);
            if term.is_empty() {
                continue;
            }

            if pending_not {
                parsed.insert_must_not(term);
                pending_not = false;
            } else if pending_should {
                parsed.insert_should(term);
                pending_should = false;
            } else {
                parsed.insert_must(term);
            }
        }

        // Degrade gracefully: an operator-only or unparsable query becomes
        // a single must-phrase instead of an empty (match-everything) query.
        if parsed.must_terms.is_empty() && parsed.should_terms.is_empty() {
            let fallback = query.trim().to_lowercase();
            if !fallback.is_empty() {
                parsed.must_terms.push(fallback);
                parsed.must_not_terms.clear();
            }
        }

        parsed
    }

    // A term lives in exactly one set; the most recent mention wins.
    fn insert_must(&mut self, term: String) {
        self.should_terms.retain(|t| t != &term);
        self.must_not_terms.retain(|t| t != &term);
        push_unique(&mut self.must_terms, term);
    }

    fn insert_should(&mut self, term: String) {
        self.must_terms.retain(|t| t != &term);
        self.must_not_terms.retain(|t| t != &term);
        push_unique(&mut self.should_terms, term);
    }

    fn insert_must_not(&mut self, term: String) {
        self.must_terms.retain(|t| t != &term);
        self.should_terms.retain(|t| t != &term);
        push_unique(&mut self.must_not_terms, term);
    }

    /// True when the raw query uses explicit boolean syntax (operators or
    /// quoted phrases). Natural-language questions without operators
    /// should not be AND-filtered word by word.
    pub fn has_boolean_syntax(query: &str) -> bool {
        if query.contains('"') {
            return true;
        }
        query
            .split_whitespace()
            .any(|w| matches!(w.to_uppercase().as_str(), "AND" | "OR" | "NOT"))
    }

    /// True when no term set carries any terms.
    pub fn is_empty(&self) -> bool {
        self.must_terms.is_empty()
            && self.should_terms.is_empty()
            && self.must_not_terms.is_empty()
    }

    /// Test a record, given the values of its searchable fields, against
    /// this query: every must-term present in at least one field, no
    /// must-not term present in any field, and (when the should-set is
    /// non-empty) at least one should-term present.
    pub fn matches_fields<'a>(&self, fields: impl IntoIterator<Item = &'a str> + Clone) -> bool {
        let contains = |term: &str| {
            fields
                .clone()
                .into_iter()
                .any(|f| f.to_lowercase().contains(term))
        };

        if !self.must_terms.iter().all(|t| contains(t)) {
            return false;
        }
        if self.must_not_terms.iter().any(|t| contains(t)) {
            return false;
        }
        if !self.should_terms.is_empty() && !self.should_terms.iter().any(|t| contains(t)) {
            return false;
        }
        true
    }

    /// Build a reusable filter predicate over a record's field values.
    pub fn to_predicate(&self) -> impl Fn(&[&str]) -> bool + '_ {
        move |fields: &[&str]| self.matches_fields(fields.iter().copied())
    }
}

fn term_of(token: Token) -> String {
    match token {
        Token::Word(w) => w.to_lowercase(),
        Token::Phrase(p) => p.trim().to_lowercase(),
    }
}

fn push_unique(set: &mut Vec<String>, term: String) {
    if !set.contains(&term) {
        set.push(term);
    }
}

/// Lex a query into words and quoted phrases.
///
/// Quoted substrings are extracted first and kept atomic; an unterminated
/// quote swallows the rest of the query as one phrase.
fn lex(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = query.chars().peekable();
    let mut word = String::new();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                let mut phrase = String::new();
                for pc in chars.by_ref() {
                    if pc == '"' {
                        break;
                    }
                    phrase.push(pc);
                }
                if !phrase.trim().is_empty() {
                    tokens.push(Token::Phrase(phrase));
                }
            }
            c if c.is_whitespace() => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
            }
            _ => word.push(c),
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }

    tokens
}
