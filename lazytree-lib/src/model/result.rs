//! SPARQL select result sets

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::QueryError;

use super::Iri;
use super::Literal;
use super::Term;

/// One result row: variable name (without `?`) to bound term.
///
/// Unbound variables are simply absent.
pub type Binding = HashMap<String, Term>;

/// The result of a select query in the SPARQL 1.1 JSON results format.
///
/// # Example
///
/// ```
/// use lazytree_lib::model::SelectResult;
///
/// let result = SelectResult::from_json(r#"{
///     "head": { "vars": ["item"] },
///     "results": { "bindings": [
///         { "item": { "type": "uri", "value": "http://example.com/a" } }
///     ] }
/// }"#).unwrap();
///
/// assert_eq!(result.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectResult {
    /// Result header.
    #[serde(default)]
    pub head: Head,
    /// Result rows.
    pub results: Bindings,
}

/// Header of a select result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    /// Projected variable names.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Row container of a select result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    /// Result rows in endpoint order.
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl SelectResult {
    /// Parses a result set from its JSON encoding.
    pub fn from_json(body: &str) -> Result<Self, QueryError> {
        serde_json::from_str(body)
            .map_err(|e| QueryError::parse_with_body(e.to_string(), body))
    }

    /// Creates a result set from rows.
    pub fn from_bindings(bindings: Vec<Binding>) -> Self {
        let mut vars: Vec<String> = bindings.iter().flat_map(|b| b.keys().cloned()).collect();
        vars.sort();
        vars.dedup();
        Self {
            head: Head { vars },
            results: Bindings { bindings },
        }
    }

    /// Returns the rows.
    pub fn bindings(&self) -> &[Binding] {
        &self.results.bindings
    }

    /// Consumes the result and returns the rows.
    pub fn into_bindings(self) -> Vec<Binding> {
        self.results.bindings
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }
}

/// Typed accessors for the variables the tree core reads from a row.
pub trait BindingExt {
    /// Returns the IRI bound to `var`, if the binding is an IRI.
    fn iri(&self, var: &str) -> Option<&Iri>;

    /// Returns the literal bound to `var`, if the binding is a literal.
    fn literal(&self, var: &str) -> Option<&Literal>;
}

impl BindingExt for Binding {
    fn iri(&self, var: &str) -> Option<&Iri> {
        self.get(var).and_then(Term::as_iri)
    }

    fn literal(&self, var: &str) -> Option<&Literal> {
        self.get(var).and_then(Term::as_literal)
    }
}
