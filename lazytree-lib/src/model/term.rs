//! RDF term types as they appear in SPARQL JSON result sets

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// An IRI identifying a resource.
///
/// Cheap to clone; tree nodes, selection nodes and forest indices all hold
/// copies of the same IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Creates an IRI without validating it.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Arc::from(value.as_ref()))
    }

    /// Parses an absolute IRI, rejecting relative references.
    ///
    /// # Example
    ///
    /// ```
    /// use lazytree_lib::model::Iri;
    ///
    /// assert!(Iri::parse("http://example.com/concept/1").is_ok());
    /// assert!(Iri::parse("concept/1").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        url::Url::parse(value)?;
        Ok(Self::new(value))
    }

    /// Returns the IRI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A literal value with optional language tag or datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form of the literal.
    pub value: String,
    /// Language tag (e.g., "en").
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Datatype IRI, if the literal is typed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Iri>,
}

impl Literal {
    /// Creates a plain literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a literal with a language tag.
    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Creates a typed literal.
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype),
        }
    }

    /// Returns the lexical form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Parses the lexical form as a number.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

/// A single RDF term bound to a result variable.
///
/// Deserializes from the SPARQL 1.1 JSON results term encoding:
///
/// ```json
/// { "type": "uri", "value": "http://example.com/a" }
/// { "type": "literal", "value": "Alpha", "xml:lang": "en" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Term {
    /// An IRI.
    Uri {
        /// The IRI.
        value: Iri,
    },
    /// A literal. `typed-literal` is accepted for older endpoints.
    #[serde(alias = "typed-literal")]
    Literal(Literal),
    /// A blank node.
    Bnode {
        /// Blank node label.
        value: String,
    },
}

impl Term {
    /// Creates an IRI term.
    pub fn iri(value: impl AsRef<str>) -> Self {
        Self::Uri {
            value: Iri::new(value),
        }
    }

    /// Creates a plain literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::new(value))
    }

    /// Returns the IRI if this term is one.
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Uri { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Returns the lexical value regardless of term kind.
    pub fn value(&self) -> &str {
        match self {
            Self::Uri { value } => value.as_str(),
            Self::Literal(literal) => literal.as_str(),
            Self::Bnode { value } => value,
        }
    }
}
