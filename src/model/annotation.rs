//! Vertex annotations for phylogenetic trees.
//!
//! Provides the [Annotations] map holding the key/value pairs parsed from
//! `[&...]` blocks, as written by BEAST, FigTree and treesub, e.g.
//! `[&rate=0.5,height_95%_HPD={1.2,3.4},country="Laos",!color=#ff0000]`.
//! Values are captured by [AnnotationValue].

use std::collections::BTreeMap;
use std::fmt;

// =#========================================================================#=
// ANNOTATIONS
// =#========================================================================#=
/// Annotations of a single vertex, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    entries: BTreeMap<String, AnnotationValue>,
}

impl Annotations {
    /// Creates an empty annotation map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.get(key)
    }

    /// Adds (or replaces) the value for `key`.
    pub fn insert(&mut self, key: String, value: AnnotationValue) {
        self.entries.insert(key, value);
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnnotationValue)> {
        self.entries.iter()
    }

    /// Iterates over the keys of bare entries without value, e.g. `7` in
    /// `[&7]` as left behind by [treesub normalisation](crate::nexus::treesub).
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| matches!(v, AnnotationValue::Flag))
            .map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =#========================================================================#=
// ANNOTATION VALUE
// =#========================================================================#=
/// A parsed annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// For integer values
    Int(i64),
    /// For floating point values
    Float(f64),
    /// For strings (quotes removed)
    Text(String),
    /// For `{a,b,...}` sets, e.g. HPD intervals or state sets
    List(Vec<AnnotationValue>),
    /// For a bare key without `=value`
    Flag,
}

impl AnnotationValue {
    /// Interprets an unquoted token as integer, float, or else text.
    pub fn from_token(token: &str) -> Self {
        if let Ok(v) = token.parse::<i64>() {
            AnnotationValue::Int(v)
        } else if let Ok(v) = token.parse::<f64>() {
            AnnotationValue::Float(v)
        } else {
            AnnotationValue::Text(token.to_string())
        }
    }

    /// Returns the value as `f64` if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnnotationValue::Int(v) => Some(*v as f64),
            AnnotationValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as string slice if textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnnotationValue::Int(v) => write!(f, "{v}"),
            AnnotationValue::Float(v) => write!(f, "{v}"),
            AnnotationValue::Text(s) => write!(f, "{}", quote_text(s)),
            AnnotationValue::List(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
            AnnotationValue::Flag => Ok(()),
        }
    }
}

/// Encloses `text` in double quotes, doubling any contained double quote.
///
/// # Example
/// ```
/// use phylokit::model::annotation::quote_text;
///
/// assert_eq!(quote_text("Laos"), "\"Laos\"");
/// assert_eq!(quote_text("5\" dish"), "\"5\"\" dish\"");
/// ```
pub fn quote_text(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

impl From<f64> for AnnotationValue {
    fn from(v: f64) -> Self {
        AnnotationValue::Float(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<String> for AnnotationValue {
    fn from(v: String) -> Self {
        AnnotationValue::Text(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(AnnotationValue::from_token("12"), AnnotationValue::Int(12));
        assert_eq!(AnnotationValue::from_token("0.25"), AnnotationValue::Float(0.25));
        assert_eq!(AnnotationValue::from_token("#ff0000"), AnnotationValue::Text("#ff0000".into()));
    }

    #[test]
    fn test_flags_and_display() {
        let mut annotations = Annotations::new();
        annotations.insert("7".to_string(), AnnotationValue::Flag);
        annotations.insert(
            "height_95%_HPD".to_string(),
            AnnotationValue::List(vec![1.5.into(), 2.25.into()]),
        );
        assert_eq!(annotations.flags().collect::<Vec<_>>(), vec!["7"]);
        assert_eq!(annotations.get("height_95%_HPD").unwrap().to_string(), "{1.5,2.25}");
        assert_eq!(annotations.len(), 2);
    }

    #[test]
    fn test_text_display_doubles_quotes() {
        let value = AnnotationValue::Text("say \"hi\"".into());
        assert_eq!(value.to_string(), "\"say \"\"hi\"\"\"");
    }
}
