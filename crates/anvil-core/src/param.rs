//! Parameter values and ordered parameter sets.
//!
//! [`Params`] is the currency between the input collaborator, agent
//! schemas, and object builders. It preserves insertion order so that
//! diagnostics and defaults are reported deterministically.

use std::fmt;

use indexmap::IndexMap;

use crate::error::ParamError;

/// The kind of value an option holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// `true` / `false`.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float. Integers are accepted where a real is declared.
    Real,
    /// Free-form or enumerated string.
    Str,
    /// List of integers.
    IntList,
    /// List of reals.
    RealList,
    /// List of strings.
    StrList,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Real => "real",
            Self::Str => "string",
            Self::IntList => "integer list",
            Self::RealList => "real list",
            Self::StrList => "string list",
        };
        f.write_str(name)
    }
}

/// A single option value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Real number.
    Real(f64),
    /// String (also used for enumerated selections).
    Str(String),
    /// Integer list.
    IntList(Vec<i64>),
    /// Real list.
    RealList(Vec<f64>),
    /// String list (block names, variable names, ...).
    StrList(Vec<String>),
}

impl ParamValue {
    /// The kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Int(_) => ParamKind::Int,
            Self::Real(_) => ParamKind::Real,
            Self::Str(_) => ParamKind::Str,
            Self::IntList(_) => ParamKind::IntList,
            Self::RealList(_) => ParamKind::RealList,
            Self::StrList(_) => ParamKind::StrList,
        }
    }

    /// Whether this value can be read as `kind`.
    ///
    /// Exact kinds always match; an integer (list) also reads as a real
    /// (list), and a single string reads as a one-element string list.
    pub fn is_compatible_with(&self, kind: ParamKind) -> bool {
        let own = self.kind();
        own == kind
            || matches!(
                (own, kind),
                (ParamKind::Int, ParamKind::Real)
                    | (ParamKind::IntList, ParamKind::RealList)
                    | (ParamKind::Str, ParamKind::StrList)
            )
    }

    /// Number of entries for list values, `None` for scalars.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Self::IntList(v) => Some(v.len()),
            Self::RealList(v) => Some(v.len()),
            Self::StrList(v) => Some(v.len()),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "'")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{item}")?;
            }
            write!(f, "'")
        }
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::IntList(v) => list(f, v),
            Self::RealList(v) => list(f, v),
            Self::StrList(v) => list(f, v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        Self::RealList(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(v: Vec<&str>) -> Self {
        Self::StrList(v.into_iter().map(str::to_string).collect())
    }
}

/// Ordered option-name → value map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    values: IndexMap<String, ParamValue>,
}

impl Params {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or overwrite an option, returning the previous value.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    /// Remove an option, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.shift_remove(name)
    }

    /// Raw access to an option.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Whether the option is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, name: &str) -> Result<&ParamValue, ParamError> {
        self.values.get(name).ok_or_else(|| ParamError::Missing {
            name: name.to_string(),
        })
    }

    fn wrong_kind(name: &str, expected: ParamKind, found: &ParamValue) -> ParamError {
        ParamError::WrongKind {
            name: name.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// Read a boolean option.
    pub fn get_bool(&self, name: &str) -> Result<bool, ParamError> {
        match self.require(name)? {
            ParamValue::Bool(v) => Ok(*v),
            other => Err(Self::wrong_kind(name, ParamKind::Bool, other)),
        }
    }

    /// Read an integer option.
    pub fn get_int(&self, name: &str) -> Result<i64, ParamError> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(Self::wrong_kind(name, ParamKind::Int, other)),
        }
    }

    /// Read a real option. Integers are widened.
    pub fn get_real(&self, name: &str) -> Result<f64, ParamError> {
        match self.require(name)? {
            ParamValue::Real(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v as f64),
            other => Err(Self::wrong_kind(name, ParamKind::Real, other)),
        }
    }

    /// Read a string option.
    pub fn get_str(&self, name: &str) -> Result<&str, ParamError> {
        match self.require(name)? {
            ParamValue::Str(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ParamKind::Str, other)),
        }
    }

    /// Read an integer-list option.
    pub fn get_int_list(&self, name: &str) -> Result<&[i64], ParamError> {
        match self.require(name)? {
            ParamValue::IntList(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ParamKind::IntList, other)),
        }
    }

    /// Read a real-list option. Integer lists are widened.
    pub fn get_real_list(&self, name: &str) -> Result<Vec<f64>, ParamError> {
        match self.require(name)? {
            ParamValue::RealList(v) => Ok(v.clone()),
            ParamValue::IntList(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            other => Err(Self::wrong_kind(name, ParamKind::RealList, other)),
        }
    }

    /// Read a string-list option. A single string reads as a one-element list.
    pub fn get_str_list(&self, name: &str) -> Result<Vec<String>, ParamError> {
        match self.require(name)? {
            ParamValue::StrList(v) => Ok(v.clone()),
            ParamValue::Str(v) => Ok(vec![v.clone()]),
            other => Err(Self::wrong_kind(name, ParamKind::StrList, other)),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_read_matching_kinds() {
        let p = Params::new()
            .with("flag", true)
            .with("count", 3)
            .with("coef", 0.5)
            .with("variable", "u")
            .with("ids", vec![1i64, 2])
            .with("names", vec!["left", "right"]);

        assert!(p.get_bool("flag").unwrap());
        assert_eq!(p.get_int("count").unwrap(), 3);
        assert_eq!(p.get_real("coef").unwrap(), 0.5);
        assert_eq!(p.get_str("variable").unwrap(), "u");
        assert_eq!(p.get_int_list("ids").unwrap(), &[1, 2]);
        assert_eq!(p.get_str_list("names").unwrap(), vec!["left", "right"]);
    }

    #[test]
    fn integers_widen_to_reals() {
        let p = Params::new().with("coef", 2).with("pts", vec![1i64, 3]);
        assert_eq!(p.get_real("coef").unwrap(), 2.0);
        assert_eq!(p.get_real_list("pts").unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn single_string_reads_as_list() {
        let p = Params::new().with("block", "left");
        assert_eq!(p.get_str_list("block").unwrap(), vec!["left"]);
    }

    #[test]
    fn missing_option_is_named() {
        let p = Params::new();
        assert_eq!(
            p.get_real("coef"),
            Err(ParamError::Missing {
                name: "coef".into()
            })
        );
    }

    #[test]
    fn wrong_kind_reports_found_kind() {
        let p = Params::new().with("coef", "high");
        match p.get_real("coef") {
            Err(ParamError::WrongKind {
                name,
                expected,
                found,
            }) => {
                assert_eq!(name, "coef");
                assert_eq!(expected, ParamKind::Real);
                assert_eq!(found, ParamKind::Str);
            }
            other => panic!("expected WrongKind, got {other:?}"),
        }
    }

    #[test]
    fn insertion_order_preserved_across_remove() {
        let mut p: Params = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        p.remove("b");
        let names: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn compatibility_rules() {
        assert!(ParamValue::Int(1).is_compatible_with(ParamKind::Real));
        assert!(!ParamValue::Real(1.0).is_compatible_with(ParamKind::Int));
        assert!(ParamValue::from("x").is_compatible_with(ParamKind::StrList));
        assert!(ParamValue::IntList(vec![]).is_compatible_with(ParamKind::RealList));
    }

    #[test]
    fn display_lists_space_separated() {
        assert_eq!(ParamValue::from(vec!["a", "b"]).to_string(), "'a b'");
        assert_eq!(ParamValue::Real(0.25).to_string(), "0.25");
    }
}
