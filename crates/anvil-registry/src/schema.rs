//! Parameter schemas.
//!
//! A [`ParamSchema`] declares the options an object type accepts: kind,
//! required-ness, default, doc string, and value constraints. Validation
//! produces a complete parameter set (defaults filled in, schema order) or
//! the first violation found.

use anvil_core::{ParamKind, ParamValue, Params};
use indexmap::IndexMap;

use crate::error::{SchemaViolation, Violation};

/// Name of the standard block-restriction option.
pub const BLOCK_OPTION: &str = "block";
/// Name of the standard boundary-restriction option.
pub const BOUNDARY_OPTION: &str = "boundary";

/// A value constraint attached to an option.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Every numeric entry must lie in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// Every string entry must be one of these choices.
    OneOf(Vec<String>),
    /// Lists (and strings) must not be empty.
    NonEmpty,
}

impl Constraint {
    fn check(&self, value: &ParamValue) -> Result<(), Violation> {
        match self {
            Self::Range { min, max } => {
                let numbers: Vec<f64> = match value {
                    ParamValue::Int(v) => vec![*v as f64],
                    ParamValue::Real(v) => vec![*v],
                    ParamValue::IntList(v) => v.iter().map(|&x| x as f64).collect(),
                    ParamValue::RealList(v) => v.clone(),
                    _ => Vec::new(),
                };
                for value in numbers {
                    let below = min.is_some_and(|lo| value < lo);
                    let above = max.is_some_and(|hi| value > hi);
                    if value.is_nan() || below || above {
                        return Err(Violation::OutOfRange {
                            value,
                            min: *min,
                            max: *max,
                        });
                    }
                }
                Ok(())
            }
            Self::OneOf(allowed) => {
                let strings: &[String] = match value {
                    ParamValue::Str(s) => std::slice::from_ref(s),
                    ParamValue::StrList(v) => v,
                    _ => &[],
                };
                match strings.iter().find(|s| !allowed.contains(s)) {
                    Some(bad) => Err(Violation::NotInSet {
                        value: bad.clone(),
                        allowed: allowed.clone(),
                    }),
                    None => Ok(()),
                }
            }
            Self::NonEmpty => {
                let empty = match value {
                    ParamValue::Str(s) => s.is_empty(),
                    other => other.list_len() == Some(0),
                };
                if empty {
                    Err(Violation::EmptyList)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Declaration of one option.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    /// Declared kind.
    pub kind: ParamKind,
    /// Whether the option must be supplied (and has no default).
    pub required: bool,
    /// Value used when the option is not supplied.
    pub default: Option<ParamValue>,
    /// Human-readable description.
    pub doc: String,
    /// Constraints checked after the kind check.
    pub constraints: Vec<Constraint>,
}

/// The set of options an object (or agent) type accepts.
///
/// Built with chained calls:
///
/// ```
/// use anvil_core::{ParamKind, Params};
/// use anvil_registry::ParamSchema;
///
/// let schema = ParamSchema::new()
///     .required("variable", ParamKind::Str, "Variable this kernel acts on")
///     .param("coef", 1.0, "Diffusion coefficient")
///     .range("coef", Some(0.0), None)
///     .block_restrictable();
///
/// let params = schema
///     .validate(&Params::new().with("variable", "u"))
///     .unwrap();
/// assert_eq!(params.get_real("coef").unwrap(), 1.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamSchema {
    description: String,
    specs: IndexMap<String, ParamSpec>,
    same_length: Vec<(String, String)>,
    open: bool,
}

impl ParamSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class description shown in diagnostics.
    #[must_use]
    pub fn with_description(mut self, doc: impl Into<String>) -> Self {
        self.description = doc.into();
        self
    }

    fn declare(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.specs.insert(name.into(), spec);
        self
    }

    /// Declare an option that must be supplied.
    #[must_use]
    pub fn required(self, name: impl Into<String>, kind: ParamKind, doc: impl Into<String>) -> Self {
        self.declare(
            name,
            ParamSpec {
                kind,
                required: true,
                default: None,
                doc: doc.into(),
                constraints: Vec::new(),
            },
        )
    }

    /// Declare an option that may be omitted and has no default.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, kind: ParamKind, doc: impl Into<String>) -> Self {
        self.declare(
            name,
            ParamSpec {
                kind,
                required: false,
                default: None,
                doc: doc.into(),
                constraints: Vec::new(),
            },
        )
    }

    /// Declare an option with a default; the kind is the default's kind.
    #[must_use]
    pub fn param(
        self,
        name: impl Into<String>,
        default: impl Into<ParamValue>,
        doc: impl Into<String>,
    ) -> Self {
        let default = default.into();
        self.declare(
            name,
            ParamSpec {
                kind: default.kind(),
                required: false,
                default: Some(default),
                doc: doc.into(),
                constraints: Vec::new(),
            },
        )
    }

    fn constrain(mut self, name: &str, constraint: Constraint) -> Self {
        match self.specs.get_mut(name) {
            Some(spec) => spec.constraints.push(constraint),
            None => panic!("constraint on undeclared option '{name}'"),
        }
        self
    }

    /// Require numeric entries of `name` to lie in `[min, max]`.
    ///
    /// # Panics
    ///
    /// If `name` has not been declared.
    #[must_use]
    pub fn range(self, name: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.constrain(name, Constraint::Range { min, max })
    }

    /// Restrict string entries of `name` to the given choices.
    ///
    /// # Panics
    ///
    /// If `name` has not been declared.
    #[must_use]
    pub fn one_of(self, name: &str, choices: &[&str]) -> Self {
        let choices = choices.iter().map(|c| c.to_string()).collect();
        self.constrain(name, Constraint::OneOf(choices))
    }

    /// Reject an empty value for `name`.
    ///
    /// # Panics
    ///
    /// If `name` has not been declared.
    #[must_use]
    pub fn non_empty(self, name: &str) -> Self {
        self.constrain(name, Constraint::NonEmpty)
    }

    /// Require `a` and `b` to have the same number of entries when both
    /// are present.
    #[must_use]
    pub fn same_length(mut self, a: &str, b: &str) -> Self {
        self.same_length.push((a.to_string(), b.to_string()));
        self
    }

    /// Pass undeclared options through validation unchecked, after the
    /// declared ones. Used by agents that forward options to an object type.
    #[must_use]
    pub fn accept_unknown(mut self) -> Self {
        self.open = true;
        self
    }

    /// Whether undeclared options are passed through.
    pub fn accepts_unknown(&self) -> bool {
        self.open
    }

    /// Add the optional `block` option used to restrict an object to
    /// mesh blocks.
    #[must_use]
    pub fn block_restrictable(self) -> Self {
        self.optional(
            BLOCK_OPTION,
            ParamKind::StrList,
            "Blocks (names or ids) this object is restricted to",
        )
        .non_empty(BLOCK_OPTION)
    }

    /// Add the required `boundary` option used by boundary objects.
    #[must_use]
    pub fn boundary_restrictable(self) -> Self {
        self.required(
            BOUNDARY_OPTION,
            ParamKind::StrList,
            "Boundaries (names or ids) this object applies to",
        )
        .non_empty(BOUNDARY_OPTION)
    }

    /// Append every declaration of `other` that this schema lacks.
    #[must_use]
    pub fn extend(mut self, other: ParamSchema) -> Self {
        for (name, spec) in other.specs {
            self.specs.entry(name).or_insert(spec);
        }
        self.same_length.extend(other.same_length);
        self.open |= other.open;
        if self.description.is_empty() {
            self.description = other.description;
        }
        self
    }

    /// Class description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declaration of one option.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.get(name)
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Declared options in declaration order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.specs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether no options are declared.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Validate `params`, returning the complete parameter set in
    /// declaration order with defaults filled in.
    ///
    /// Checks, in order: undeclared options (unless the schema
    /// [accepts unknown options](Self::accept_unknown)), then for each
    /// declared option presence, kind, and constraints, then same-length
    /// pairs. The first failure is returned.
    pub fn validate(&self, params: &Params) -> Result<Params, SchemaViolation> {
        let mut undeclared = params
            .iter()
            .filter(|(name, _)| !self.specs.contains_key(*name));
        if !self.open {
            if let Some((name, _)) = undeclared.next() {
                return Err(SchemaViolation {
                    option: name.to_string(),
                    violation: Violation::UnknownOption,
                });
            }
        }

        let mut out = Params::new();
        for (name, spec) in &self.specs {
            let value = match (params.get(name), &spec.default) {
                (Some(v), _) => v,
                (None, Some(d)) => d,
                (None, None) if spec.required => {
                    return Err(SchemaViolation {
                        option: name.clone(),
                        violation: Violation::MissingRequired,
                    });
                }
                (None, None) => continue,
            };
            if !value.is_compatible_with(spec.kind) {
                return Err(SchemaViolation {
                    option: name.clone(),
                    violation: Violation::WrongKind {
                        expected: spec.kind,
                        found: value.kind(),
                    },
                });
            }
            for constraint in &spec.constraints {
                constraint.check(value).map_err(|violation| SchemaViolation {
                    option: name.clone(),
                    violation,
                })?;
            }
            out.set(name.clone(), value.clone());
        }

        for (a, b) in &self.same_length {
            if let (Some(x), Some(y)) = (out.get(a), out.get(b)) {
                let len = x.list_len().unwrap_or(1);
                let other_len = y.list_len().unwrap_or(1);
                if len != other_len {
                    return Err(SchemaViolation {
                        option: a.clone(),
                        violation: Violation::LengthMismatch {
                            other: b.clone(),
                            len,
                            other_len,
                        },
                    });
                }
            }
        }
        for (name, value) in undeclared {
            out.set(name, value.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kernel_schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Test kernel")
            .required("variable", ParamKind::Str, "Variable")
            .param("coef", 1.0, "Coefficient")
            .range("coef", Some(0.0), Some(10.0))
            .param("scheme", "linear", "Interpolation")
            .one_of("scheme", &["linear", "quadratic"])
            .block_restrictable()
    }

    fn violation_of(schema: &ParamSchema, params: Params) -> (String, Violation) {
        match schema.validate(&params) {
            Err(SchemaViolation { option, violation }) => (option, violation),
            Ok(p) => panic!("expected a violation, got {p:?}"),
        }
    }

    #[test]
    fn defaults_filled_in_declaration_order() {
        let params = kernel_schema()
            .validate(&Params::new().with("variable", "u"))
            .unwrap();
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["variable", "coef", "scheme"]);
        assert_eq!(params.get_real("coef").unwrap(), 1.0);
        assert!(!params.contains(BLOCK_OPTION));
    }

    #[test]
    fn missing_required_names_the_option() {
        let (option, violation) = violation_of(&kernel_schema(), Params::new());
        assert_eq!(option, "variable");
        assert_eq!(violation, Violation::MissingRequired);
    }

    #[test]
    fn unknown_option_rejected_before_anything_else() {
        let (option, violation) = violation_of(&kernel_schema(), Params::new().with("coeff", 2.0));
        assert_eq!(option, "coeff");
        assert_eq!(violation, Violation::UnknownOption);
    }

    #[test]
    fn wrong_kind_reported() {
        let (option, violation) = violation_of(
            &kernel_schema(),
            Params::new().with("variable", "u").with("coef", "big"),
        );
        assert_eq!(option, "coef");
        assert_eq!(
            violation,
            Violation::WrongKind {
                expected: ParamKind::Real,
                found: ParamKind::Str
            }
        );
    }

    #[test]
    fn integer_accepted_for_real() {
        let params = kernel_schema()
            .validate(&Params::new().with("variable", "u").with("coef", 3))
            .unwrap();
        assert_eq!(params.get_real("coef").unwrap(), 3.0);
    }

    #[test]
    fn range_checked_inclusively() {
        let schema = kernel_schema();
        assert!(schema
            .validate(&Params::new().with("variable", "u").with("coef", 10.0))
            .is_ok());
        let (option, violation) =
            violation_of(&schema, Params::new().with("variable", "u").with("coef", -0.5));
        assert_eq!(option, "coef");
        assert!(matches!(violation, Violation::OutOfRange { value, .. } if value == -0.5));
    }

    #[test]
    fn enumerated_choice_checked() {
        let (option, violation) = violation_of(
            &kernel_schema(),
            Params::new().with("variable", "u").with("scheme", "cubic"),
        );
        assert_eq!(option, "scheme");
        match violation {
            Violation::NotInSet { value, allowed } => {
                assert_eq!(value, "cubic");
                assert_eq!(allowed, vec!["linear", "quadratic"]);
            }
            other => panic!("expected NotInSet, got {other:?}"),
        }
    }

    #[test]
    fn empty_block_list_rejected() {
        let (option, violation) = violation_of(
            &kernel_schema(),
            Params::new()
                .with("variable", "u")
                .with(BLOCK_OPTION, Vec::<String>::new()),
        );
        assert_eq!(option, BLOCK_OPTION);
        assert_eq!(violation, Violation::EmptyList);
    }

    #[test]
    fn single_block_name_accepted_as_list() {
        let params = kernel_schema()
            .validate(&Params::new().with("variable", "u").with(BLOCK_OPTION, "left"))
            .unwrap();
        assert_eq!(params.get_str_list(BLOCK_OPTION).unwrap(), vec!["left"]);
    }

    #[test]
    fn same_length_pairs_checked() {
        let schema = ParamSchema::new()
            .required("vars", ParamKind::StrList, "")
            .required("values", ParamKind::RealList, "")
            .same_length("vars", "values");
        assert!(schema
            .validate(
                &Params::new()
                    .with("vars", vec!["u", "v"])
                    .with("values", vec![1.0, 2.0])
            )
            .is_ok());
        let (option, violation) = violation_of(
            &schema,
            Params::new()
                .with("vars", vec!["u", "v"])
                .with("values", vec![1.0]),
        );
        assert_eq!(option, "vars");
        assert_eq!(
            violation,
            Violation::LengthMismatch {
                other: "values".into(),
                len: 2,
                other_len: 1
            }
        );
    }

    #[test]
    fn extend_keeps_own_declarations() {
        let base = ParamSchema::new().param("coef", 2.0, "base");
        let schema = ParamSchema::new().param("coef", 5.0, "own").extend(base);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get("coef").unwrap().default, Some(ParamValue::Real(5.0)));
    }

    #[test]
    fn open_schema_forwards_undeclared_options() {
        let schema = ParamSchema::new()
            .required("type", ParamKind::Str, "Object type")
            .accept_unknown();
        let params = schema
            .validate(&Params::new().with("coef", 2.0).with("type", "Diffusion"))
            .unwrap();
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["type", "coef"]);
    }

    #[test]
    #[should_panic(expected = "undeclared option 'missing'")]
    fn constraint_on_undeclared_option_panics() {
        let _ = ParamSchema::new().range("missing", None, None);
    }

    #[derive(Clone, Copy, Debug)]
    enum Decl {
        Required,
        Defaulted,
        Optional,
    }

    fn arb_decls() -> impl Strategy<Value = Vec<(Decl, Option<i64>)>> {
        let decl = prop_oneof![Just(Decl::Required), Just(Decl::Defaulted), Just(Decl::Optional)];
        prop::collection::vec((decl, prop::option::of(-50i64..50)), 0..8)
    }

    proptest! {
        #[test]
        fn validate_fills_defaults_and_names_first_missing(decls in arb_decls()) {
            let mut schema = ParamSchema::new();
            let mut params = Params::new();
            for (i, &(decl, supplied)) in decls.iter().enumerate() {
                let name = format!("o{i}");
                schema = match decl {
                    Decl::Required => schema.required(name.as_str(), ParamKind::Int, ""),
                    Decl::Defaulted => schema.param(name.as_str(), 100 + i as i64, ""),
                    Decl::Optional => schema.optional(name.as_str(), ParamKind::Int, ""),
                };
                if let Some(v) = supplied {
                    params.set(name, v);
                }
            }

            let first_missing = decls
                .iter()
                .position(|&(decl, supplied)| matches!(decl, Decl::Required) && supplied.is_none());
            match (schema.validate(&params), first_missing) {
                (Err(err), Some(i)) => {
                    prop_assert_eq!(err.option, format!("o{i}"));
                    prop_assert_eq!(err.violation, Violation::MissingRequired);
                }
                (Ok(out), None) => {
                    let mut expected = Vec::new();
                    for (i, &(decl, supplied)) in decls.iter().enumerate() {
                        let value = match (supplied, decl) {
                            (Some(v), _) => Some(v),
                            (None, Decl::Defaulted) => Some(100 + i as i64),
                            _ => None,
                        };
                        if let Some(v) = value {
                            expected.push((format!("o{i}"), v));
                        }
                    }
                    let actual: Vec<(String, i64)> = out
                        .iter()
                        .map(|(k, _)| (k.to_string(), out.get_int(k).unwrap()))
                        .collect();
                    prop_assert_eq!(actual, expected);
                }
                (result, missing) => {
                    prop_assert!(false, "result {:?} disagrees with first missing {:?}", result, missing);
                }
            }
        }

        #[test]
        fn range_accepts_exactly_the_closed_interval(
            lo in -100.0f64..100.0,
            width in 0.0f64..50.0,
            value in -200.0f64..200.0,
        ) {
            let hi = lo + width;
            let schema = ParamSchema::new()
                .param("x", lo, "")
                .range("x", Some(lo), Some(hi));
            let result = schema.validate(&Params::new().with("x", value));
            if (lo..=hi).contains(&value) {
                prop_assert!(result.is_ok());
            } else {
                let err = result.unwrap_err();
                prop_assert_eq!(err.option, "x");
                let out_of_range = matches!(err.violation, Violation::OutOfRange { .. });
                prop_assert!(out_of_range);
            }
        }
    }
}
