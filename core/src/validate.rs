//! Declarative validation of JSON request bodies.
//!
//! # Design
//! A [`Schema`] maps field names to [`FieldRule`]s. [`Schema::validate`] walks
//! every rule, collects a structured [`Violation`] per problem and never
//! stops at the first one. Rules with a default replace a missing or invalid
//! value in place instead of reporting it. The joined `Display` output of
//! [`Violations`] is what clients see in `{ "error": ... }`.

use std::fmt;

use serde_json::{Map, Value};

/// JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    /// A number without a fractional part that fits in `i64`.
    Integer,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => value.is_i64(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Constraints on a single field. Fields are required unless marked
/// [`optional`](FieldRule::optional); an optional field may be absent or
/// `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    kind: Option<FieldType>,
    required: bool,
    default: Option<Value>,
    allowed: Option<Vec<Value>>,
}

impl FieldRule {
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind: Some(kind),
            required: true,
            default: None,
            allowed: None,
        }
    }

    /// A required field of any type.
    pub fn any() -> Self {
        Self {
            kind: None,
            required: true,
            default: None,
            allowed: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn one_of<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Missing,
    Null,
    WrongType(FieldType),
    NotAllowed(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match &self.kind {
            ViolationKind::Missing => write!(f, "'{field}' is not specified"),
            ViolationKind::Null => write!(f, "'{field}' value is not valid"),
            ViolationKind::WrongType(kind) => {
                write!(f, "'{field}' value must be of type {kind}")
            }
            ViolationKind::NotAllowed(values) => {
                let values: Vec<String> = values.iter().map(plain).collect();
                write!(f, "'{field}' must have a value of '{}'", values.join(" or "))
            }
        }
    }
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, rule: FieldRule) -> Self {
        self.fields.push((name.to_string(), rule));
        self
    }

    /// Validate a request body, which must be a JSON object.
    pub fn validate_value(&self, body: &mut Value) -> Result<(), Violations> {
        match body.as_object_mut() {
            Some(object) => self.validate(object),
            None => Err(Violations(vec![Violation {
                field: "body".to_string(),
                kind: ViolationKind::WrongType(FieldType::Object),
            }])),
        }
    }

    pub fn validate(&self, object: &mut Map<String, Value>) -> Result<(), Violations> {
        let mut violations = Vec::new();
        for (name, rule) in &self.fields {
            let before = violations.len();
            let present = match object.get(name) {
                None if rule.required => {
                    violations.push(violation(name, ViolationKind::Missing));
                    false
                }
                Some(Value::Null) if rule.required => {
                    violations.push(violation(name, ViolationKind::Null));
                    false
                }
                None | Some(Value::Null) => false,
                Some(value) => {
                    if let Some(kind) = rule.kind {
                        if !kind.matches(value) {
                            violations.push(violation(name, ViolationKind::WrongType(kind)));
                        }
                    }
                    if let Some(allowed) = &rule.allowed {
                        if !allowed.contains(value) {
                            violations
                                .push(violation(name, ViolationKind::NotAllowed(allowed.clone())));
                        }
                    }
                    true
                }
            };
            if let Some(default) = &rule.default {
                if !present || violations.len() > before {
                    violations.truncate(before);
                    object.insert(name.clone(), default.clone());
                }
            }
        }
        Violations(violations).into_result()
    }
}

/// Check that every element of the array `field` has type `kind`.
pub fn validate_array(field: &str, values: &[Value], kind: FieldType) -> Result<(), Violations> {
    let violations = values
        .iter()
        .enumerate()
        .filter(|(_, value)| !kind.matches(value))
        .map(|(i, _)| violation(&format!("{field}[{i}]"), ViolationKind::WrongType(kind)))
        .collect();
    Violations(violations).into_result()
}

fn violation(field: &str, kind: ViolationKind) -> Violation {
    Violation {
        field: field.to_string(),
        kind,
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
