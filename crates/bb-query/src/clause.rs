//! A single clause and how it renders into a `{type: body}` document.

use std::mem;

use serde_json::Value;

use crate::{
    composer::Composer,
    document::{Document, has_bool_keys, single},
    error::BuildError,
};

/// What a clause's body is built from.
///
/// The variants are listed in precedence order: a value needs a field name to key it, a
/// structured body is used verbatim, a bare field becomes `{"field": name}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No payload: the body starts empty, e.g. `match_all`.
    #[default]
    Empty,
    /// A bare field reference, rendered as `{"field": name}` (e.g. `exists`).
    Field(String),
    /// A field keyed to a value, rendered as `{name: value}`.
    FieldValue(String, Value),
    /// A complete body, used as is.
    Body(Document),
}

/// One query or filter condition.
///
/// Clauses are plain data. A clause declared with a nested callback owns the child
/// [`Composer`] the callback produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Clause type, e.g. `term`, `nested` or `bool`. Never validated.
    kind: String,
    /// Base body source.
    payload: Payload,
    /// Extra keys merged over the base body.
    options: Document,
    /// Child composer for nested composition.
    nested: Option<Box<Composer>>,
}

impl Clause {
    /// Creates a clause of the given type with an empty body.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Payload::Empty,
            options: Document::new(),
            nested: None,
        }
    }

    /// Sets a bare field reference.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.payload = Payload::Field(name.into());
        self
    }

    /// Sets a field and its value. A `null` value counts as absent.
    pub fn field_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.payload = match value.into() {
            Value::Null => Payload::Field(name),
            value => Payload::FieldValue(name, value),
        };
        self
    }

    /// Uses `body` verbatim as the clause body.
    pub fn body(mut self, body: Document) -> Self {
        self.payload = Payload::Body(body);
        self
    }

    /// Adds one option key, overriding any body key of the same name.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Adds several option keys.
    pub fn with_options(mut self, options: Document) -> Self {
        self.options.extend(options);
        self
    }

    /// The clause type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The body source.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The option keys.
    pub fn options(&self) -> &Document {
        &self.options
    }

    /// The nested child composer, if the clause was declared with one.
    pub fn nested(&self) -> Option<&Composer> {
        self.nested.as_deref()
    }

    /// True when the clause carries a nested composer.
    pub fn is_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Attaches the child composer produced by a nested callback.
    pub(crate) fn set_nested(&mut self, composer: Composer) {
        self.nested = Some(Box::new(composer));
    }

    /// Builds `{kind: body}`.
    ///
    /// A nested composer is built recursively and merged last, so its keys win over
    /// payload and option keys of the same name.
    pub fn build(&self) -> Result<Document, BuildError> {
        let mut body = match &self.payload {
            Payload::Empty => Document::new(),
            Payload::Field(name) => single("field", Value::String(name.clone())),
            Payload::FieldValue(name, value) => single(name.clone(), value.clone()),
            Payload::Body(body) => body.clone(),
        };
        body.extend(self.options.clone());

        if let Some(nested) = &self.nested {
            body.extend(self.nested_body(nested.build()?));
        }

        Ok(single(self.kind.clone(), Value::Object(body)))
    }

    /// Shapes a nested composer's output for merging into this clause's body.
    ///
    /// Outside a `bool` clause the child result goes under `query`, wrapped in a `bool`
    /// when it is a bare bool body. A result carrying a `bool` key is unwrapped one level
    /// so its combination keys sit beside the clause's own fields.
    fn nested_body(&self, child: Document) -> Document {
        let mut child = if self.kind == "bool" {
            child
        } else if has_bool_keys(&child) {
            single("query", Value::Object(single("bool", Value::Object(child))))
        } else {
            single("query", Value::Object(child))
        };

        if let Some(Value::Object(inner)) = child.get_mut("bool") {
            return mem::take(inner);
        }
        child
    }
}

impl From<&str> for Clause {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for Clause {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

impl From<(&str, &str)> for Clause {
    fn from((kind, field): (&str, &str)) -> Self {
        Self::new(kind).field(field)
    }
}

impl<V: Into<Value>> From<(&str, &str, V)> for Clause {
    fn from((kind, field, value): (&str, &str, V)) -> Self {
        Self::new(kind).field_value(field, value)
    }
}

impl From<(&str, Document)> for Clause {
    fn from((kind, body): (&str, Document)) -> Self {
        Self::new(kind).body(body)
    }
}
