use std::collections::HashMap;

use crate::color::Color;

/// A style-sheet value as the host sees it.
///
/// `Null` doubles as the protocol's absent value: anything the wire
/// cannot express on this side lands here.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    String {
        text: String,
        quoted: bool,
    },
    Number {
        value: f64,
        unit: Option<String>,
    },
    Color(Color),
    List {
        items: Vec<Value>,
        separator: Separator,
        bracketed: bool,
    },
    /// Entries keep their wire order; keys may repeat if the sender misbehaves.
    Map(Vec<(Value, Value)>),
    /// Opaque handle to a function living compiler-side.
    CompilerFunction {
        id: u32,
    },
    /// Handle to a function the host registered, travelling by id.
    HostFunction {
        id: u32,
        signature: String,
    },
    ArgumentList {
        id: u32,
        items: Vec<Value>,
        separator: Separator,
        keywords: HashMap<String, Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Comma,
    Space,
    Slash,
    /// Lists of fewer than two elements may leave the separator open.
    Undecided,
}

impl Value {
    /// A quoted string value.
    pub fn quoted(text: impl Into<String>) -> Self {
        Value::String {
            text: text.into(),
            quoted: true,
        }
    }

    /// An unquoted string value (an identifier, usually).
    pub fn unquoted(text: impl Into<String>) -> Self {
        Value::String {
            text: text.into(),
            quoted: false,
        }
    }

    /// A unitless number.
    pub fn number(value: f64) -> Self {
        Value::Number { value, unit: None }
    }

    /// A number carrying a unit such as `px` or `%`.
    pub fn number_with_unit(value: f64, unit: impl Into<String>) -> Self {
        Value::Number {
            value,
            unit: Some(unit.into()),
        }
    }

    /// A comma-separated, unbracketed list.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List {
            items,
            separator: Separator::Comma,
            bracketed: false,
        }
    }

    /// Variant name used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::String { .. } => "string",
            Value::Number { .. } => "number",
            Value::Color(_) => "color",
            Value::List { .. } => "list",
            Value::Map(_) => "map",
            Value::CompilerFunction { .. } => "compiler function",
            Value::HostFunction { .. } => "host function",
            Value::ArgumentList { .. } => "argument list",
        }
    }
}
