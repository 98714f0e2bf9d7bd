use crate::color::Rgba;
use crate::error::{ConversionError, Result};
use crate::value::Value;

/// Target shape for pulling a typed result out of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Text,
    Int,
    Float,
    Color,
    Sequence(Box<Shape>),
    Mapping(Box<Shape>, Box<Shape>),
}

impl Shape {
    pub fn sequence(element: Shape) -> Shape {
        Shape::Sequence(Box::new(element))
    }

    pub fn mapping(key: Shape, value: Shape) -> Shape {
        Shape::Mapping(Box::new(key), Box::new(value))
    }

    /// Shape name used in conversion errors.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Bool => "bool",
            Shape::Text => "text",
            Shape::Int => "int",
            Shape::Float => "float",
            Shape::Color => "color",
            Shape::Sequence(_) => "sequence",
            Shape::Mapping(..) => "mapping",
        }
    }
}

/// A value extracted into one of the concrete target shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Bool(bool),
    Text(String),
    Int(i64),
    Float(f64),
    Color(Rgba),
    Sequence(Vec<Extracted>),
    Mapping(Vec<(Extracted, Extracted)>),
}

impl Value {
    /// Pull a typed result out of this value.
    ///
    /// `Ok(None)` is the absent value: a `Null` input fits every shape by
    /// carrying nothing. A present value that does not fit fails with the
    /// variant and shape names; the error is local to this value.
    pub fn extract(&self, shape: &Shape) -> Result<Option<Extracted>> {
        if matches!(self, Value::Null) {
            return Ok(None);
        }
        self.extract_present(shape).map(Some)
    }

    fn extract_present(&self, shape: &Shape) -> Result<Extracted> {
        match (self, shape) {
            (Value::Bool(flag), Shape::Bool) => Ok(Extracted::Bool(*flag)),
            (Value::Bool(flag), Shape::Text) => Ok(Extracted::Text(
                if *flag { "true" } else { "false" }.to_owned(),
            )),
            (Value::String { text, .. }, Shape::Text) => Ok(Extracted::Text(text.clone())),
            (Value::Number { value, .. }, Shape::Float) => Ok(Extracted::Float(*value)),
            (Value::Number { value, .. }, Shape::Int) if value.is_finite() => {
                // Truncates toward zero; the fractional part is dropped.
                Ok(Extracted::Int(*value as i64))
            }
            (Value::Number { value, .. }, Shape::Text) => Ok(Extracted::Text(value.to_string())),
            (Value::Color(color), Shape::Color) => Ok(Extracted::Color(color.to_rgba())),
            (Value::List { items, .. }, Shape::Sequence(element)) => {
                extract_elements(items, element).map(Extracted::Sequence)
            }
            (Value::ArgumentList { items, .. }, Shape::Sequence(element)) => {
                extract_elements(items, element).map(Extracted::Sequence)
            }
            // The empty list doubles as the empty map.
            (Value::List { items, .. }, Shape::Mapping(..)) if items.is_empty() => {
                Ok(Extracted::Mapping(Vec::new()))
            }
            (Value::Map(entries), Shape::Mapping(key_shape, value_shape)) => {
                let mut extracted = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    extracted.push((
                        key.extract_element(key_shape)?,
                        value.extract_element(value_shape)?,
                    ));
                }
                Ok(Extracted::Mapping(extracted))
            }
            _ => Err(self.mismatch(shape)),
        }
    }

    fn extract_element(&self, shape: &Shape) -> Result<Extracted> {
        match self.extract(shape)? {
            Some(extracted) => Ok(extracted),
            None => Err(ConversionError::new("null", shape.name())),
        }
    }

    fn mismatch(&self, shape: &Shape) -> ConversionError {
        ConversionError::new(self.kind_name(), shape.name())
    }
}

fn extract_elements(items: &[Value], shape: &Shape) -> Result<Vec<Extracted>> {
    items
        .iter()
        .map(|item| item.extract_element(shape))
        .collect()
}
