use sasswire_proto as proto;

use crate::color::{Color, Hsl, Hwb, Rgb};
use crate::value::{Separator, Value};

impl Value {
    /// Encode this value for the wire. Total: every host value has a
    /// protocol rendition.
    pub fn to_proto(&self) -> proto::Value {
        let kind = match self {
            Value::Null => proto::ValueKind::Singleton(proto::Singleton::Null as i32),
            Value::Bool(true) => proto::ValueKind::Singleton(proto::Singleton::True as i32),
            Value::Bool(false) => proto::ValueKind::Singleton(proto::Singleton::False as i32),
            Value::String { text, quoted } => proto::ValueKind::String(proto::StringValue {
                text: text.clone(),
                quoted: *quoted,
            }),
            Value::Number { value, unit } => proto::ValueKind::Number(proto::NumberValue {
                value: *value,
                unit: unit.clone(),
            }),
            Value::Color(Color::Rgb(rgb)) => proto::ValueKind::RgbColor(proto::RgbColor {
                red: u32::from(rgb.red),
                green: u32::from(rgb.green),
                blue: u32::from(rgb.blue),
                alpha: rgb.alpha,
            }),
            Value::Color(Color::Hsl(hsl)) => proto::ValueKind::HslColor(proto::HslColor {
                hue: hsl.hue,
                saturation: hsl.saturation,
                lightness: hsl.lightness,
                alpha: hsl.alpha,
            }),
            Value::Color(Color::Hwb(hwb)) => proto::ValueKind::HwbColor(proto::HwbColor {
                hue: hwb.hue,
                whiteness: hwb.whiteness,
                blackness: hwb.blackness,
                alpha: hwb.alpha,
            }),
            Value::List {
                items,
                separator,
                bracketed,
            } => proto::ValueKind::List(proto::ListValue {
                separator: separator_to_proto(*separator) as i32,
                has_brackets: *bracketed,
                contents: items.iter().map(Value::to_proto).collect(),
            }),
            Value::Map(entries) => proto::ValueKind::Map(proto::MapValue {
                entries: entries
                    .iter()
                    .map(|(key, value)| proto::MapEntry {
                        key: Some(key.to_proto()),
                        value: Some(value.to_proto()),
                    })
                    .collect(),
            }),
            Value::CompilerFunction { id } => {
                proto::ValueKind::CompilerFunction(proto::CompilerFunction { id: *id })
            }
            Value::HostFunction { id, signature } => {
                proto::ValueKind::HostFunction(proto::HostFunction {
                    id: *id,
                    signature: signature.clone(),
                })
            }
            Value::ArgumentList {
                id,
                items,
                separator,
                keywords,
            } => proto::ValueKind::ArgumentList(proto::ArgumentList {
                id: *id,
                separator: separator_to_proto(*separator) as i32,
                contents: items.iter().map(Value::to_proto).collect(),
                keywords: keywords
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_proto()))
                    .collect(),
            }),
        };
        proto::Value::new(kind)
    }

    /// Decode a wire value. Total: absent and unrecognized kinds become
    /// `Value::Null` rather than errors, so newer compilers stay usable.
    pub fn from_proto(value: proto::Value) -> Value {
        let Some(kind) = value.kind else {
            return Value::Null;
        };
        match kind {
            proto::ValueKind::String(string) => Value::String {
                text: string.text,
                quoted: string.quoted,
            },
            proto::ValueKind::Number(number) => Value::Number {
                value: number.value,
                unit: number.unit,
            },
            proto::ValueKind::RgbColor(color) => Value::Color(Color::Rgb(Rgb {
                red: clamp_channel(color.red),
                green: clamp_channel(color.green),
                blue: clamp_channel(color.blue),
                alpha: color.alpha,
            })),
            proto::ValueKind::HslColor(color) => Value::Color(Color::Hsl(Hsl {
                hue: color.hue,
                saturation: color.saturation,
                lightness: color.lightness,
                alpha: color.alpha,
            })),
            proto::ValueKind::HwbColor(color) => Value::Color(Color::Hwb(Hwb {
                hue: color.hue,
                whiteness: color.whiteness,
                blackness: color.blackness,
                alpha: color.alpha,
            })),
            proto::ValueKind::List(list) => Value::List {
                separator: separator_from_proto(list.separator),
                bracketed: list.has_brackets,
                items: list.contents.into_iter().map(Value::from_proto).collect(),
            },
            proto::ValueKind::Map(map) => Value::Map(
                map.entries
                    .into_iter()
                    .map(|entry| (absent_to_null(entry.key), absent_to_null(entry.value)))
                    .collect(),
            ),
            proto::ValueKind::Singleton(raw) => match proto::Singleton::try_from(raw) {
                Ok(proto::Singleton::True) => Value::Bool(true),
                Ok(proto::Singleton::False) => Value::Bool(false),
                Ok(proto::Singleton::Null) | Err(_) => Value::Null,
            },
            proto::ValueKind::CompilerFunction(function) => {
                Value::CompilerFunction { id: function.id }
            }
            proto::ValueKind::HostFunction(function) => Value::HostFunction {
                id: function.id,
                signature: function.signature,
            },
            proto::ValueKind::ArgumentList(args) => Value::ArgumentList {
                id: args.id,
                separator: separator_from_proto(args.separator),
                items: args.contents.into_iter().map(Value::from_proto).collect(),
                keywords: args
                    .keywords
                    .into_iter()
                    .map(|(name, value)| (name, Value::from_proto(value)))
                    .collect(),
            },
        }
    }
}

fn absent_to_null(value: Option<proto::Value>) -> Value {
    value.map(Value::from_proto).unwrap_or(Value::Null)
}

fn clamp_channel(channel: u32) -> u8 {
    channel.min(255) as u8
}

fn separator_to_proto(separator: Separator) -> proto::ListSeparator {
    match separator {
        Separator::Comma => proto::ListSeparator::Comma,
        Separator::Space => proto::ListSeparator::Space,
        Separator::Slash => proto::ListSeparator::Slash,
        Separator::Undecided => proto::ListSeparator::Undecided,
    }
}

fn separator_from_proto(raw: i32) -> Separator {
    match proto::ListSeparator::try_from(raw) {
        Ok(proto::ListSeparator::Comma) => Separator::Comma,
        Ok(proto::ListSeparator::Space) => Separator::Space,
        Ok(proto::ListSeparator::Slash) => Separator::Slash,
        Ok(proto::ListSeparator::Undecided) | Err(_) => Separator::Undecided,
    }
}
