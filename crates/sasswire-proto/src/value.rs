use std::collections::HashMap;

/// A style-sheet value crossing the host/compiler boundary.
///
/// `kind: None` is the protocol's absent value. Decoders treat an
/// unrecognized variant the same way, so new compiler-side kinds degrade
/// to absence instead of failing the packet.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Value {
    #[prost(oneof = "ValueKind", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11")]
    pub kind: Option<ValueKind>,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self { kind: Some(kind) }
    }
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ValueKind {
    #[prost(message, tag = "1")]
    String(StringValue),
    #[prost(message, tag = "2")]
    Number(NumberValue),
    #[prost(message, tag = "3")]
    RgbColor(RgbColor),
    #[prost(message, tag = "4")]
    HslColor(HslColor),
    #[prost(message, tag = "5")]
    List(ListValue),
    #[prost(message, tag = "6")]
    Map(MapValue),
    #[prost(enumeration = "Singleton", tag = "7")]
    Singleton(i32),
    #[prost(message, tag = "8")]
    CompilerFunction(CompilerFunction),
    #[prost(message, tag = "9")]
    HostFunction(HostFunction),
    #[prost(message, tag = "10")]
    ArgumentList(ArgumentList),
    #[prost(message, tag = "11")]
    HwbColor(HwbColor),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringValue {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(bool, tag = "2")]
    pub quoted: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct NumberValue {
    #[prost(double, tag = "1")]
    pub value: f64,
    #[prost(string, optional, tag = "2")]
    pub unit: Option<String>,
}

/// Channels are 0-255; alpha is 0-1.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RgbColor {
    #[prost(uint32, tag = "1")]
    pub red: u32,
    #[prost(uint32, tag = "2")]
    pub green: u32,
    #[prost(uint32, tag = "3")]
    pub blue: u32,
    #[prost(double, tag = "4")]
    pub alpha: f64,
}

/// Hue is degrees; saturation and lightness are percentages 0-100.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HslColor {
    #[prost(double, tag = "1")]
    pub hue: f64,
    #[prost(double, tag = "2")]
    pub saturation: f64,
    #[prost(double, tag = "3")]
    pub lightness: f64,
    #[prost(double, tag = "4")]
    pub alpha: f64,
}

/// Hue is degrees; whiteness and blackness are percentages 0-100.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HwbColor {
    #[prost(double, tag = "1")]
    pub hue: f64,
    #[prost(double, tag = "2")]
    pub whiteness: f64,
    #[prost(double, tag = "3")]
    pub blackness: f64,
    #[prost(double, tag = "4")]
    pub alpha: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListValue {
    #[prost(enumeration = "ListSeparator", tag = "1")]
    pub separator: i32,
    #[prost(bool, tag = "2")]
    pub has_brackets: bool,
    #[prost(message, repeated, tag = "3")]
    pub contents: Vec<Value>,
}

/// Maps keep wire order; key uniqueness is the sender's problem.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MapValue {
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<MapEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MapEntry {
    #[prost(message, optional, tag = "1")]
    pub key: Option<Value>,
    #[prost(message, optional, tag = "2")]
    pub value: Option<Value>,
}

/// Opaque handle to a function living compiler-side.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CompilerFunction {
    #[prost(uint32, tag = "1")]
    pub id: u32,
}

/// Handle to a host-registered function, passed compiler-side by id.
#[derive(Clone, PartialEq, prost::Message)]
pub struct HostFunction {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(string, tag = "2")]
    pub signature: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ArgumentList {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(enumeration = "ListSeparator", tag = "2")]
    pub separator: i32,
    #[prost(message, repeated, tag = "3")]
    pub contents: Vec<Value>,
    #[prost(map = "string, message", tag = "4")]
    pub keywords: HashMap<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ListSeparator {
    Comma = 0,
    Space = 1,
    Slash = 2,
    /// Lists of fewer than two elements may leave the separator open.
    Undecided = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum Singleton {
    True = 0,
    False = 1,
    Null = 2,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn scalar_kinds_roundtrip() {
        let values = vec![
            Value::new(ValueKind::String(StringValue {
                text: "espresso".to_owned(),
                quoted: true,
            })),
            Value::new(ValueKind::Number(NumberValue {
                value: 12.5,
                unit: Some("px".to_owned()),
            })),
            Value::new(ValueKind::Singleton(Singleton::True as i32)),
            Value::new(ValueKind::Singleton(Singleton::Null as i32)),
        ];

        for value in values {
            let decoded = Value::decode(value.encode_to_vec().as_slice()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn colors_roundtrip() {
        let rgb = Value::new(ValueKind::RgbColor(RgbColor {
            red: 255,
            green: 128,
            blue: 0,
            alpha: 0.5,
        }));
        let hsl = Value::new(ValueKind::HslColor(HslColor {
            hue: 120.0,
            saturation: 100.0,
            lightness: 25.0,
            alpha: 1.0,
        }));
        let hwb = Value::new(ValueKind::HwbColor(HwbColor {
            hue: 210.0,
            whiteness: 30.0,
            blackness: 10.0,
            alpha: 1.0,
        }));

        for value in [rgb, hsl, hwb] {
            let decoded = Value::decode(value.encode_to_vec().as_slice()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn nested_list_and_map_roundtrip() {
        let inner = Value::new(ValueKind::List(ListValue {
            separator: ListSeparator::Space as i32,
            has_brackets: true,
            contents: vec![Value::new(ValueKind::Number(NumberValue {
                value: 1.0,
                unit: None,
            }))],
        }));

        let map = Value::new(ValueKind::Map(MapValue {
            entries: vec![MapEntry {
                key: Some(Value::new(ValueKind::String(StringValue {
                    text: "sizes".to_owned(),
                    quoted: false,
                }))),
                value: Some(inner),
            }],
        }));

        let decoded = Value::decode(map.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn argument_list_keywords_roundtrip() {
        let mut keywords = HashMap::new();
        keywords.insert(
            "weight".to_owned(),
            Value::new(ValueKind::Number(NumberValue {
                value: 700.0,
                unit: None,
            })),
        );

        let args = Value::new(ValueKind::ArgumentList(ArgumentList {
            id: 1,
            separator: ListSeparator::Comma as i32,
            contents: vec![Value::new(ValueKind::Singleton(Singleton::False as i32))],
            keywords,
        }));

        let decoded = Value::decode(args.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn absent_kind_encodes_to_nothing() {
        let value = Value { kind: None };
        let wire = value.encode_to_vec();
        assert!(wire.is_empty());
        assert_eq!(Value::decode(&[][..]).unwrap(), value);
    }

    #[test]
    fn unknown_kind_decodes_to_absent() {
        // A kind tag outside the catalogue, shaped like a message field.
        let mut wire = Vec::new();
        prost::encoding::encode_key(99, prost::encoding::WireType::LengthDelimited, &mut wire);
        prost::encoding::encode_varint(0, &mut wire);

        let decoded = Value::decode(wire.as_slice()).unwrap();
        assert_eq!(decoded.kind, None);
    }
}
