//! Host-side value model for the embedded compiler protocol.
//!
//! [`Value`] is the tagged union callbacks receive and return.
//! `Value::from_proto` / `Value::to_proto` bridge to the wire types, and
//! [`Value::extract`] pulls typed results out against a [`Shape`], with
//! `Null` mapping to `None` at the top level.

pub mod color;
pub mod convert;
pub mod error;
pub mod shape;
pub mod value;

pub use color::{Color, Hsl, Hwb, Rgb, Rgba};
pub use error::{ConversionError, Result};
pub use shape::{Extracted, Shape};
pub use value::{Separator, Value};
