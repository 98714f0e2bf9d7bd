use sasswire_value::Value;

use crate::error::BoxError;
use crate::session::Session;

/// Declared shape of a host function, rendered into the compile request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name without the leading `$`.
    pub name: String,
    /// Default rendered verbatim after the name, making the parameter
    /// optional compiler-side.
    pub default: Option<String>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            default: None,
        });
        self
    }

    pub fn with_default_parameter(
        mut self,
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Render as the compile request expects: `name($a, $b: default)`.
    pub fn render(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|parameter| match &parameter.default {
                Some(default) => format!("${}: {}", parameter.name, default),
                None => format!("${}", parameter.name),
            })
            .collect();
        format!("{}({})", self.name, parameters.join(", "))
    }
}

/// A function the compiler can call back into while compiling.
///
/// The session reborrows the engine, so a function body may start nested
/// compilations on the same connection before it returns.
pub trait HostFunction: Send + Sync {
    fn invoke(
        &self,
        session: &mut Session<'_>,
        arguments: &[Value],
    ) -> std::result::Result<Value, BoxError>;
}

impl<F> HostFunction for F
where
    F: Fn(&mut Session<'_>, &[Value]) -> std::result::Result<Value, BoxError> + Send + Sync,
{
    fn invoke(
        &self,
        session: &mut Session<'_>,
        arguments: &[Value],
    ) -> std::result::Result<Value, BoxError> {
        self(session, arguments)
    }
}
