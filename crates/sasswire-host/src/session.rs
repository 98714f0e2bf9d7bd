use std::path::Path;

use crate::compiler::{CompileResult, Compiler};
use crate::error::Result;
use crate::options::CompileOptions;

/// Capability handle a host function holds while the engine is
/// mid-exchange.
///
/// A session reborrows the engine's exclusive write token, so the
/// callback's call stack may run nested compilations on the same
/// connection while the outer exchange stays pending. Independent
/// callers remain excluded at compile time; there is no lock to take.
pub struct Session<'a> {
    pub(crate) engine: &'a mut Compiler,
}

impl Session<'_> {
    /// Compile a string source on the connection that invoked us.
    pub fn compile_string(
        &mut self,
        source: &str,
        options: &CompileOptions,
    ) -> Result<CompileResult> {
        self.engine.compile_string(source, options)
    }

    /// Compile a file on the connection that invoked us.
    pub fn compile_file(
        &mut self,
        path: impl AsRef<Path>,
        options: &CompileOptions,
    ) -> Result<CompileResult> {
        self.engine.compile_file(path, options)
    }
}
