//! Compile a stylesheet with a host function and an in-memory importer.
//!
//! Point SASSWIRE_COMPILER at any compiler speaking this protocol:
//!   SASSWIRE_COMPILER=/path/to/compiler cargo run --example compile

use std::process::Command;

use sasswire::host::{
    BoxError, CompileOptions, Compiler, FunctionSignature, Importer, ImporterContents,
    ImporterSelection, Session, Value,
};

struct Palette;

impl Importer for Palette {
    fn canonicalize(
        &self,
        url: &str,
        _from_import: bool,
    ) -> Result<Option<String>, BoxError> {
        if url == "palette" || url == "demo:palette" {
            Ok(Some("demo:palette".to_owned()))
        } else {
            Ok(None)
        }
    }

    fn load(&self, canonical_url: &str) -> Result<Option<ImporterContents>, BoxError> {
        assert_eq!(canonical_url, "demo:palette");
        Ok(Some(ImporterContents::scss("$accent: #7c3aed;")))
    }
}

fn double(_session: &mut Session<'_>, arguments: &[Value]) -> Result<Value, BoxError> {
    match arguments {
        [Value::Number { value, unit }] => Ok(Value::Number {
            value: value * 2.0,
            unit: unit.clone(),
        }),
        _ => Err("double() wants exactly one number".into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let binary = std::env::var("SASSWIRE_COMPILER")
        .map_err(|_| "set SASSWIRE_COMPILER to a compiler speaking the embedded protocol")?;
    let mut compiler = Compiler::spawn(Command::new(binary).arg("--embedded"))?;

    let version = compiler.version()?;
    eprintln!(
        "Connected to {} {} (protocol {})",
        version.implementation_name, version.implementation_version, version.protocol_version
    );

    compiler.register_function(FunctionSignature::new("double").with_parameter("n"), double);
    let palette = compiler.register_importer(Palette);

    let source = r#"
        @use "palette";

        .banner {
            width: double(21px);
            background: palette.$accent;
        }
    "#;
    let options = CompileOptions::default()
        .with_url("demo:banner")
        .with_importer(ImporterSelection::Importer(palette));

    let result = compiler.compile_string(source, &options)?;
    eprintln!("Loaded: {}", result.loaded_urls.join(", "));
    print!("{}", result.css);

    compiler.close()?;
    Ok(())
}
