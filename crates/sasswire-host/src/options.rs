use std::path::PathBuf;

/// Syntax of a style-sheet source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    #[default]
    Scss,
    Indented,
    Css,
}

/// Output formatting the compiler should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Expanded,
    Compressed,
}

/// Per-compilation settings.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub style: Style,
    /// Syntax of string inputs. File inputs infer from the extension.
    pub syntax: Syntax,
    /// URL a string input pretends to live at, for error spans and
    /// relative loads.
    pub url: Option<String>,
    pub source_map: bool,
    pub verbose: bool,
    /// Whether the output may start with `@charset`/BOM for non-ASCII CSS.
    pub charset: bool,
    /// Importers consulted for loads, in order.
    pub importers: Vec<ImporterSelection>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            style: Style::Expanded,
            syntax: Syntax::Scss,
            url: None,
            source_map: false,
            verbose: false,
            charset: true,
            importers: Vec::new(),
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_charset(mut self, charset: bool) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_importer(mut self, selection: ImporterSelection) -> Self {
        self.importers.push(selection);
        self
    }
}

/// One entry in the compile request's importer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImporterSelection {
    /// Filesystem directory the compiler searches itself.
    LoadPath(PathBuf),
    /// Registered [`Importer`](crate::importers::Importer), by id.
    Importer(u32),
    /// Registered [`FileImporter`](crate::importers::FileImporter), by id.
    FileImporter(u32),
}
