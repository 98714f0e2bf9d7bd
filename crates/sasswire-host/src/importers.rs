use crate::error::BoxError;
use crate::options::Syntax;

/// A host importer resolving and loading style-sheet URLs.
///
/// Resolution runs in two steps so the compiler can cache by canonical
/// URL: `canonicalize` names the source, `load` fetches it.
pub trait Importer: Send + Sync {
    /// Resolve a URL to its canonical form. `Ok(None)` passes: some other
    /// importer (or the filesystem) may still claim the URL.
    fn canonicalize(
        &self,
        url: &str,
        from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError>;

    /// Fetch the contents behind a canonical URL this importer produced.
    /// `Ok(None)` means the URL canonicalized but has nothing behind it.
    fn load(
        &self,
        canonical_url: &str,
    ) -> std::result::Result<Option<ImporterContents>, BoxError>;
}

/// A host importer that redirects URLs onto the filesystem.
///
/// The compiler loads the returned `file:` URL itself, so this is the
/// cheaper trait when sources already live on disk.
pub trait FileImporter: Send + Sync {
    fn find_file_url(
        &self,
        url: &str,
        from_import: bool,
    ) -> std::result::Result<Option<String>, BoxError>;
}

/// What an [`Importer`] hands back for a canonical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterContents {
    pub contents: String,
    pub syntax: Syntax,
    pub source_map_url: Option<String>,
}

impl ImporterContents {
    /// SCSS-syntax contents with no source map.
    pub fn scss(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            syntax: Syntax::Scss,
            source_map_url: None,
        }
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }
}
