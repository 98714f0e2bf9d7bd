use std::collections::HashMap;
use std::sync::Arc;

use crate::functions::{FunctionSignature, HostFunction};
use crate::importers::{FileImporter, Importer};

/// Host functions by name. Registration is explicit; nothing is
/// discovered at runtime.
#[derive(Default)]
pub struct FunctionRegistry {
    entries: HashMap<String, FunctionEntry>,
}

struct FunctionEntry {
    signature: FunctionSignature,
    handler: Arc<dyn HostFunction>,
}

impl FunctionRegistry {
    /// Register a function under its signature's name. Re-registering a
    /// name replaces the previous handler.
    pub fn register(&mut self, signature: FunctionSignature, handler: Arc<dyn HostFunction>) {
        self.entries.insert(
            signature.name.clone(),
            FunctionEntry { signature, handler },
        );
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn HostFunction>> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(&entry.handler))
    }

    /// Rendered signatures for `CompileRequest.global_functions`, sorted
    /// so identical registrations produce identical requests.
    pub fn declarations(&self) -> Vec<String> {
        let mut declarations: Vec<String> = self
            .entries
            .values()
            .map(|entry| entry.signature.render())
            .collect();
        declarations.sort();
        declarations
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Importers by the id the compile request refers to them with.
#[derive(Default)]
pub struct ImporterRegistry {
    next_id: u32,
    entries: HashMap<u32, ImporterEntry>,
}

#[derive(Clone)]
pub enum ImporterEntry {
    Importer(Arc<dyn Importer>),
    FileImporter(Arc<dyn FileImporter>),
}

impl ImporterRegistry {
    pub fn register(&mut self, importer: Arc<dyn Importer>) -> u32 {
        let id = self.allocate();
        self.entries.insert(id, ImporterEntry::Importer(importer));
        id
    }

    pub fn register_file(&mut self, importer: Arc<dyn FileImporter>) -> u32 {
        let id = self.allocate();
        self.entries
            .insert(id, ImporterEntry::FileImporter(importer));
        id
    }

    pub fn entry(&self, id: u32) -> Option<ImporterEntry> {
        self.entries.get(&id).cloned()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
