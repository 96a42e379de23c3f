use indexmap::IndexMap;

use crate::io::host::{
    Document, DocumentHost, HostError, Selection, TextRange, byte_span, find_text, line_of, splice,
};

/// Notes held in memory. Counts mutations, which makes it handy for checking
/// that a sync touched nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    documents: IndexMap<String, String>,
    selection: Option<Selection>,
    mutations: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, text: &str) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: &str, text: &str) {
        self.documents.insert(path.to_string(), text.to_string());
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.documents.get(path).map(String::as_str)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Number of successful `mutate_document` and `replace_range` calls
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn existing(&self, path: &str) -> Result<&String, HostError> {
        self.documents.get(path).ok_or_else(|| HostError::NotFound {
            path: path.to_string(),
        })
    }
}

impl DocumentHost for MemoryHost {
    fn read_document(&self, path: &str) -> Result<Document, HostError> {
        Ok(Document::new(self.existing(path)?.clone()))
    }

    fn mutate_document<F>(&mut self, path: &str, edit: F) -> Result<(), HostError>
    where
        F: FnOnce(&str) -> String,
    {
        let updated = edit(self.existing(path)?);
        self.documents.insert(path.to_string(), updated);
        self.mutations += 1;
        Ok(())
    }

    fn get_line(&self, path: &str, line: usize) -> Result<String, HostError> {
        line_of(self.existing(path)?, path, line)
    }

    fn replace_range(&mut self, path: &str, range: TextRange, text: &str) -> Result<(), HostError> {
        let updated = splice(self.existing(path)?, path, range, text)?;
        self.documents.insert(path.to_string(), updated);
        self.mutations += 1;
        Ok(())
    }

    fn select_text(&mut self, path: &str, text: &str) -> Result<TextRange, HostError> {
        let range = find_text(self.existing(path)?, text).ok_or_else(|| HostError::TextNotFound {
            path: path.to_string(),
            text: text.to_string(),
        })?;
        self.selection = Some(Selection {
            path: path.to_string(),
            range,
        });
        Ok(range)
    }

    fn select_range(&mut self, path: &str, range: TextRange) -> Result<(), HostError> {
        byte_span(self.existing(path)?, path, range)?;
        self.selection = Some(Selection {
            path: path.to_string(),
            range,
        });
        Ok(())
    }
}
