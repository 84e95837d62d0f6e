//! A parsed configuration file with pending source replacements

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{BlockId, SourceBlock};

/// One configuration file, its source blocks and the edits recorded against them
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    content: String,
    blocks: Vec<SourceBlock>,
    replacements: BTreeMap<BlockId, String>,
}

impl Document {
    pub fn parse(
        path: impl Into<PathBuf>,
        content: String,
        parser: &dyn Parser,
    ) -> Result<Self, ParseError> {
        let blocks = parser.parse(&content)?;
        Ok(Self {
            path: path.into(),
            content,
            blocks,
            replacements: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every block with a plain string source, in document order
    pub fn list_attribute_blocks(&self) -> &[SourceBlock] {
        &self.blocks
    }

    /// Record `text` as the new source of block `id`
    ///
    /// Returns false when `id` does not belong to this document.
    pub fn replace_attribute_text(&mut self, id: BlockId, text: &str) -> bool {
        let Some(block) = self.blocks.get(id.index()) else {
            return false;
        };
        if block.raw == text {
            self.replacements.remove(&id);
        } else {
            self.replacements.insert(id, text.to_string());
        }
        true
    }

    pub fn is_modified(&self) -> bool {
        !self.replacements.is_empty()
    }

    /// The file content with every recorded replacement spliced in
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.content.len());
        let mut cursor = 0;

        for (id, text) in &self.replacements {
            let block = &self.blocks[id.index()];
            output.push_str(&self.content[cursor..block.start_offset]);
            output.push_str(text);
            cursor = block.end_offset;
        }
        output.push_str(&self.content[cursor..]);

        output
    }

    /// `<path> [<label>]`, or the path alone for unlabelled blocks
    pub fn module_name(&self, block: &SourceBlock) -> String {
        match &block.label {
            Some(label) => format!("{} [{}]", self.path.display(), label),
            None => self.path.display().to_string(),
        }
    }
}
