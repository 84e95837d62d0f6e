//! Common types for parsers

/// Type of block that may carry a module source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Terraform `module "name" { source = "..." }`
    Module,
    /// Terragrunt `terraform { source = "..." }`
    Terraform,
}

impl BlockType {
    /// Returns the keyword of the block type
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Module => "module",
            BlockType::Terraform => "terraform",
        }
    }
}

impl std::str::FromStr for BlockType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module" => Ok(BlockType::Module),
            "terraform" => Ok(BlockType::Terraform),
            _ => Err(()),
        }
    }
}

/// Handle of a source block, stable for the lifetime of one parsed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A block with a plain string `source` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub id: BlockId,
    pub block_type: BlockType,
    /// First block label (the module name in Terraform)
    pub label: Option<String>,
    /// Text between the quotes of the source attribute
    pub raw: String,
    /// Byte offset of `raw` in the document (start)
    pub start_offset: usize,
    /// Byte offset of `raw` in the document (end)
    pub end_offset: usize,
    /// Line of `raw` (0-indexed)
    pub line: usize,
    /// Column of `raw` (0-indexed, inside the opening quote)
    pub column: usize,
}
