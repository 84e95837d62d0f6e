//! Terraform / Terragrunt HCL parser

use tracing::{debug, warn};

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{BlockId, BlockType, SourceBlock};

const SOURCE_ATTRIBUTE: &str = "source";

/// Parser for `.tf` and `.hcl` files
pub struct HclParser;

impl HclParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HclParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for HclParser {
    fn parse(&self, content: &str) -> Result<Vec<SourceBlock>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_hcl::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set HCL language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse HCL content");
            ParseError::ParseFailed("Failed to parse HCL".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error(root)
                .map(|node| {
                    let point = node.start_position();
                    format!("line {}, column {}", point.row + 1, point.column + 1)
                })
                .unwrap_or_else(|| "unknown position".to_string());
            return Err(ParseError::InvalidSyntax(format!(
                "unexpected token at {position}"
            )));
        }

        let mut results = Vec::new();
        let mut cursor = root.walk();
        for body in root.named_children(&mut cursor) {
            if body.kind() == "body" {
                self.find_source_blocks(body, content, &mut results);
            }
        }

        Ok(results)
    }
}

impl HclParser {
    /// Collect top-level blocks that may carry a module source
    ///
    /// HCL tree structure:
    /// ```text
    /// config_file
    ///   body
    ///     block                       <- module "vpc" { ... }
    ///       identifier                <- block type: "module"
    ///       string_lit                <- label: "vpc"
    ///       block_start
    ///       body
    ///         attribute               <- TARGET: source = "..."
    ///           identifier            <- "source"
    ///           expression            <- "\"git::https://...\""
    ///       block_end
    /// ```
    fn find_source_blocks(
        &self,
        body: tree_sitter::Node,
        content: &str,
        results: &mut Vec<SourceBlock>,
    ) {
        let mut cursor = body.walk();
        for block in body.named_children(&mut cursor) {
            if block.kind() != "block" {
                continue;
            }
            if let Some(source) = self.extract_source(block, content, BlockId(results.len())) {
                results.push(source);
            }
        }
    }

    fn extract_source(
        &self,
        block: tree_sitter::Node,
        content: &str,
        id: BlockId,
    ) -> Option<SourceBlock> {
        let mut cursor = block.walk();
        let children: Vec<tree_sitter::Node> = block.named_children(&mut cursor).collect();

        let (type_node, rest) = children.split_first()?;
        let block_type: BlockType = node_text(*type_node, content).parse().ok()?;

        let label = rest
            .first()
            .filter(|node| matches!(node.kind(), "string_lit" | "identifier"))
            .map(|node| unquote(node_text(*node, content)).to_string());

        let body = rest.iter().find(|node| node.kind() == "body")?;
        let expression = self.find_source_expression(*body, content)?;

        let text = node_text(expression, content);
        if !is_plain_string(text) {
            debug!(
                "Ignoring non-literal source of {} block at line {}",
                block_type.as_str(),
                expression.start_position().row + 1
            );
            return None;
        }

        let start_offset = expression.start_byte() + 1;
        let end_offset = expression.end_byte() - 1;
        let point = expression.start_position();

        Some(SourceBlock {
            id,
            block_type,
            label,
            raw: content[start_offset..end_offset].to_string(),
            start_offset,
            end_offset,
            line: point.row,
            column: point.column + 1,
        })
    }

    /// Find the expression of the first `source = ...` attribute in a block body
    fn find_source_expression<'tree>(
        &self,
        body: tree_sitter::Node<'tree>,
        content: &str,
    ) -> Option<tree_sitter::Node<'tree>> {
        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .filter(|node| node.kind() == "attribute")
            .find_map(|attribute| {
                let name = attribute.named_child(0)?;
                if node_text(name, content) != SOURCE_ATTRIBUTE {
                    return None;
                }
                let mut cursor = attribute.walk();
                attribute
                    .named_children(&mut cursor)
                    .find(|node| node.kind() == "expression")
            })
    }
}

fn node_text<'a>(node: tree_sitter::Node, content: &'a str) -> &'a str {
    &content[node.byte_range()]
}

fn unquote(text: &str) -> &str {
    text.trim()
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

/// A quoted string without template interpolation or directives
fn is_plain_string(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !text.contains("${")
        && !text.contains("%{")
        && !text.contains('\n')
}

fn first_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<tree_sitter::Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
