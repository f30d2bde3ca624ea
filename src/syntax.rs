//! Read-only view over a parsed C/C++ syntax tree.
//!
//! The question engine only needs a node's type tag, its source text and its
//! children, so it works against [`SyntaxNode`]. [`CppSource`] provides that
//! view on top of tree-sitter's C++ grammar.

use log::debug;
use tree_sitter::{Node, Parser, Tree};

use crate::quiz::error::GenerationError;

/// Node type tags the question factory looks at.
pub mod kind {
    pub const INCLUDE: &str = "preproc_include";
    pub const SYSTEM_LIB_STRING: &str = "system_lib_string";
    pub const STRING_LITERAL: &str = "string_literal";
    pub const DEFINE: &str = "preproc_def";
    pub const DECLARATION: &str = "declaration";
    pub const PRIMITIVE_TYPE: &str = "primitive_type";
    pub const TYPE_IDENTIFIER: &str = "type_identifier";
    pub const SIZED_TYPE_SPECIFIER: &str = "sized_type_specifier";
    pub const IDENTIFIER: &str = "identifier";
    pub const INIT_DECLARATOR: &str = "init_declarator";
    pub const ARRAY_DECLARATOR: &str = "array_declarator";
    pub const COMMENT: &str = "comment";
}

pub trait SyntaxNode: Clone {
    /// Grammar category, e.g. `preproc_include`.
    fn kind(&self) -> &str;
    /// Literal source text covered by the node.
    fn text(&self) -> String;
    fn child_count(&self) -> usize;
    /// Child at `index`, counting anonymous tokens such as `#include` or `;`.
    fn child(&self, index: usize) -> Option<Self>;

    fn children(&self) -> Vec<Self> {
        (0..self.child_count())
            .filter_map(|i| self.child(i))
            .collect()
    }
}

/// Source text together with its tree-sitter C++ parse.
pub struct CppSource {
    source: String,
    tree: Tree,
}

impl CppSource {
    pub fn parse(source: &str) -> Result<Self, GenerationError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| GenerationError::Language(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(GenerationError::Parse)?;
        if tree.root_node().has_error() {
            // tree-sitter recovers from errors, we still get a usable tree
            debug!("Source parsed with syntax errors, continuing with partial tree");
        }

        Ok(Self {
            source: source.to_string(),
            tree,
        })
    }

    pub fn root(&self) -> CppNode<'_> {
        CppNode {
            node: self.tree.root_node(),
            source: &self.source,
        }
    }
}

#[derive(Clone, Copy)]
pub struct CppNode<'tree> {
    node: Node<'tree>,
    source: &'tree str,
}

impl<'tree> SyntaxNode for CppNode<'tree> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn text(&self) -> String {
        self.source
            .get(self.node.byte_range())
            .unwrap_or_default()
            .to_string()
    }

    fn child_count(&self) -> usize {
        self.node.child_count()
    }

    fn child(&self, index: usize) -> Option<Self> {
        self.node.child(index).map(|node| CppNode {
            node,
            source: self.source,
        })
    }
}

impl std::fmt::Debug for CppNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CppNode")
            .field("kind", &self.node.kind())
            .field("range", &self.node.byte_range())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_include_directives() {
        let source = CppSource::parse("#include <stdio.h>\n").unwrap();
        let root = source.root();
        assert_eq!(root.kind(), "translation_unit");

        let include = root.child(0).unwrap();
        assert_eq!(include.kind(), kind::INCLUDE);
        assert_eq!(include.child(0).unwrap().kind(), "#include");
        assert_eq!(include.child(1).unwrap().kind(), kind::SYSTEM_LIB_STRING);
        assert_eq!(include.child(1).unwrap().text(), "<stdio.h>");
    }

    #[test]
    fn blank_source_is_an_empty_tree() {
        for blank in ["", "  \n\t"] {
            let source = CppSource::parse(blank).unwrap();
            assert_eq!(source.root().kind(), "translation_unit");
            assert_eq!(source.root().child_count(), 0);
        }
    }

    #[test]
    fn children_lists_anonymous_tokens() {
        let source = CppSource::parse("int x;\n").unwrap();
        let declaration = source.root().child(0).unwrap();
        let kinds = declaration
            .children()
            .iter()
            .map(|c| c.kind().to_string())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["primitive_type", "identifier", ";"]);
    }
}
