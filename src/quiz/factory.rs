use log::debug;
use rand::Rng;

use crate::quiz::Question;
use crate::syntax::{kind, SyntaxNode};

pub const INCLUDE_PROMPT: &str =
    "Look at the \"\" or <> of this #include and choose where the code is taken from.";
pub const DEFINE_PROMPT: &str = "Choose the meaning of this #define.";
pub const DECLARATION_PROMPT: &str = "Choose what this declaration declares.";

pub const FROM_STANDARD_PATHS: &str =
    "The code is taken from the standard library folder or the project root.";
pub const FROM_INCLUDER_FOLDER: &str =
    "The code is taken relative to the folder containing the including file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// `#include <stdio.h>`
    System,
    /// `#include "a.h"`
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationShape {
    Variable { ty: String, name: String },
    Array { ty: String, name: String },
    /// Qualifiers, pointers, plain initialisers and the rest. No question is
    /// asked about these.
    Unsupported,
}

/// What the factory recognises a node as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Include(IncludeKind),
    MacroDefinition { value: String, name: String },
    Declaration(DeclarationShape),
    Unclassified,
}

pub fn classify<N: SyntaxNode>(node: &N) -> NodeKind {
    match node.kind() {
        kind::INCLUDE => match node.child(1).as_ref().map(|path| path.kind()) {
            Some(kind::SYSTEM_LIB_STRING) => NodeKind::Include(IncludeKind::System),
            Some(kind::STRING_LITERAL) => NodeKind::Include(IncludeKind::Local),
            // `#include SOME_MACRO`
            _ => NodeKind::Unclassified,
        },
        kind::DEFINE => match (node.child(1), node.child(2)) {
            (Some(value), Some(name)) => NodeKind::MacroDefinition {
                value: part_text(&value),
                name: part_text(&name),
            },
            // `#define GUARD` has nothing to swap
            _ => NodeKind::Unclassified,
        },
        kind::DECLARATION => NodeKind::Declaration(declaration_shape(node)),
        _ => NodeKind::Unclassified,
    }
}

fn declaration_shape<N: SyntaxNode>(node: &N) -> DeclarationShape {
    let (ty, declarator) = match (node.child(0), node.child(1)) {
        (Some(ty), Some(declarator)) => (ty, declarator),
        _ => return DeclarationShape::Unsupported,
    };
    if !matches!(
        ty.kind(),
        kind::PRIMITIVE_TYPE | kind::TYPE_IDENTIFIER | kind::SIZED_TYPE_SPECIFIER
    ) {
        return DeclarationShape::Unsupported;
    }
    let ty = part_text(&ty);

    match declarator.kind() {
        kind::IDENTIFIER => DeclarationShape::Variable {
            ty,
            name: part_text(&declarator),
        },
        // `int a[3];`
        kind::ARRAY_DECLARATOR => match array_name(&declarator) {
            Some(name) => DeclarationShape::Array { ty, name },
            None => DeclarationShape::Unsupported,
        },
        // `int a[] = {1, 2};`, the name sits two levels down
        kind::INIT_DECLARATOR => match declarator.child(0) {
            Some(inner) if inner.kind() == kind::ARRAY_DECLARATOR => match array_name(&inner) {
                Some(name) => DeclarationShape::Array { ty, name },
                None => DeclarationShape::Unsupported,
            },
            _ => DeclarationShape::Unsupported,
        },
        _ => DeclarationShape::Unsupported,
    }
}

fn array_name<N: SyntaxNode>(array: &N) -> Option<String> {
    array
        .child(0)
        .filter(|name| name.kind() == kind::IDENTIFIER)
        .map(|name| part_text(&name))
}

/// Node text with comment children removed and `&`, `<` and `>` escaped, so
/// it can be dropped into HTML as is.
pub fn extract_text<N: SyntaxNode>(node: &N) -> String {
    let mut text = node.text();
    for comment in node
        .children()
        .iter()
        .filter(|child| child.kind() == kind::COMMENT)
    {
        text = text.replacen(&comment.text(), "", 1);
    }
    // `&` first, otherwise the entities below get escaped again
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

fn part_text<N: SyntaxNode>(node: &N) -> String {
    extract_text(node).trim().to_string()
}

fn macro_sentence(value: &str, name: &str) -> String {
    format!("The value {} becomes usable under the name {}.", value, name)
}

fn variable_sentence(ty: &str, name: &str) -> String {
    format!("A variable {} of type {} is declared.", name, ty)
}

fn array_sentence(ty: &str, name: &str) -> String {
    format!("An array {} of type {} is declared.", name, ty)
}

/// Builds the question for `node`, or `None` when the node is not something
/// we ask about.
pub fn generate_question<N: SyntaxNode, R: Rng + ?Sized>(node: &N, rng: &mut R) -> Option<Question> {
    let (prompt, correct_option, incorrect_option) = match classify(node) {
        NodeKind::Include(IncludeKind::System) => (
            INCLUDE_PROMPT,
            FROM_STANDARD_PATHS.to_string(),
            FROM_INCLUDER_FOLDER.to_string(),
        ),
        NodeKind::Include(IncludeKind::Local) => (
            INCLUDE_PROMPT,
            FROM_INCLUDER_FOLDER.to_string(),
            FROM_STANDARD_PATHS.to_string(),
        ),
        NodeKind::MacroDefinition { value, name } => (
            DEFINE_PROMPT,
            macro_sentence(&value, &name),
            macro_sentence(&name, &value),
        ),
        NodeKind::Declaration(DeclarationShape::Variable { ty, name }) => (
            DECLARATION_PROMPT,
            variable_sentence(&ty, &name),
            variable_sentence(&name, &ty),
        ),
        NodeKind::Declaration(DeclarationShape::Array { ty, name }) => (
            DECLARATION_PROMPT,
            array_sentence(&ty, &name),
            array_sentence(&name, &ty),
        ),
        NodeKind::Declaration(DeclarationShape::Unsupported) => {
            debug!(
                "Skipping declaration we can't ask about: {}",
                node.text().trim()
            );
            return None;
        }
        NodeKind::Unclassified => return None,
    };

    let question = Question::new(
        extract_text(node),
        prompt.to_string(),
        correct_option,
        vec![incorrect_option],
        rng,
    );
    debug!(
        "Generated question for {}: {:?}",
        node.kind(),
        question.program()
    );
    Some(question)
}
