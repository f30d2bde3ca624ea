//! Multiple-choice quizzes generated from C/C++ source.
//!
//! Source text is parsed with tree-sitter, every node of the tree is visited
//! and `#include`, `#define` and simple declarations are turned into
//! questions. A [`quiz::QuizSession`] then walks the learner through them and
//! keeps score.

pub mod config;
pub mod quiz;
pub mod syntax;
