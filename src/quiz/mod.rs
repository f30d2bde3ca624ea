pub mod error;
pub mod factory;
pub mod session;
pub mod shuffle;
pub mod walker;

use log::info;
use rand::Rng;

use crate::syntax::{CppSource, SyntaxNode};
use error::GenerationError;

pub use session::{Outcome, Phase, QuizSession, Summary};

/// One multiple-choice question. Serialised as
/// `{program, question, options, correctNum}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    program: String,
    #[serde(rename = "question")]
    prompt: String,
    options: Vec<String>,
    #[serde(rename = "correctNum")]
    correct_index: usize,
}

impl Question {
    /// Shuffles the correct option in with the incorrect ones and remembers
    /// where it landed.
    pub fn new<R: Rng + ?Sized>(
        program: String,
        prompt: String,
        correct_option: String,
        incorrect_options: Vec<String>,
        rng: &mut R,
    ) -> Self {
        let mut options = Vec::with_capacity(incorrect_options.len() + 1);
        options.push(correct_option);
        options.extend(incorrect_options);
        let correct_index = shuffle::shuffle_tracking(&mut options, 0, rng);

        Self {
            program,
            prompt,
            options,
            correct_index,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// `None` only for a question restored from storage with a broken index.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(|o| o.as_str())
    }
}

/// Walks the tree, asks the factory about every node and shuffles the
/// resulting questions.
pub fn generate_questions<N: SyntaxNode, R: Rng + ?Sized>(root: N, rng: &mut R) -> Vec<Question> {
    let mut questions = walker::walk(root)
        .filter_map(|node| factory::generate_question(&node, rng))
        .collect::<Vec<_>>();
    shuffle::shuffle(&mut questions, rng);

    info!("Generated {} questions", questions.len());
    questions
}

pub fn generate_from_source<R: Rng + ?Sized>(
    source: &str,
    rng: &mut R,
) -> Result<Vec<Question>, GenerationError> {
    let parsed = CppSource::parse(source)?;
    Ok(generate_questions(parsed.root(), rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_question_tracks_correct_option() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..30 {
            let question = Question::new(
                "int x;".to_string(),
                "What?".to_string(),
                "right".to_string(),
                vec!["wrong".to_string(), "also wrong".to_string()],
                &mut rng,
            );
            assert_eq!(question.correct_option(), Some("right"));
            assert_eq!(question.options().len(), 3);
        }
    }

    #[test]
    fn serialises_with_renderer_field_names() {
        let mut rng = StdRng::seed_from_u64(0);
        let question = Question::new(
            "#define N 3".to_string(),
            "Meaning?".to_string(),
            "a".to_string(),
            vec!["b".to_string()],
            &mut rng,
        );
        let json = serde_json::to_value(&question).unwrap();

        assert_eq!(json["program"], "#define N 3");
        assert_eq!(json["question"], "Meaning?");
        assert_eq!(json["options"].as_array().unwrap().len(), 2);
        assert_eq!(json["correctNum"], question.correct_index());
    }

    #[test]
    fn comment_only_source_has_no_questions() {
        let mut rng = StdRng::seed_from_u64(0);
        let questions = generate_from_source("// nothing here\n", &mut rng).unwrap();
        assert!(questions.is_empty());
    }
}
