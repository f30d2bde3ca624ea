// Integration tests: real C/C++ source through tree-sitter into a quiz session

use cpp_quiz::quiz::error::{GenerationError, SessionError};
use cpp_quiz::quiz::factory::{
    DECLARATION_PROMPT, DEFINE_PROMPT, FROM_INCLUDER_FOLDER, FROM_STANDARD_PATHS, INCLUDE_PROMPT,
};
use cpp_quiz::quiz::{generate_from_source, Phase, Question, QuizSession, Summary};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate(source: &str) -> Vec<Question> {
    let mut rng = StdRng::seed_from_u64(1234);
    generate_from_source(source, &mut rng).expect("generation failed")
}

fn with_prompt<'a>(questions: &'a [Question], prompt: &str) -> Vec<&'a Question> {
    questions.iter().filter(|q| q.prompt() == prompt).collect()
}

#[test]
fn test_two_includes_give_two_questions() {
    let source = r#"#include <stdio.h>
#include "a.h"
"#;
    let questions = generate(source);

    assert_eq!(questions.len(), 2);
    let includes = with_prompt(&questions, INCLUDE_PROMPT);
    assert_eq!(includes.len(), 2);

    let system = includes
        .iter()
        .find(|q| q.program().contains("&lt;stdio.h&gt;"))
        .expect("no question for <stdio.h>");
    let local = includes
        .iter()
        .find(|q| q.program().contains("\"a.h\""))
        .expect("no question for \"a.h\"");

    assert_eq!(system.correct_option().unwrap(), FROM_STANDARD_PATHS);
    assert_eq!(local.correct_option().unwrap(), FROM_INCLUDER_FOLDER);
}

#[test]
fn test_define_uses_child_positions() {
    let questions = generate("#define LIMIT 100\n");

    assert_eq!(questions.len(), 1);
    let question = &questions[0];
    assert_eq!(question.prompt(), DEFINE_PROMPT);
    // child(1) is `LIMIT`, child(2) is `100`
    assert_eq!(
        question.correct_option().unwrap(),
        "The value LIMIT becomes usable under the name 100."
    );
    assert!(question
        .options()
        .iter()
        .any(|o| o == "The value 100 becomes usable under the name LIMIT."));
}

#[test]
fn test_declarations() {
    let source = r#"
int counter;
int scores[] = {1, 2, 3};
const int frozen = 1;
int add(int a, int b);
"#;
    let questions = generate(source);
    let declarations = with_prompt(&questions, DECLARATION_PROMPT);

    let mut correct = declarations
        .iter()
        .map(|q| q.correct_option().unwrap().to_string())
        .collect::<Vec<_>>();
    correct.sort();
    assert_eq!(
        correct,
        vec![
            "A variable counter of type int is declared.".to_string(),
            "An array scores of type int is declared.".to_string(),
        ]
    );
}

#[test]
fn test_nested_declarations_are_found() {
    let source = r#"
int main() {
    int local;
    return 0;
}
"#;
    let questions = generate(source);
    assert_eq!(questions.len(), 1);
    assert_eq!(
        questions[0].correct_option().unwrap(),
        "A variable local of type int is declared."
    );
}

#[test]
fn test_comments_are_removed_from_program_text() {
    let questions = generate("#include <vector> // containers\n");
    assert_eq!(questions.len(), 1);
    assert!(!questions[0].program().contains("containers"));
}

#[test]
fn test_every_question_has_valid_correct_index() {
    let source = r#"#include <stdio.h>
#include "local.h"
#define SIZE 8
#define NAME "quiz"
int values[SIZE];
int total;
long long big;
"#;
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let questions = generate_from_source(source, &mut rng).unwrap();
        assert!(!questions.is_empty());
        for question in &questions {
            assert!(question.options().len() >= 2);
            assert!(question.correct_index() < question.options().len());
        }
    }
}

#[test]
fn test_empty_source_completes_with_no_questions() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(generate_from_source("", &mut rng), Ok(vec![]));

    let mut session = QuizSession::new();
    let ticket = session.start();
    session
        .finish_generation(ticket, generate_from_source("", &mut rng))
        .unwrap();

    assert_eq!(session.phase(), &Phase::Completed);
    assert_eq!(session.summary(), Some(Summary { score: 0, total: 0 }));
}

#[test]
fn test_full_quiz_all_correct() {
    let source = r#"#include <stdlib.h>
#define ONE 1
int x;
"#;
    let mut session = QuizSession::new();
    let ticket = session.start();
    session.finish_generation(ticket, Ok(generate(source))).unwrap();
    let total = session.total();
    assert_eq!(total, 3);

    while let Phase::Presenting(_) = session.phase() {
        let correct = session.current_question().unwrap().correct_index();
        assert!(session.check_answer(Some(correct)).unwrap().correct);
        session.advance().unwrap();
    }

    assert_eq!(session.summary(), Some(Summary { score: 3, total: 3 }));
}

#[test]
fn test_source_without_questions_completes() {
    let mut session = QuizSession::new();
    let ticket = session.start();
    session
        .finish_generation(ticket, Ok(generate("int main() { return 0; }\n")))
        .unwrap();

    assert_eq!(session.phase(), &Phase::Completed);
    assert_eq!(session.summary(), Some(Summary { score: 0, total: 0 }));
}

#[test]
fn test_check_without_selection_keeps_state() {
    let mut session = QuizSession::new();
    let ticket = session.start();
    session
        .finish_generation(ticket, Ok(generate("#include <stdio.h>\n")))
        .unwrap();

    let err = session.check_answer(None).unwrap_err();

    assert_eq!(err, SessionError::NoSelection);
    assert_eq!(session.phase(), &Phase::Presenting(0));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);
}

#[test]
fn test_failed_generation_can_be_retried() {
    let mut session = QuizSession::new();
    let ticket = session.start();
    let result = session.finish_generation(ticket, Err(GenerationError::Parse));
    assert_eq!(
        result,
        Err(SessionError::Generation(GenerationError::Parse))
    );
    assert_eq!(session.phase(), &Phase::Idle);

    let retry = session.start();
    session
        .finish_generation(retry, Ok(generate("#define A 1\n")))
        .unwrap();
    assert_eq!(session.phase(), &Phase::Presenting(0));
}
