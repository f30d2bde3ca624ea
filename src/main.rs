use std::sync::Arc;

use cpp_quiz::config::Config;
use cpp_quiz::quiz::{self, Outcome, Phase, QuizSession};
use log::{error, info};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
    utils::html,
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveSource,
    Quiz {
        session: QuizSession,
    },
}

type QuizStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("Starting C++ quiz bot...");

    let bot = Bot::from_env();

    info!("Opening dialogue storage at {}", config.db_path);
    let storage: QuizStorage = match SqliteStorage::open(&config.db_path, Json).await {
        Ok(storage) => storage.erase(),
        Err(e) => {
            error!("Failed to open {}: {}", config.db_path, e);
            return;
        }
    };

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveSource].endpoint(receive_source))
            .branch(dptree::case![State::Quiz { session }].endpoint(quiz_step)),
    )
    .dependencies(dptree::deps![storage, config])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I turn C/C++ source into quiz questions about #include, #define and declarations.";
const ASK_FOR_SOURCE: &str = "Send me a C or C++ source file as a text message to start a quiz.";
const RESTART_COMMAND: &str = "/start";
const NEXT_BUTTON: &str = "Next";

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    bot.send_message(msg.chat.id, ASK_FOR_SOURCE)
        .reply_markup(KeyboardRemove::new())
        .await?;

    dialogue.update(State::ReceiveSource).await?;
    Ok(())
}

async fn receive_source(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    config: Arc<Config>,
) -> HandlerResult {
    if msg.text() == Some(RESTART_COMMAND) {
        return start(bot, dialogue, msg).await;
    }
    let source = match msg.text() {
        Some(text) => text.to_string(),
        None => {
            bot.send_message(msg.chat.id, "Please send the source as text")
                .await?;
            return Ok(());
        }
    };
    if source.len() > config.max_source_bytes {
        bot.send_message(
            msg.chat.id,
            format!(
                "That source is too long, please keep it under {} bytes",
                config.max_source_bytes
            ),
        )
        .await?;
        return Ok(());
    }

    let mut session = QuizSession::new();
    let ticket = session.start();

    // Only a nicety, parsing goes on even if this fails
    let _ = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await;

    let generated = tokio::task::spawn_blocking(move || {
        quiz::generate_from_source(&source, &mut rand::thread_rng())
    })
    .await?;

    if let Err(e) = session.finish_generation(ticket, generated) {
        bot.send_message(
            msg.chat.id,
            format!("I couldn't build questions from that ({}). Please try again.", e),
        )
        .await?;
        return Ok(());
    }

    show_phase(&bot, &dialogue, msg.chat.id, session).await
}

async fn quiz_step(
    bot: Bot,
    dialogue: QuizDialogue,
    session: QuizSession,
    msg: Message,
) -> HandlerResult {
    if msg.text() == Some(RESTART_COMMAND) {
        return start(bot, dialogue, msg).await;
    }

    let mut session = session;
    match session.phase().clone() {
        Phase::Presenting(_) => {
            let selected = parse_selection(msg.text());
            match session.check_answer(selected) {
                Ok(outcome) => {
                    send_feedback(&bot, msg.chat.id, &outcome).await?;
                    dialogue.update(State::Quiz { session }).await?;
                    Ok(())
                }
                Err(e) if e.is_validation() => {
                    bot.send_message(msg.chat.id, "Please choose one of the options")
                        .await?;
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
        Phase::Feedback { .. } => {
            session.advance()?;
            show_phase(&bot, &dialogue, msg.chat.id, session).await
        }
        // Nothing to continue, ask for a new source
        Phase::Idle | Phase::Generating { .. } | Phase::Completed => {
            bot.send_message(msg.chat.id, ASK_FOR_SOURCE)
                .reply_markup(KeyboardRemove::new())
                .await?;
            dialogue.update(State::ReceiveSource).await?;
            Ok(())
        }
    }
}

/// Shows whatever the session is ready for: the next question or the final
/// score.
async fn show_phase(
    bot: &Bot,
    dialogue: &QuizDialogue,
    chat_id: ChatId,
    session: QuizSession,
) -> HandlerResult {
    if let Some(summary) = session.summary() {
        let text = if summary.total == 0 {
            "I couldn't find any #include, #define or declaration to ask about.".to_string()
        } else {
            format!(
                "All questions are done! Your score is {} / {}.",
                summary.score, summary.total
            )
        };
        bot.send_message(chat_id, text)
            .reply_markup(KeyboardRemove::new())
            .await?;
        bot.send_message(chat_id, ASK_FOR_SOURCE).await?;

        dialogue.update(State::ReceiveSource).await?;
        return Ok(());
    }

    let question = match session.current_question() {
        Some(question) => question,
        None => {
            dialogue.update(State::ReceiveSource).await?;
            return Ok(());
        }
    };

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}. {}", i + 1, option))
        .collect::<Vec<_>>()
        .join("\n");
    // the factory escapes `&`, `<` and `>` in program and option text
    let text = format!(
        "<b>Question {} of {}</b>\n{}\n<pre>{}</pre>\n{}",
        session.current_index() + 1,
        session.total(),
        html::escape(question.prompt()),
        question.program(),
        options
    );
    let buttons = (1..=question.options().len())
        .map(|n| KeyboardButton::new(n.to_string()))
        .collect::<Vec<_>>();

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardMarkup::new(vec![buttons]))
        .await?;

    dialogue.update(State::Quiz { session }).await?;
    Ok(())
}

async fn send_feedback(bot: &Bot, chat_id: ChatId, outcome: &Outcome) -> HandlerResult {
    let text = match &outcome.correct_option {
        None => "Correct!".to_string(),
        Some(answer) => format!("Wrong. The correct answer is: {}", answer),
    };
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(
            NEXT_BUTTON,
        )]]))
        .await?;
    Ok(())
}

/// Option buttons are numbered from 1.
fn parse_selection(text: Option<&str>) -> Option<usize> {
    match text?.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Some(n - 1),
        _ => None,
    }
}
