use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

pub trait Repl {
    type Error: std::fmt::Display;
    const HISTORY: Option<&'static str> = None;
    const PROMPT: &'static str = ">> ";
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Lines starting with `#` are comments.
fn is_blank(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Reads lines until EOF or interrupt. A trailing `\` continues the input on
/// the next line. A failed evaluation is logged and the loop goes on.
pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        if let Err(e) = editor.load_history(history) {
            tracing::debug!(history, %e, "no history loaded");
        }
    }
    let mut pending: Option<String> = None;
    loop {
        let prompt = if pending.is_some() { ".. " } else { R::PROMPT };
        match editor.readline(prompt) {
            Ok(mut line) if line.ends_with('\\') => {
                line.pop();
                pending.get_or_insert_with(String::new).push_str(&line);
            }
            Ok(line) => {
                let input = match pending.take() {
                    Some(mut input) => {
                        input.push_str(&line);
                        input
                    }
                    None => line,
                };
                if is_blank(&input) {
                    continue;
                }
                editor.add_history_entry(input.as_str());
                if let Err(e) = repl.evaluate(input) {
                    tracing::error!(%e, "evaluation failed");
                }
                if let Some(history) = R::HISTORY {
                    editor.save_history(history)?;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(e.into()),
        }
    }
}
