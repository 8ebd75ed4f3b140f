//! Interactive REPL (spec §6.2): line editing via `rustyline`, with the
//! incomplete-input continuation loop driven directly off
//! `RlError::is_incomplete_input()`.

use rl_runtime::Evaluator;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "rl> ";
const CONTINUATION_PROMPT: &str = "... ";

pub fn run(evaluator: &mut Evaluator) -> bool {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("rlang: failed to start line editor: {err}");
            return false;
        }
    };

    let history_path = history_file();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    println!("rlang — Ctrl+D to exit");

    let mut pending = String::new();

    loop {
        let prompt = if pending.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
        match editor.readline(prompt) {
            Ok(line) => {
                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(&line);
                let _ = editor.add_history_entry(line.as_str());

                match rl_reader::parse_source(&pending, "repl") {
                    Ok(values) => {
                        pending.clear();
                        match evaluator.do_block(&values) {
                            Ok(value) => {
                                if value != rl_core::Value::None {
                                    println!("{}", rl_core::mold::mold(&value));
                                }
                            }
                            Err(err) => eprint!("{}", err.format_report()),
                        }
                    }
                    Err(err) if err.is_incomplete_input() => {
                        // Keep `pending` and re-prompt for more input.
                    }
                    Err(err) => {
                        eprint!("{}", err.format_report());
                        pending.clear();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("rlang: read error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    true
}

fn history_file() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(".rlang_history"))
}
