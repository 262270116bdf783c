//! The interactive read-eval-print loop (spec.md §4.8): prompt, read a
//! line, parse it into a pipeline, execute it, and surface any parse
//! error as a printed message rather than a panic.

use rustyline::error::ReadlineError;
use rustyline::{CompletionType, Config, Editor};

use crate::completion::{ShellCompleter, ShellHelper};
use crate::exec::Shell;
use crate::parser::parse;

const PROMPT: &str = "$ ";

pub fn run(mut shell: Shell) -> i32 {
    let config = Config::builder().completion_type(CompletionType::List).bell_style(rustyline::config::BellStyle::Audible).build();

    let mut editor: Editor<ShellHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config).expect("terminal editor initialization should not fail");
    editor.set_helper(Some(ShellHelper {
        completer: ShellCompleter::new(shell.registry.names()),
        path_list: shell.config.path_list.clone(),
    }));

    let mut last_status = 0;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                shell.history.push(line.clone());

                match parse(&line, shell.config.home.as_deref()) {
                    Ok(pipeline) => {
                        last_status = shell.execute(&pipeline);
                    }
                    Err(e) => {
                        eprintln!("{}", e);
                        last_status = 2;
                    }
                }
            }
            Err(ReadlineError::Eof) => {
                shell.persist_history();
                last_status = 0;
                break;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => {
                eprintln!("rush: {}", e);
                break;
            }
        }
    }
    last_status
}
