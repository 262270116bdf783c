//! Two-TAB bell-then-list completion (spec.md §7), delegated to
//! `rustyline`'s own GNU-readline-compatible engine: we only need to
//! supply the candidate set, `CompletionType::List` + `BellStyle::Audible`
//! reproduce the bell-on-first-TAB / list-on-second-TAB behavior without
//! any hand-rolled state tracking.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::path_resolver::PathList;

pub struct ShellCompleter {
    builtin_names: Vec<&'static str>,
}

impl ShellCompleter {
    pub fn new(builtin_names: Vec<&'static str>) -> Self {
        Self { builtin_names }
    }

    /// Candidates for the word under the cursor, when it's the first word
    /// on the line (command position): builtin names plus every
    /// executable name visible on PATH, deduplicated and sorted.
    fn command_candidates(&self, prefix: &str, path_list: &PathList) -> Vec<String> {
        let mut names: Vec<String> = self
            .builtin_names
            .iter()
            .map(|s| s.to_string())
            .chain(path_list.all_executable_names())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

pub struct ShellHelper {
    pub completer: ShellCompleter,
    pub path_list: PathList,
}

impl Helper for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(line, pos);
        let word = &line[start..pos];

        // Only the first word of the line is a command; later words are
        // left uncompleted (spec.md §7 scopes completion to commands).
        if start != 0 {
            return Ok((pos, Vec::new()));
        }

        let candidates = self.completer.command_candidates(word, &self.path_list);
        let pairs = match candidates.len() {
            0 => Vec::new(),
            1 => vec![Pair { display: candidates[0].clone(), replacement: format!("{} ", candidates[0]) }],
            _ => candidates.into_iter().map(|name| Pair { display: name.clone(), replacement: name }).collect(),
        };
        Ok((start, pairs))
    }
}

fn word_start(line: &str, pos: usize) -> usize {
    line[..pos].rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0)
}
