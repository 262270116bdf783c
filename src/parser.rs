//! Groups a token stream into a [`Pipeline`] of [`Stage`]s, each carrying
//! its argv and redirection list.

use std::path::{Path, PathBuf};

use crate::error::ShellError;
use crate::tokenizer::{tokenize, RedirMode, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub fd: u32,
    pub target: PathBuf,
    pub mode: RedirMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stage {
    pub argv: Vec<String>,
    pub redirections: Vec<Redirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

/// Parse a line into a pipeline, expanding a leading unquoted `~` in any
/// word to `home` (if known).
pub fn parse(line: &str, home: Option<&Path>) -> Result<Pipeline, ShellError> {
    let tokens = tokenize(line)?;
    parse_tokens(tokens, home)
}

fn expand_tilde(text: &str, tilde_leading: bool, home: Option<&Path>) -> String {
    if !tilde_leading {
        return text.to_string();
    }
    let Some(home) = home else { return text.to_string() };
    let home = home.to_string_lossy();
    if text == "~" {
        home.into_owned()
    } else if let Some(rest) = text.strip_prefix("~/") {
        format!("{}/{}", home.trim_end_matches('/'), rest)
    } else {
        text.to_string()
    }
}

fn parse_tokens(tokens: Vec<Token>, home: Option<&Path>) -> Result<Pipeline, ShellError> {
    let mut stages = Vec::new();
    let mut current = Stage::default();
    let mut iter = tokens.into_iter().peekable();

    while let Some(tok) = iter.next() {
        match tok {
            Token::Pipe => {
                if current.argv.is_empty() {
                    return Err(ShellError::SyntaxError("|".to_string()));
                }
                stages.push(std::mem::take(&mut current));
            }
            Token::Redir { fd, mode } => {
                let target_tok = iter.next().ok_or(ShellError::SyntaxError("newline".to_string()))?;
                let target_text = match target_tok {
                    Token::Word { text, tilde_leading } => expand_tilde(&text, tilde_leading, home),
                    Token::Pipe => return Err(ShellError::SyntaxError("|".to_string())),
                    Token::Redir { .. } => return Err(ShellError::SyntaxError(">".to_string())),
                };
                if target_text.is_empty() {
                    return Err(ShellError::SyntaxError("newline".to_string()));
                }
                current.redirections.push(Redirection {
                    fd,
                    target: PathBuf::from(target_text),
                    mode,
                });
            }
            Token::Word { text, tilde_leading } => {
                current.argv.push(expand_tilde(&text, tilde_leading, home));
            }
        }
    }

    if current.argv.is_empty() {
        return Err(ShellError::SyntaxError("newline".to_string()));
    }
    stages.push(current);

    Ok(Pipeline { stages })
}
