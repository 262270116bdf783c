//! Opens redirection targets and hands back the file descriptors a stage's
//! execution should bind to fd 1/2.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};

use crate::error::ShellError;
use crate::parser::Redirection;
use crate::tokenizer::RedirMode;

pub const SHELL_NAME: &str = "rush";

/// Open every redirection target left-to-right. All targets are opened (to
/// match shell side-effect semantics, e.g. file creation), but only the
/// last file opened for a given fd is kept bound.
pub fn open_redirections(redirs: &[Redirection]) -> Result<HashMap<u32, File>, ShellError> {
    let mut bound = HashMap::new();
    for redir in redirs {
        let file = open_one(redir)?;
        bound.insert(redir.fd, file);
    }
    Ok(bound)
}

fn open_one(redir: &Redirection) -> Result<File, ShellError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    match redir.mode {
        RedirMode::Truncate => {
            options.truncate(true);
        }
        RedirMode::Append => {
            options.append(true);
        }
    }
    options.open(&redir.target).map_err(|reason| ShellError::RedirectFailed {
        shell: SHELL_NAME.to_string(),
        path: redir.target.clone(),
        reason,
    })
}
