//! Shared scaffolding for builtin unit tests: builds a [`BuiltinContext`]
//! over in-memory buffers so each builtin's test module doesn't repeat it.
#![cfg(test)]

use super::{Builtin, BuiltinContext, BuiltinRegistry};
use crate::history::HistoryBuffer;
use crate::path_resolver::PathList;
use std::path::Path;

pub struct Harness {
    pub registry: BuiltinRegistry,
    pub path_list: PathList,
    pub history: HistoryBuffer,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            registry: BuiltinRegistry::new(),
            path_list: PathList::from_env_value(""),
            history: HistoryBuffer::new(),
        }
    }

    pub fn path_list(path_value: &str) -> Self {
        Self {
            registry: BuiltinRegistry::new(),
            path_list: PathList::from_env_value(path_value),
            history: HistoryBuffer::new(),
        }
    }

    pub fn run(&mut self, builtin: &dyn Builtin, args: &[&str], histfile: Option<&Path>) -> (String, String, i32) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let names = self.registry.names();
        let mut stdin: &[u8] = &[];
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = {
            let mut ctx = BuiltinContext {
                args: &args,
                stdin: &mut stdin,
                stdout: &mut stdout,
                stderr: &mut stderr,
                builtin_names: &names,
                path_list: &self.path_list,
                history: &mut self.history,
                histfile,
            };
            builtin.invoke(&mut ctx)
        };
        (String::from_utf8(stdout).unwrap(), String::from_utf8(stderr).unwrap(), code)
    }
}
