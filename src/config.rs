//! Runtime configuration read once from the process environment at
//! startup: `PATH`, `HOME`, `HISTFILE`.

use std::path::PathBuf;

use crate::path_resolver::PathList;

pub struct ShellConfig {
    pub path_list: PathList,
    pub home: Option<PathBuf>,
    pub histfile: Option<PathBuf>,
}

impl ShellConfig {
    pub fn from_env() -> Self {
        let path_list = PathList::from_env_value(&std::env::var("PATH").unwrap_or_default());
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let histfile = std::env::var_os("HISTFILE").map(PathBuf::from);
        Self { path_list, home, histfile }
    }
}
