use std::io::Write;

use super::{Builtin, BuiltinContext};

pub struct PwdBuiltin;

impl Builtin for PwdBuiltin {
    fn name(&self) -> &'static str {
        "pwd"
    }

    /// Writes the current working directory's absolute path.
    fn invoke(&self, ctx: &mut BuiltinContext) -> i32 {
        match std::env::current_dir() {
            Ok(cwd) => {
                let _ = writeln!(ctx.stdout, "{}", cwd.display());
                0
            }
            Err(e) => {
                let _ = writeln!(ctx.stderr, "pwd: {}", e);
                1
            }
        }
    }
}
