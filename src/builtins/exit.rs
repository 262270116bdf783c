use std::io::Write;

use super::{Builtin, BuiltinContext};

pub struct ExitBuiltin;

impl Builtin for ExitBuiltin {
    fn name(&self) -> &'static str {
        "exit"
    }

    /// Persists history (if `HISTFILE` is configured) and terminates the
    /// process with the given code (default 0). A non-integer argument
    /// exits with code 2 instead.
    fn invoke(&self, ctx: &mut BuiltinContext) -> i32 {
        let code = match ctx.args.first() {
            None => 0,
            Some(arg) => match arg.parse::<i32>() {
                Ok(n) => n,
                Err(_) => {
                    let _ = writeln!(ctx.stderr, "exit: {}: numeric argument required", arg);
                    persist_history(ctx);
                    std::process::exit(2);
                }
            },
        };
        persist_history(ctx);
        std::process::exit(code);
    }
}

fn persist_history(ctx: &mut BuiltinContext) {
    if let Some(path) = ctx.histfile {
        let _ = ctx.history.write_all(path);
    }
}
