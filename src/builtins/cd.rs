use std::io::Write;

use super::{Builtin, BuiltinContext};

pub struct CdBuiltin;

impl Builtin for CdBuiltin {
    fn name(&self) -> &'static str {
        "cd"
    }

    /// Changes the current directory to its single required argument.
    /// `~` is already expanded to `HOME` by the parser (spec.md §4.1,
    /// lifted from a `cd`-specific rule to a uniform word rule).
    fn invoke(&self, ctx: &mut BuiltinContext) -> i32 {
        let Some(target) = ctx.args.first() else {
            let _ = writeln!(ctx.stderr, "cd: missing argument");
            return 2;
        };
        match std::env::set_current_dir(target) {
            Ok(()) => 0,
            Err(_) => {
                let _ = writeln!(ctx.stderr, "cd: {}: No such file or directory", target);
                1
            }
        }
    }
}
