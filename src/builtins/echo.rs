use std::io::Write;

use super::{Builtin, BuiltinContext};

pub struct EchoBuiltin;

impl Builtin for EchoBuiltin {
    fn name(&self) -> &'static str {
        "echo"
    }

    /// Writes arguments joined by a single space, followed by a newline.
    /// No options are interpreted.
    fn invoke(&self, ctx: &mut BuiltinContext) -> i32 {
        let line = ctx.args.join(" ");
        let _ = writeln!(ctx.stdout, "{}", line);
        0
    }
}
