use std::io::Write;

use super::{Builtin, BuiltinContext};

pub struct TypeBuiltin;

impl Builtin for TypeBuiltin {
    fn name(&self) -> &'static str {
        "type"
    }

    /// For each argument: reports it as a shell builtin, a resolved PATH
    /// executable, or not found. The overall exit code is nonzero if any
    /// argument resolved to neither.
    fn invoke(&self, ctx: &mut BuiltinContext) -> i32 {
        let mut exit_code = 0;
        for name in ctx.args {
            if ctx.builtin_names.contains(&name.as_str()) {
                let _ = writeln!(ctx.stdout, "{} is a shell builtin", name);
            } else if let Some(path) = ctx.path_list.resolve(name) {
                let _ = writeln!(ctx.stdout, "{} is {}", name, path.display());
            } else {
                let _ = writeln!(ctx.stderr, "{}: not found", name);
                exit_code = 1;
            }
        }
        exit_code
    }
}
