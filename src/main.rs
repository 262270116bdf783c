use rush_shell::config::ShellConfig;
use rush_shell::exec::{self, Shell, EXEC_BUILTIN_FLAG, STAGE_ERROR_FLAG};
use rush_shell::repl;

/// Normal invocation starts the REPL. Two hidden flags let the pipeline
/// executor re-exec this same binary to isolate state-mutating builtins
/// and resolve/spawn failures inside a multi-stage pipeline, instead of
/// raw `fork()` (spec.md Design Notes §9):
///
///   rush --exec-builtin <name> [args...]   run one builtin, then exit
///   rush --stage-error <message> <code>    print message, exit with code
fn main() {
    let mut argv: Vec<String> = std::env::args().collect();
    argv.remove(0);

    match argv.first().map(String::as_str) {
        Some(flag) if flag == EXEC_BUILTIN_FLAG => {
            exec::run_exec_builtin(&argv[1..]);
        }
        Some(flag) if flag == STAGE_ERROR_FLAG => {
            let message = argv.get(1).cloned().unwrap_or_default();
            let code = argv.get(2).cloned().unwrap_or_else(|| "1".to_string());
            exec::run_stage_error(&message, &code);
        }
        _ => {
            let shell = Shell::new(ShellConfig::from_env());
            let code = repl::run(shell);
            std::process::exit(code);
        }
    }
}
