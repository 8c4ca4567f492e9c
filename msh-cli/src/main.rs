// This file is part of msh, a POSIX-subset shell implementation.

//! Binary entry point: parses argv, reads the script, evaluates it, exits
//! with its `last_status` (SPEC_FULL.md §6, "CLI surface").

mod startup;

use nix::sys::signal::{self, SigSet, Signal};

use msh_env::Env;
use startup::args::{self, Parse};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let run = match args::parse(args) {
        Ok(Parse::Help) => {
            print!("{}", args::USAGE);
            std::process::exit(0);
        }
        Ok(Parse::Run(run)) => run,
        Err(error) => {
            eprintln!("msh: {error}");
            std::process::exit(2);
        }
    };

    let source = match startup::read_source(&run.source) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("msh: {error}");
            std::process::exit(1);
        }
    };

    let mut env = Env::new_real();
    let status = block_sigchld_around(|| msh_semantics::execute_script(&source, &mut env));
    std::process::exit(status);
}

/// Blocks `SIGCHLD` for the duration of `f`, so that every child is reaped
/// by an explicit `waitpid` in the evaluator rather than racing a signal
/// handler (SPEC_FULL.md §5, "Signal discipline").
fn block_sigchld_around<T>(f: impl FnOnce() -> T) -> T {
    let mut blocked = SigSet::empty();
    blocked.add(Signal::SIGCHLD);
    let mut previous = SigSet::empty();
    let blocked_ok =
        signal::sigprocmask(signal::SigmaskHow::SIG_BLOCK, Some(&blocked), Some(&mut previous))
            .is_ok();

    let result = f();

    if blocked_ok {
        let _ = signal::sigprocmask(signal::SigmaskHow::SIG_SETMASK, Some(&previous), None);
    }
    result
}
