// This file is part of msh, a POSIX-subset shell implementation.

//! Process Launcher: runs one `command` node (SPEC_FULL.md §4.4).

use std::ffi::CString;

use msh_env::io::Fd;
use msh_env::system::ForkResult;
use msh_env::Env;
use msh_syntax::Node;

use crate::command::build_argv;
use crate::exit_status;
use crate::redir;

/// Runs a `command` node with the given inherited descriptors (`Fd::NONE`
/// meaning "don't touch this end"), returning the mapped exit status.
///
/// `echo` is special-cased to run without forking when it isn't part of a
/// multi-stage pipeline (the caller passes `Fd::NONE`/`Fd::NONE` in that
/// case); [`crate::pipeline`] always forks every stage, `echo` included, so
/// that FD wiring stays uniform across stages.
pub fn run_command(command: Node<'_>, env: &mut Env, in_fd: Fd, out_fd: Fd) -> i32 {
    let own_redirects: Vec<Node<'_>> = command.named_children();
    let planned = redir::plan(&own_redirects, env);

    let argv = match build_argv(command, env) {
        Ok(argv) => argv,
        Err(_) => return 1,
    };

    if in_fd.is_none() && out_fd.is_none() && planned.is_empty() {
        if let Some(builtin) = msh_builtin::lookup(&argv[0]) {
            return builtin.run(env, &argv);
        }
    }

    // SAFETY: the evaluator is single-threaded.
    match unsafe { env.system.fork() } {
        Err(_) => 1,
        Ok(ForkResult::Child) => {
            wire_inherited_fds(env, in_fd, out_fd);
            if !in_fd.is_none() {
                let _ = env.system.close(in_fd);
            }
            if !out_fd.is_none() {
                let _ = env.system.close(out_fd);
            }
            finish_exec(env, &argv, &planned);
        }
        Ok(ForkResult::Parent { child }) => match env.system.waitpid(child) {
            Ok(status) => exit_status::from_wait_status(status),
            Err(_) => 1,
        },
    }
}

/// Dup2s the inherited descriptors onto FD 0/FD 1. Leaves the original
/// `in_fd`/`out_fd` values open — a caller juggling more than these two
/// (namely [`crate::pipeline`], which holds every stage's pipe FDs) is
/// responsible for closing everything afterward; [`run_command`]'s lone
/// caller closes them itself since it only ever has these two.
pub(crate) fn wire_inherited_fds(env: &mut Env, in_fd: Fd, out_fd: Fd) {
    if !in_fd.is_none() {
        let _ = env.system.dup2(in_fd, Fd::STDIN);
    }
    if !out_fd.is_none() {
        let _ = env.system.dup2(out_fd, Fd::STDOUT);
    }
}

/// Plans and execs one pipeline stage directly inside the child
/// [`crate::pipeline`] already forked for it, after the caller has dup2'd
/// `in_fd`/`out_fd` and closed every pipe FD (SPEC_FULL.md §4.5 step 4:
/// "fork; in the child, perform the two dup2s, then close every pipe FD …
/// then hand off to the single-command exec path"). Unlike [`run_command`],
/// this never forks itself — the caller already has.
pub(crate) fn exec_stage_in_child(command: Node<'_>, env: &mut Env) -> ! {
    let own_redirects: Vec<Node<'_>> = command.named_children();
    let planned = redir::plan(&own_redirects, env);
    let argv = match build_argv(command, env) {
        Ok(argv) => argv,
        Err(_) => env.system.exit(1),
    };
    finish_exec(env, &argv, &planned)
}

/// Child-side half of §4.4 step 2, after descriptors are already wired:
/// apply this command's own redirections, then run the built-in or exec.
/// Never returns.
fn finish_exec(env: &mut Env, argv: &[String], planned: &[redir::PlannedRedirect]) -> ! {
    if let Err(error) = redir::apply(planned, env.system.as_mut()) {
        eprintln!("msh: cannot open redirect target: {error}");
        env.system.exit(1);
    }

    if let Some(builtin) = msh_builtin::lookup(&argv[0]) {
        let status = builtin.run(env, argv);
        env.system.exit(status);
    }

    exec(env, argv);
    env.system.exit(127);
}

fn exec(env: &mut Env, argv: &[String]) -> ! {
    let Ok(program) = CString::new(argv[0].as_str()) else {
        env.system.exit(127);
    };
    let Ok(args): Result<Vec<CString>, _> =
        argv.iter().map(|a| CString::new(a.as_str())).collect()
    else {
        env.system.exit(127);
    };

    let _ = if argv[0].contains('/') {
        env.system.execv(&program, &args)
    } else {
        env.system.execvp(&program, &args)
    };
    env.system.exit(127);
}
