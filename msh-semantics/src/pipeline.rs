// This file is part of msh, a POSIX-subset shell implementation.

//! Pipeline Engine (SPEC_FULL.md §4.5): N commands joined by `|`.

use msh_env::io::Fd;
use msh_env::Env;
use msh_syntax::{Kinds, Node};

use crate::launcher::{exec_stage_in_child, run_command, wire_inherited_fds};

/// Collects the command-stage children of a `pipeline` node, in source
/// order (non-command named children, if any, are skipped).
fn stages<'a>(pipeline: Node<'a>) -> Vec<Node<'a>> {
    let kinds = Kinds::get();
    pipeline
        .named_children()
        .into_iter()
        .filter(|n| n.symbol() == kinds.command)
        .collect()
}

/// Runs a `pipeline` node with the given inherited descriptors, returning
/// the last stage's mapped exit status.
pub fn run_pipeline(pipeline: Node<'_>, env: &mut Env, in_fd: Fd, out_fd: Fd) -> i32 {
    let stages = stages(pipeline);

    match stages.len() {
        0 => 1,
        1 => run_command(stages[0], env, in_fd, out_fd),
        n => run_multi_stage(&stages, n, env, in_fd, out_fd),
    }
}

fn run_multi_stage(stages: &[Node<'_>], n: usize, env: &mut Env, in_fd: Fd, out_fd: Fd) -> i32 {
    let mut pipes = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        match env.system.pipe() {
            Ok(pair) => pipes.push(pair),
            Err(_) => {
                close_every_pipe_fd(&pipes, env);
                return 1;
            }
        }
    }

    let mut children = Vec::with_capacity(n);
    for (i, stage) in stages.iter().enumerate() {
        let stage_in = if i == 0 { in_fd } else { pipes[i - 1].0 };
        let stage_out = if i == n - 1 { out_fd } else { pipes[i].1 };

        // SAFETY: the evaluator is single-threaded.
        match unsafe { env.system.fork() } {
            Err(_) => {
                close_every_pipe_fd(&pipes, env);
                reap_all(&children, env);
                return 1;
            }
            Ok(msh_env::system::ForkResult::Child) => {
                wire_inherited_fds(env, stage_in, stage_out);
                close_every_pipe_fd(&pipes, env);
                // Also close the outer in_fd/out_fd a redirected_statement
                // may have handed down for the first/last stage — already
                // dup2'd above, so the original copy is redundant. Closing
                // an internal pipe fd a second time here is harmless (the
                // error is ignored).
                if !stage_in.is_none() {
                    let _ = env.system.close(stage_in);
                }
                if !stage_out.is_none() {
                    let _ = env.system.close(stage_out);
                }
                exec_stage_in_child(*stage, env);
            }
            Ok(msh_env::system::ForkResult::Parent { child }) => {
                children.push(child);
            }
        }
    }

    close_every_pipe_fd(&pipes, env);

    let mut last_status = 1;
    for (i, child) in children.iter().enumerate() {
        match env.system.waitpid(*child) {
            Ok(status) if i == children.len() - 1 => {
                last_status = crate::exit_status::from_wait_status(status);
            }
            Ok(_) => {}
            Err(_) if i == children.len() - 1 => last_status = 1,
            Err(_) => {}
        }
    }
    last_status
}

fn close_every_pipe_fd(pipes: &[(Fd, Fd)], env: &mut Env) {
    for (read, write) in pipes {
        let _ = env.system.close(*read);
        let _ = env.system.close(*write);
    }
}

/// Reaps every already-forked child, discarding their statuses. Used when a
/// later pipe/fork call fails partway through launching a pipeline: the
/// stages forked so far are still running (or about to exec) and must not
/// be left as unreaped zombies just because a sibling stage never started.
fn reap_all(children: &[msh_env::system::Pid], env: &mut Env) {
    for child in children {
        let _ = env.system.waitpid(*child);
    }
}
