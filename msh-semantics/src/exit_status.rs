// This file is part of msh, a POSIX-subset shell implementation.

//! Mapping a raw [`WaitStatus`] to the `last_status` the evaluator tracks.

use msh_env::system::WaitStatus;

/// Normal exit → low 8 bits of the exit code. Signal termination →
/// `128 + signal_number`. Anything else (stopped/continued, which the core
/// never requests) → `1`.
pub fn from_wait_status(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code & 0xff,
        WaitStatus::Signaled(_, signal) => 128 + signal,
        WaitStatus::Other(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msh_env::system::Pid;

    #[test]
    fn exited_uses_low_byte() {
        let pid = Pid::from_raw(1);
        assert_eq!(from_wait_status(WaitStatus::Exited(pid, 0)), 0);
        assert_eq!(from_wait_status(WaitStatus::Exited(pid, 42)), 42);
        assert_eq!(from_wait_status(WaitStatus::Exited(pid, 256)), 0);
    }

    #[test]
    fn signaled_adds_128() {
        let pid = Pid::from_raw(1);
        assert_eq!(from_wait_status(WaitStatus::Signaled(pid, 9)), 137);
    }

    #[test]
    fn other_is_status_one() {
        let pid = Pid::from_raw(1);
        assert_eq!(from_wait_status(WaitStatus::Other(pid)), 1);
    }
}
