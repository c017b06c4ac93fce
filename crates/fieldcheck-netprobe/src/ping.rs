//! Single-shot ICMP reachability through the system `ping`.

use crate::report::FailureReporter;
use crate::runner::CommandRunner;

/// Send one echo request to `ip` from `interface`.
///
/// Returns `true` iff `ping` exits with status 0. A `ping` that cannot be
/// started counts as unreachable.
pub fn pingtest(runner: &dyn CommandRunner, ip: &str, interface: &str) -> bool {
    match runner.run("ping", &["-I", interface, ip, "-c", "1"]) {
        Ok(output) => {
            let ok = output.success();
            tracing::debug!(%ip, %interface, code = ?output.code, ok, "ping finished");
            ok
        }
        Err(e) => {
            tracing::warn!(%ip, %interface, error = %e, "ping could not be run");
            false
        }
    }
}

/// Like [`pingtest`], but reports a failed ping to `reporter`.
pub fn pingtest_hard(
    runner: &dyn CommandRunner,
    ip: &str,
    interface: &str,
    reporter: &mut dyn FailureReporter,
) {
    if !pingtest(runner, ip, interface) {
        reporter.fail(&format!(
            "Ping on interface {interface} to ip {ip} failed"
        ));
    }
}
