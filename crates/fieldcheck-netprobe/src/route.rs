//! Default gateway lookup from `ip route` output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::report::FailureReporter;
use crate::runner::CommandRunner;

static DEFAULT_VIA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^default\s+via\s+(?P<gw>\S*)\s").expect("static regex")
});

/// Extract the address following `default via` from `ip route` output.
pub fn parse_default_gateway(routes: &str) -> Option<&str> {
    DEFAULT_VIA
        .captures(routes)
        .and_then(|caps| caps.name("gw"))
        .map(|gw| gw.as_str())
}

/// Look up the default gateway of `interface`.
///
/// Calls `reporter.fail` exactly once and returns `None` when the route table
/// has no default route or `ip` could not be run.
pub fn get_gateway(
    runner: &dyn CommandRunner,
    interface: &str,
    reporter: &mut dyn FailureReporter,
) -> Option<String> {
    let routes = match runner.run("ip", &["route", "show", "dev", interface]) {
        Ok(output) => output.stdout,
        Err(e) => {
            tracing::warn!(%interface, error = %e, "ip route could not be run");
            String::new()
        }
    };

    match parse_default_gateway(&routes) {
        Some(gw) => {
            tracing::debug!(%interface, gateway = %gw, "default gateway");
            Some(gw.to_string())
        }
        None => {
            reporter.fail("Getting gateway failed");
            None
        }
    }
}
