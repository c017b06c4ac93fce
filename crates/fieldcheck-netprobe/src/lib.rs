//! Network probe helpers for integration tests.
//!
//! Every probe shells out to a system tool through a [`CommandRunner`] and
//! parses its text output into a typed result:
//! - **Reachability**: `ping -I <iface> <ip> -c 1` ([`ping`])
//! - **Wi-Fi profiles**: `nmcli` listing, activation and creation ([`nmcli`])
//! - **Default gateway**: `ip route show dev <iface>` ([`route`])
//!
//! Hard-failing variants report through a [`FailureReporter`] instead of
//! returning a value, so a test harness can turn them into assertion failures.

pub mod error;
pub mod nmcli;
pub mod ping;
pub mod report;
pub mod route;
pub mod runner;

pub use error::ProbeError;
pub use nmcli::{connect, get_known, parse_known, ConnectOutcome, KnownNetwork};
pub use ping::{pingtest, pingtest_hard};
pub use report::{FailureReporter, PanicReporter};
pub use route::{get_gateway, parse_default_gateway};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
