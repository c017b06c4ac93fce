//! End-to-end probe scenarios against a fake host.
//!
//! `FakeHost` answers commands the way a small Linux box would, so the probes
//! can be exercised through their public API without touching the network.

use std::cell::RefCell;

use fieldcheck_netprobe::{
    connect, get_gateway, pingtest, pingtest_hard, CommandOutput, CommandRunner, ConnectOutcome,
    FailureReporter, PanicReporter, ProbeError,
};

struct FakeHost {
    reachable: Vec<(&'static str, &'static str)>,
    routes: &'static str,
    profiles: RefCell<String>,
    log: RefCell<Vec<String>>,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            reachable: vec![("wlan0", "192.168.8.1"), ("eth0", "10.0.0.1")],
            routes: "default via 192.168.8.1 dev wlan0 proto dhcp metric 600\n\
                     192.168.8.0/24 dev wlan0 proto kernel scope link\n",
            profiles: RefCell::new(
                "lab:11111111-2222-3333-4444-555555555555:no:802-11-wireless\n".to_string(),
            ),
            log: RefCell::new(Vec::new()),
        }
    }

    fn output(code: i32, stdout: &str) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProbeError> {
        self.log
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));
        match (program, args) {
            ("ping", ["-I", iface, ip, "-c", "1"]) => {
                let ok = self.reachable.iter().any(|(i, a)| i == iface && a == ip);
                Ok(Self::output(if ok { 0 } else { 1 }, ""))
            }
            ("ip", ["route", "show", "dev", "wlan0"]) => Ok(Self::output(0, self.routes)),
            ("ip", ["route", "show", "dev", _]) => Ok(Self::output(0, "")),
            ("nmcli", ["-t", ..]) => Ok(Self::output(0, &self.profiles.borrow())),
            ("nmcli", ["con", "up", "uuid", uuid]) => {
                let updated = self
                    .profiles
                    .borrow()
                    .replace(&format!("{uuid}:no"), &format!("{uuid}:yes"));
                *self.profiles.borrow_mut() = updated;
                Ok(Self::output(0, ""))
            }
            ("nmcli", ["dev", "wifi", "con", ssid, "password", _]) => {
                self.profiles.borrow_mut().push_str(&format!(
                    "{ssid}:99999999-0000-0000-0000-000000000000:yes:802-11-wireless\n"
                ));
                Ok(Self::output(0, ""))
            }
            _ => Err(ProbeError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "unexpected command"),
            }),
        }
    }
}

#[test]
fn gateway_then_ping_it() {
    let host = FakeHost::new();
    let gw = get_gateway(&host, "wlan0", &mut PanicReporter).expect("gateway");
    assert_eq!(gw, "192.168.8.1");
    pingtest_hard(&host, &gw, "wlan0", &mut PanicReporter);
}

#[test]
fn ping_is_bound_to_interface() {
    let host = FakeHost::new();
    assert!(pingtest(&host, "10.0.0.1", "eth0"));
    assert!(!pingtest(&host, "10.0.0.1", "wlan0"));
}

#[test]
#[should_panic(expected = "Getting gateway failed")]
fn interface_without_default_route_fails_hard() {
    let host = FakeHost::new();
    get_gateway(&host, "eth1", &mut PanicReporter);
}

#[test]
fn connect_twice_reuses_the_profile() {
    let host = FakeHost::new();

    let first = connect(&host, "lab", "pw").unwrap();
    assert_eq!(
        first,
        ConnectOutcome::Activated {
            uuid: "11111111-2222-3333-4444-555555555555".into()
        }
    );
    let second = connect(&host, "lab", "pw").unwrap();
    assert!(matches!(second, ConnectOutcome::AlreadyActive { .. }));

    let created = connect(&host, "guest", "pw").unwrap();
    assert_eq!(created, ConnectOutcome::Created);
    let again = connect(&host, "guest", "pw").unwrap();
    assert!(matches!(again, ConnectOutcome::AlreadyActive { .. }));

    let log = host.log.borrow();
    assert_eq!(
        log.iter().filter(|l| l.starts_with("nmcli dev wifi")).count(),
        1
    );
    assert_eq!(
        log.iter().filter(|l| l.starts_with("nmcli con up")).count(),
        1
    );
}

struct CountingReporter(usize);

impl FailureReporter for CountingReporter {
    fn fail(&mut self, _message: &str) {
        self.0 += 1;
    }
}

#[test]
fn custom_reporter_sees_each_failure() {
    let host = FakeHost::new();
    let mut reporter = CountingReporter(0);
    pingtest_hard(&host, "203.0.113.9", "wlan0", &mut reporter);
    assert!(get_gateway(&host, "eth0", &mut reporter).is_none());
    assert_eq!(reporter.0, 2);
}
