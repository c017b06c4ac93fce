/// Receives hard-fail notifications from probes.
///
/// A test harness implements this to turn a failed probe into a failed test.
pub trait FailureReporter {
    fn fail(&mut self, message: &str);
}

/// Panics with the failure message, the way a test assertion does.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn fail(&mut self, message: &str) {
        panic!("{message}");
    }
}

/// Collects messages instead of aborting.
impl FailureReporter for Vec<String> {
    fn fail(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
