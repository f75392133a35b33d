//! Non-fatal warning sink.

/// Destination for warnings raised during a scan.
///
/// Malformed comment entries, empty comments, stat failures and the
/// zero-duration guard are reported here while the scan continues. Reporting
/// a warning can never fail the scan.
pub trait Diagnostics {
    fn warn(&mut self, message: &str);
}

/// Default sink forwarding warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Capture sink, mainly useful in tests.
impl Diagnostics for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
