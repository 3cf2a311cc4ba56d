/*!
Test harness for the dashboard pipeline

- Mock transport and notification bus wired together
- A recording sink capturing every notification shown
- Expectations on requests per endpoint and notifications per severity
*/

use crate::mock_transport::{MockReply, MockTransport};
use anyhow::Result;
use dashlytics_core::{
    BusSettings, Dashboard, DashboardConfig, DataFetcher, DataView, Notification, NotificationBus,
    NotificationSink, Severity, SinkError, ViewSchema,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub const TEST_BASE_URL: &str = "http://dashlytics.test/api/v1";

/// Sink keeping every notification it was asked to show or dismiss.
#[derive(Default)]
pub struct RecordingSink {
    shown: Mutex<Vec<Notification>>,
    dismissed: Mutex<Vec<u64>>,
}

impl RecordingSink {
    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().clone()
    }

    pub fn dismissed(&self) -> Vec<u64> {
        self.dismissed.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown.lock().iter().map(|n| n.message.clone()).collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.shown
            .lock()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn clear(&self) {
        self.shown.lock().clear();
        self.dismissed.lock().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, notification: &Notification) -> Result<(), SinkError> {
        self.shown.lock().push(notification.clone());
        Ok(())
    }

    fn dismiss(&self, id: u64) -> Result<(), SinkError> {
        self.dismissed.lock().push(id);
        Ok(())
    }
}

#[derive(Debug)]
enum Expectation {
    Requests { endpoint: String, count: usize },
    Notifications { severity: Severity, count: usize },
}

pub struct TestHarness {
    pub transport: MockTransport,
    pub bus: NotificationBus,
    pub sink: Arc<RecordingSink>,
    expectations: Vec<Expectation>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(BusSettings::default())
    }

    pub fn with_settings(settings: BusSettings) -> Self {
        env_logger::try_init().ok();

        let bus = NotificationBus::new(settings);
        let sink = Arc::new(RecordingSink::default());
        bus.add_sink(sink.clone());

        Self {
            transport: MockTransport::new(),
            bus,
            sink,
            expectations: Vec::new(),
        }
    }

    /// Scripts a sticky reply, see [`MockTransport::respond`].
    pub fn respond(&self, endpoint: &str, reply: MockReply) -> &Self {
        self.transport.respond(endpoint, reply);
        self
    }

    pub fn enqueue(&self, endpoint: &str, reply: MockReply) -> &Self {
        self.transport.enqueue(endpoint, reply);
        self
    }

    pub fn fetcher(&self) -> Result<Arc<DataFetcher<MockTransport>>> {
        let fetcher = DataFetcher::new(self.transport.clone(), TEST_BASE_URL, self.bus.clone())?;
        Ok(Arc::new(fetcher))
    }

    pub fn view<S: ViewSchema>(&self, schema: S) -> Result<DataView<S, MockTransport>> {
        Ok(DataView::new(schema, self.fetcher()?))
    }

    pub fn dashboard(&self, cfg: &DashboardConfig) -> Result<Dashboard<MockTransport>> {
        Ok(Dashboard::with_fetcher(cfg, self.fetcher()?))
    }

    pub fn expect_requests(&mut self, endpoint: &str, count: usize) -> &mut Self {
        self.expectations.push(Expectation::Requests {
            endpoint: endpoint.to_string(),
            count,
        });
        self
    }

    /// Counts notifications that reached the sinks (suppressed duplicates excluded).
    pub fn expect_notifications(&mut self, severity: Severity, count: usize) -> &mut Self {
        self.expectations
            .push(Expectation::Notifications { severity, count });
        self
    }

    pub fn verify_expectations(&self) -> Result<()> {
        log::info!("🔍 Verifying {} expectations...", self.expectations.len());

        for expectation in &self.expectations {
            match expectation {
                Expectation::Requests { endpoint, count } => {
                    let actual = self.transport.requests_to(endpoint).len();
                    if actual != *count {
                        anyhow::bail!(
                            "Expectation failed for '{}': expected {} requests, got {}",
                            endpoint,
                            count,
                            actual
                        );
                    }
                }
                Expectation::Notifications { severity, count } => {
                    let actual = self.sink.count(*severity);
                    if actual != *count {
                        anyhow::bail!(
                            "Expectation failed for {:?} notifications: expected {}, got {} ({:?})",
                            severity,
                            count,
                            actual,
                            self.sink.messages()
                        );
                    }
                }
            }
        }

        log::info!("🎉 All expectations verified successfully");
        Ok(())
    }

    pub fn assert_notified(&self, message: &str) -> Result<()> {
        if self.sink.messages().iter().any(|m| m == message) {
            return Ok(());
        }
        anyhow::bail!(
            "Notification '{}' was never shown (shown: {:?})",
            message,
            self.sink.messages()
        );
    }

    pub fn stats(&self) -> HarnessStats {
        HarnessStats {
            requests: self.transport.request_count(),
            notifications_shown: self.sink.shown().len(),
            notifications_suppressed: self.bus.stats().suppressed,
        }
    }

    pub fn reset(&mut self) {
        self.transport.clear();
        self.bus.clear();
        self.sink.clear();
        self.expectations.clear();
        log::info!("🧹 Test harness reset");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessStats {
    pub requests: usize,
    pub notifications_shown: usize,
    pub notifications_suppressed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use dashlytics_core::{Phase, TopRegionsView};

    #[tokio::test]
    async fn test_harness_drives_a_view() {
        let mut harness = TestHarness::new();
        harness.respond("top-regions", MockReply::json(&fixtures::top_regions(5)));
        harness
            .expect_requests("top-regions", 1)
            .expect_notifications(Severity::Success, 1)
            .expect_notifications(Severity::Error, 0);

        let view = harness.view(TopRegionsView::default()).unwrap();
        assert!(view.load().resolve().await);
        assert_eq!(view.phase(), Phase::Ready);

        harness.verify_expectations().unwrap();
        harness
            .assert_notified("Top Regions Revenue fetched successfully!")
            .unwrap();

        let stats = harness.stats();
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.notifications_shown, 1);
    }

    #[tokio::test]
    async fn test_failed_expectation_is_reported() {
        let mut harness = TestHarness::new();
        harness.expect_requests("country-revenue", 2);
        let err = harness.verify_expectations().unwrap_err();
        assert!(err.to_string().contains("country-revenue"));

        harness.reset();
        harness.verify_expectations().unwrap();
    }
}
