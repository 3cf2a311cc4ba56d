/*!
# Dashlytics DevKit - test support for the dashboard pipeline

- Scripted mock transport, no backend needed
- Fixture builders for the four endpoints
- Test harness with expectations on requests and notifications
*/

pub mod fixtures;
pub mod mock_transport;
pub mod test_utils;

pub use mock_transport::{MockReply, MockTransport, RecordedRequest};
pub use test_utils::{HarnessStats, RecordingSink, TestHarness, TEST_BASE_URL};
