use crate::render::notification_line;
use dashlytics_core::{Notification, NotificationSink, SinkError};
use std::io::Write;

/// Prints notifications to stdout as they appear. Dismissals are silent.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show(&self, notification: &Notification) -> Result<(), SinkError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", notification_line(notification)).map_err(|e| SinkError(e.to_string()))
    }
}
