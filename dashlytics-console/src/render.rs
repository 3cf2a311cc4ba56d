use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dashlytics_core::{Notification, Phase, Severity, SortField, ViewSchema, ViewSnapshot};

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Loading => "loading",
        Phase::Ready => "ready",
        Phase::Error => "error",
    }
}

/// Title line, table and pagination footer for one view.
pub fn render_view<S: ViewSchema>(
    schema: &S,
    snap: &ViewSnapshot<S::Record, S::Field>,
) -> String {
    let params = &snap.parameters;
    let mut out = format!(
        "{} [{}] sort={} {} limit={}\n",
        schema.title(),
        phase_label(snap.phase),
        params.sort_field().wire_name(),
        params.sort_order().as_wire(),
        params.limit(),
    );

    if snap.phase == Phase::Error {
        // cause is in the logs
        out.push_str("last fetch failed, showing previous data (type `retry`)\n");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            schema
                .columns()
                .iter()
                .map(|c| Cell::new(c).fg(Color::White))
                .collect::<Vec<_>>(),
        );

    if snap.display_rows.is_empty() {
        table.add_row(vec![Cell::new("[no data]").fg(Color::DarkGrey)]);
    }
    for record in &snap.display_rows {
        table.add_row(schema.cells(record));
    }
    out.push_str(&table.to_string());
    out.push('\n');

    let presets = schema.limit_presets();
    if !presets.is_empty() {
        let list = presets.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
        out.push_str(&format!("limit presets: {list}\n"));
    }

    if schema.page_size().is_some() {
        out.push_str(&format!(
            "Page {} of {} ({} rows)\n",
            snap.current_page, snap.total_pages, snap.total_records
        ));
    }
    out
}

pub fn notification_line(notification: &Notification) -> String {
    let icon = match notification.severity {
        Severity::Success => "✅",
        Severity::Error => "❌",
    };
    format!("{icon} #{} {}", notification.id, notification.message)
}

pub fn render_notifications(visible: &[Notification]) -> String {
    if visible.is_empty() {
        return "no notifications\n".to_string();
    }
    visible
        .iter()
        .map(|n| notification_line(n) + "\n")
        .collect()
}
