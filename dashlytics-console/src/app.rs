use crate::commands::{Command, ViewKind, HELP};
use crate::render::{render_notifications, render_view};
use dashlytics_core::{Dashboard, DataView, SortField, Transport, ViewSchema};
use tracing::{debug, warn};

pub enum Outcome {
    Print(String),
    Quit,
}

/// Interactive session over the four views; commands act on the active one.
pub struct Console<T> {
    dashboard: Dashboard<T>,
    active: ViewKind,
}

impl<T: Transport + 'static> Console<T> {
    pub fn new(dashboard: Dashboard<T>) -> Self {
        Self {
            dashboard,
            active: ViewKind::CountryRevenue,
        }
    }

    pub fn active(&self) -> ViewKind {
        self.active
    }

    pub fn dashboard(&self) -> &Dashboard<T> {
        &self.dashboard
    }

    pub async fn execute(&mut self, cmd: Command) -> Outcome {
        let text = match cmd {
            Command::Quit => return Outcome::Quit,
            Command::Help => format!("{HELP}\n"),
            Command::View(kind) => {
                self.active = kind;
                self.render(kind)
            }
            Command::All => self.render_all(),
            Command::Notifications => render_notifications(&self.dashboard.bus().visible()),
            Command::Dismiss(id) => {
                if self.dashboard.bus().dismiss(id) {
                    format!("dismissed #{id}\n")
                } else {
                    format!("no visible notification #{id}\n")
                }
            }
            other => match self.active {
                ViewKind::CountryRevenue => apply(&self.dashboard.country_revenue, other).await,
                ViewKind::TopProducts => apply(&self.dashboard.top_products, other).await,
                ViewKind::MonthlySales => apply(&self.dashboard.monthly_sales, other).await,
                ViewKind::TopRegions => apply(&self.dashboard.top_regions, other).await,
            },
        };
        Outcome::Print(text)
    }

    pub fn render(&self, kind: ViewKind) -> String {
        match kind {
            ViewKind::CountryRevenue => show(&self.dashboard.country_revenue),
            ViewKind::TopProducts => show(&self.dashboard.top_products),
            ViewKind::MonthlySales => show(&self.dashboard.monthly_sales),
            ViewKind::TopRegions => show(&self.dashboard.top_regions),
        }
    }

    pub fn render_all(&self) -> String {
        ViewKind::ALL
            .iter()
            .map(|kind| self.render(*kind))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn show<S: ViewSchema, T: Transport + 'static>(view: &DataView<S, T>) -> String {
    render_view(view.schema(), &view.snapshot())
}

/// Applies a view-level command, awaiting the fetch it triggers, and
/// renders the result.
async fn apply<S: ViewSchema, T: Transport + 'static>(view: &DataView<S, T>, cmd: Command) -> String {
    let pending = match cmd {
        Command::Limit(n) => view.set_limit(n),
        Command::Sort(name) => {
            let fallback = view.schema().default_parameters().sort_field();
            if S::Field::from_wire(&name).is_none() {
                warn!(
                    field = %name,
                    default = fallback.wire_name(),
                    "unknown sort field, using the view default"
                );
            }
            view.set_sort_field(S::Field::parse_or(&name, fallback))
        }
        Command::Order(order) => {
            let order = order.unwrap_or_else(|| view.parameters().sort_order().toggled());
            view.set_sort_order(order)
        }
        Command::Next => {
            view.next_page();
            None
        }
        Command::Prev => {
            view.prev_page();
            None
        }
        Command::Retry => Some(view.retry()),
        _ => None,
    };

    match pending {
        Some(fetch) => {
            fetch.resolve().await;
        }
        None => debug!(endpoint = view.schema().endpoint(), "no fetch needed"),
    }
    show(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse;
    use dashlytics_core::{DashboardConfig, Phase};
    use dashlytics_devkit::{fixtures, MockReply, TestHarness};

    async fn run(console: &mut Console<dashlytics_devkit::MockTransport>, line: &str) -> String {
        let cmd = parse(line).unwrap().unwrap();
        match console.execute(cmd).await {
            Outcome::Print(text) => text,
            Outcome::Quit => "<quit>".into(),
        }
    }

    fn console(harness: &TestHarness) -> Console<dashlytics_devkit::MockTransport> {
        harness
            .respond("country-revenue", MockReply::json(&fixtures::country_revenue(25)))
            .respond("top-products", MockReply::json(&fixtures::top_products(5)))
            .respond("monthly-sales", MockReply::json(&fixtures::monthly_sales(3)))
            .respond("top-regions", MockReply::json(&fixtures::top_regions(4)));
        Console::new(harness.dashboard(&DashboardConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_limit_and_paging_on_country_view() {
        let harness = TestHarness::new();
        let mut console = console(&harness);

        let text = run(&mut console, "limit 25").await;
        assert!(text.contains("Page 1 of 3 (25 rows)"));

        run(&mut console, "next").await;
        run(&mut console, "next").await;
        let text = run(&mut console, "next").await;
        assert!(text.contains("Page 3 of 3"));
        assert_eq!(harness.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_falls_back_to_default() {
        let harness = TestHarness::new();
        let mut console = console(&harness);

        run(&mut console, "view regions").await;
        assert_eq!(console.active(), ViewKind::TopRegions);

        run(&mut console, "sort items").await;
        run(&mut console, "sort bogus").await;
        let view = &console.dashboard().top_regions;
        assert_eq!(view.parameters().sort_field().wire_name(), "revenue");
        assert_eq!(view.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_order_toggle_refetches_monthly_sales() {
        let harness = TestHarness::new();
        let mut console = console(&harness);

        run(&mut console, "view monthly").await;
        let text = run(&mut console, "order").await;
        assert!(text.contains("sort=month desc"));

        let request = harness.transport.last_request().unwrap();
        assert_eq!(request.query_value("sortOrder"), Some("desc"));
    }

    #[tokio::test]
    async fn test_session_commands() {
        let harness = TestHarness::new();
        let mut console = console(&harness);

        console.dashboard().load_all().await;
        let text = run(&mut console, "notifications").await;
        assert!(text.contains("fetched successfully"));

        let text = run(&mut console, "dismiss 999").await;
        assert!(text.contains("no visible notification"));

        assert!(run(&mut console, "all").await.contains("Top Regions by Revenue"));
        assert_eq!(run(&mut console, "quit").await, "<quit>");
    }
}
