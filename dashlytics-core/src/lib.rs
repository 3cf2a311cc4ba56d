/*!
# Dashlytics Core - client-side data pipeline for the sales dashboard

- `format` : compact and currency display strings
- `notifications` : de-duplicating, capacity-bounded notification bus
- `fetcher` : one request, one outcome, one notification
- `view` : generic per-view controller (state machine + async handle)
- `views` : the four dashboard views (country revenue, top products, monthly sales, top regions)
*/

pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod models;
pub mod notifications;
pub mod params;
pub mod schema;
pub mod state;
pub mod transport;
pub mod view;
pub mod views;

pub use config::{load_config, load_config_from, DashboardConfig};
pub use dashboard::{Dashboard, LoadReport};
pub use error::{ConfigError, FetchError, SinkError};
pub use fetcher::{decode_records, DataFetcher, FetchOutcome};
pub use format::{abbreviate, count, currency, try_abbreviate};
pub use models::{CountryRevenue, MetricRecord, MonthlySales, RegionRevenue, TopProduct};
pub use notifications::{
    BusSettings, BusStats, Notification, NotificationBus, NotificationEvent, NotificationSink, Severity,
};
pub use params::{RequestParameters, SortField, SortOrder};
pub use schema::ViewSchema;
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use view::{DataView, FetchTicket, PendingFetch, Phase, Trigger, ViewSnapshot, ViewState};
pub use views::{
    CountryRevenueField, CountryRevenueView, MonthlySalesField, MonthlySalesView, TopProductsField,
    TopProductsView, TopRegionsField, TopRegionsView,
};
