//! The four views wired to one fetcher and one notification bus.

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::fetcher::DataFetcher;
use crate::notifications::NotificationBus;
use crate::transport::Transport;
use crate::view::{DataView, Phase};
use crate::views::{CountryRevenueView, MonthlySalesView, TopProductsView, TopRegionsView};
use std::sync::Arc;
use tracing::info;

pub struct Dashboard<T> {
    fetcher: Arc<DataFetcher<T>>,
    pub country_revenue: DataView<CountryRevenueView, T>,
    pub top_products: DataView<TopProductsView, T>,
    pub monthly_sales: DataView<MonthlySalesView, T>,
    pub top_regions: DataView<TopRegionsView, T>,
}

/// Phase of every view after a load round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub country_revenue: Phase,
    pub top_products: Phase,
    pub monthly_sales: Phase,
    pub top_regions: Phase,
}

impl LoadReport {
    pub fn failures(&self) -> usize {
        [
            self.country_revenue,
            self.top_products,
            self.monthly_sales,
            self.top_regions,
        ]
        .iter()
        .filter(|p| **p == Phase::Error)
        .count()
    }
}

impl<T: Transport + 'static> Dashboard<T> {
    pub fn new(cfg: &DashboardConfig, transport: T, bus: NotificationBus) -> Result<Self, FetchError> {
        let fetcher = Arc::new(DataFetcher::new(transport, &cfg.api.base_url, bus)?);
        Ok(Self::with_fetcher(cfg, fetcher))
    }

    pub fn with_fetcher(cfg: &DashboardConfig, fetcher: Arc<DataFetcher<T>>) -> Self {
        Self {
            country_revenue: DataView::new(CountryRevenueView::from_config(&cfg.views), fetcher.clone()),
            top_products: DataView::new(TopProductsView::from_config(&cfg.views), fetcher.clone()),
            monthly_sales: DataView::new(MonthlySalesView, fetcher.clone()),
            top_regions: DataView::new(TopRegionsView::from_config(&cfg.views), fetcher.clone()),
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &DataFetcher<T> {
        &self.fetcher
    }

    pub fn bus(&self) -> &NotificationBus {
        self.fetcher.bus()
    }

    /// Loads every view concurrently with its default parameters.
    pub async fn load_all(&self) -> LoadReport {
        tokio::join!(
            self.country_revenue.load().resolve(),
            self.top_products.load().resolve(),
            self.monthly_sales.load().resolve(),
            self.top_regions.load().resolve(),
        );
        let report = self.report();
        info!(
            base_url = %self.fetcher.base_url(),
            failures = report.failures(),
            "dashboard loaded"
        );
        report
    }

    pub fn report(&self) -> LoadReport {
        LoadReport {
            country_revenue: self.country_revenue.phase(),
            top_products: self.top_products.phase(),
            monthly_sales: self.monthly_sales.phase(),
            top_regions: self.top_regions.phase(),
        }
    }
}
