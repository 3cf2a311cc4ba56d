//! The four dashboard views
//!
//! | View             | Endpoint           | Sent on the wire        | Layout              |
//! |------------------|--------------------|-------------------------|---------------------|
//! | Country Revenue  | `/country-revenue` | `limit`                 | table, paginated    |
//! | Top Products     | `/top-products`    | nothing                 | bar chart, top N    |
//! | Monthly Sales    | `/monthly-sales`   | `sortField`,`sortOrder` | line chart          |
//! | Top Regions      | `/top-regions`     | `limit`                 | bar chart           |

use crate::config::ViewsConf;
use crate::format::{abbreviate, count, currency};
use crate::models::{CountryRevenue, MonthlySales, RegionRevenue, TopProduct};
use crate::params::{RequestParameters, SortField, SortOrder};
use crate::schema::ViewSchema;
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_ROW_LIMIT: u32 = 10;
pub const DEFAULT_TOP_PRODUCTS_LIMIT: u32 = 20;
pub const DEFAULT_REGION_LIMIT: u32 = 30;

/// Preset limits offered by the region chart.
pub const REGION_LIMIT_CHOICES: [u32; 4] = [5, 10, 20, 30];

// ============ COUNTRY REVENUE ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryRevenueField {
    Country,
    Product,
    Revenue,
    Transactions,
}

impl SortField for CountryRevenueField {
    fn all() -> &'static [Self] {
        &[
            CountryRevenueField::Country,
            CountryRevenueField::Product,
            CountryRevenueField::Revenue,
            CountryRevenueField::Transactions,
        ]
    }

    fn wire_name(self) -> &'static str {
        match self {
            CountryRevenueField::Country => "country",
            CountryRevenueField::Product => "product",
            CountryRevenueField::Revenue => "revenue",
            CountryRevenueField::Transactions => "transactions",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CountryRevenueView {
    pub default_limit: u32,
    pub page_size: usize,
}

impl CountryRevenueView {
    pub fn from_config(cfg: &ViewsConf) -> Self {
        Self {
            default_limit: cfg.country_revenue_limit,
            page_size: cfg.page_size.max(1),
        }
    }
}

impl Default for CountryRevenueView {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_ROW_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewSchema for CountryRevenueView {
    type Record = CountryRevenue;
    type Field = CountryRevenueField;

    fn title(&self) -> &'static str {
        "Country Level Revenue"
    }

    fn endpoint(&self) -> &'static str {
        "country-revenue"
    }

    fn default_parameters(&self) -> RequestParameters<Self::Field> {
        // backend already ranks by revenue
        RequestParameters::new(
            i64::from(self.default_limit),
            CountryRevenueField::Revenue,
            SortOrder::Descending,
        )
    }

    fn query(&self, params: &RequestParameters<Self::Field>) -> Vec<(&'static str, String)> {
        vec![("limit", params.limit().to_string())]
    }

    fn compare(&self, a: &CountryRevenue, b: &CountryRevenue, field: Self::Field) -> Ordering {
        match field {
            CountryRevenueField::Country => a.country.cmp(&b.country),
            CountryRevenueField::Product => a.product_name.cmp(&b.product_name),
            CountryRevenueField::Revenue => a.total_revenue.total_cmp(&b.total_revenue),
            CountryRevenueField::Transactions => a.transaction_count.cmp(&b.transaction_count),
        }
    }

    fn page_size(&self) -> Option<usize> {
        Some(self.page_size)
    }

    fn success_message(&self) -> &'static str {
        "Country revenue data fetched successfully!"
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch country revenue data."
    }

    fn columns(&self) -> &'static [&'static str] {
        &["Country", "Product", "Revenue ($)", "Transactions"]
    }

    fn cells(&self, record: &CountryRevenue) -> Vec<String> {
        vec![
            record.country.clone(),
            record.product_name.clone(),
            currency(record.total_revenue),
            count(record.transaction_count),
        ]
    }
}

// ============ TOP PRODUCTS ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopProductsField {
    Product,
    Quantity,
    Stock,
}

impl SortField for TopProductsField {
    fn all() -> &'static [Self] {
        &[TopProductsField::Product, TopProductsField::Quantity, TopProductsField::Stock]
    }

    fn wire_name(self) -> &'static str {
        match self {
            TopProductsField::Product => "product",
            TopProductsField::Quantity => "quantity",
            TopProductsField::Stock => "stock",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopProductsView {
    pub default_limit: u32,
}

impl TopProductsView {
    pub fn from_config(cfg: &ViewsConf) -> Self {
        Self {
            default_limit: cfg.top_products_limit,
        }
    }
}

impl Default for TopProductsView {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_TOP_PRODUCTS_LIMIT,
        }
    }
}

impl ViewSchema for TopProductsView {
    type Record = TopProduct;
    type Field = TopProductsField;

    fn title(&self) -> &'static str {
        "Top Purchased Products"
    }

    fn endpoint(&self) -> &'static str {
        "top-products"
    }

    fn default_parameters(&self) -> RequestParameters<Self::Field> {
        RequestParameters::new(
            i64::from(self.default_limit),
            TopProductsField::Quantity,
            SortOrder::Descending,
        )
    }

    fn query(&self, _params: &RequestParameters<Self::Field>) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn compare(&self, a: &TopProduct, b: &TopProduct, field: Self::Field) -> Ordering {
        match field {
            TopProductsField::Product => a.product_name.cmp(&b.product_name),
            TopProductsField::Quantity => a.total_quantity_sold.cmp(&b.total_quantity_sold),
            TopProductsField::Stock => a.stock_quantity.cmp(&b.stock_quantity),
        }
    }

    fn client_limit(&self, params: &RequestParameters<Self::Field>) -> Option<usize> {
        Some(params.limit() as usize)
    }

    fn success_message(&self) -> &'static str {
        "Top Purchased Products fetched successfully!"
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch Top Purchased Products."
    }

    fn columns(&self) -> &'static [&'static str] {
        &["Product", "Quantity Sold", "Stock Available"]
    }

    fn cells(&self, record: &TopProduct) -> Vec<String> {
        vec![
            record.product_name.clone(),
            count(record.total_quantity_sold),
            count(record.stock_quantity),
        ]
    }
}

// ============ MONTHLY SALES ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlySalesField {
    Month,
    Sales,
}

impl SortField for MonthlySalesField {
    fn all() -> &'static [Self] {
        &[MonthlySalesField::Month, MonthlySalesField::Sales]
    }

    fn wire_name(self) -> &'static str {
        match self {
            MonthlySalesField::Month => "month",
            MonthlySalesField::Sales => "sales",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonthlySalesView;

impl ViewSchema for MonthlySalesView {
    type Record = MonthlySales;
    type Field = MonthlySalesField;

    fn title(&self) -> &'static str {
        "Monthly Sales Volume"
    }

    fn endpoint(&self) -> &'static str {
        "monthly-sales"
    }

    fn default_parameters(&self) -> RequestParameters<Self::Field> {
        // limit is not used by this view
        RequestParameters::new(
            i64::from(DEFAULT_ROW_LIMIT),
            MonthlySalesField::Month,
            SortOrder::Ascending,
        )
    }

    fn query(&self, params: &RequestParameters<Self::Field>) -> Vec<(&'static str, String)> {
        vec![
            ("sortField", params.sort_field().wire_name().to_string()),
            ("sortOrder", params.sort_order().as_wire().to_string()),
        ]
    }

    fn compare(&self, a: &MonthlySales, b: &MonthlySales, field: Self::Field) -> Ordering {
        match field {
            // "YYYY-MM" sorts chronologically as text
            MonthlySalesField::Month => a.month.cmp(&b.month),
            MonthlySalesField::Sales => a.total_quantity_sold.cmp(&b.total_quantity_sold),
        }
    }

    fn success_message(&self) -> &'static str {
        "Monthly Sales Volume fetched successfully!"
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch Monthly Sales Volume."
    }

    fn columns(&self) -> &'static [&'static str] {
        &["Month", "Items Sold", "Revenue"]
    }

    fn cells(&self, record: &MonthlySales) -> Vec<String> {
        vec![
            record.month.clone(),
            count(record.total_quantity_sold),
            abbreviate(record.total_revenue),
        ]
    }
}

// ============ TOP REGIONS ============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopRegionsField {
    Region,
    Revenue,
    Items,
}

impl SortField for TopRegionsField {
    fn all() -> &'static [Self] {
        &[TopRegionsField::Region, TopRegionsField::Revenue, TopRegionsField::Items]
    }

    fn wire_name(self) -> &'static str {
        match self {
            TopRegionsField::Region => "region",
            TopRegionsField::Revenue => "revenue",
            TopRegionsField::Items => "items",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopRegionsView {
    pub default_limit: u32,
}

impl TopRegionsView {
    pub fn from_config(cfg: &ViewsConf) -> Self {
        Self {
            default_limit: cfg.top_regions_limit,
        }
    }
}

impl Default for TopRegionsView {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_REGION_LIMIT,
        }
    }
}

impl ViewSchema for TopRegionsView {
    type Record = RegionRevenue;
    type Field = TopRegionsField;

    fn title(&self) -> &'static str {
        "Top Regions by Revenue"
    }

    fn endpoint(&self) -> &'static str {
        "top-regions"
    }

    fn default_parameters(&self) -> RequestParameters<Self::Field> {
        RequestParameters::new(
            i64::from(self.default_limit),
            TopRegionsField::Revenue,
            SortOrder::Descending,
        )
    }

    fn query(&self, params: &RequestParameters<Self::Field>) -> Vec<(&'static str, String)> {
        vec![("limit", params.limit().to_string())]
    }

    fn compare(&self, a: &RegionRevenue, b: &RegionRevenue, field: Self::Field) -> Ordering {
        match field {
            TopRegionsField::Region => a.region.cmp(&b.region),
            TopRegionsField::Revenue => a.total_revenue.total_cmp(&b.total_revenue),
            TopRegionsField::Items => a.total_items_sold.cmp(&b.total_items_sold),
        }
    }

    fn limit_presets(&self) -> &'static [u32] {
        &REGION_LIMIT_CHOICES
    }

    fn success_message(&self) -> &'static str {
        "Top Regions Revenue fetched successfully!"
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch top regions data."
    }

    fn columns(&self) -> &'static [&'static str] {
        &["Region", "Revenue", "Items Sold"]
    }

    fn cells(&self, record: &RegionRevenue) -> Vec<String> {
        vec![
            record.region.clone(),
            abbreviate(record.total_revenue),
            count(record.total_items_sold),
        ]
    }
}
