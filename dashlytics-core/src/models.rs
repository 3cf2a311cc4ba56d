use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One row of backend-provided business data.
///
/// Integer measures are unsigned so negative counts fail at decode time;
/// floating measures are checked by [`MetricRecord::validate`].
pub trait MetricRecord:
    DeserializeOwned + Serialize + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Floating-point measures as `(field, value)` pairs.
    fn measures(&self) -> Vec<(&'static str, f64)>;

    fn validate(&self) -> Result<(), String> {
        for (field, value) in self.measures() {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "measure `{field}` must be a finite non-negative number, got {value}"
                ));
            }
        }
        Ok(())
    }
}

// GET /country-revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
    pub country: String,
    pub product_name: String,
    pub total_revenue: f64,
    pub transaction_count: u64,
}

// GET /top-products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    pub total_quantity_sold: u64,
    pub stock_quantity: u64,
}

// GET /monthly-sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String, // "YYYY-MM"
    pub total_quantity_sold: u64,
    /// Older backends only report quantities.
    #[serde(default)]
    pub total_revenue: f64,
}

// GET /top-regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub total_revenue: f64,
    #[serde(alias = "total_item_sold")]
    pub total_items_sold: u64,
}

impl MetricRecord for CountryRevenue {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        vec![("total_revenue", self.total_revenue)]
    }
}

impl MetricRecord for TopProduct {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

impl MetricRecord for MonthlySales {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        vec![("total_revenue", self.total_revenue)]
    }
}

impl MetricRecord for RegionRevenue {
    fn measures(&self) -> Vec<(&'static str, f64)> {
        vec![("total_revenue", self.total_revenue)]
    }
}
