/*!
Fixture builders for the four backend endpoints

Records are built from the core model types, then turned into the JSON the
backend would send. `raw` variants reproduce backend quirks (spellings,
missing fields, `null` bodies).
*/

use dashlytics_core::{CountryRevenue, MonthlySales, RegionRevenue, TopProduct};
use serde_json::{json, Value};

const COUNTRIES: [&str; 8] = [
    "United States",
    "Germany",
    "France",
    "Japan",
    "Brazil",
    "India",
    "Canada",
    "Australia",
];

/// `n` rows with strictly decreasing revenue: row 0 is the top earner.
pub fn country_revenue(n: usize) -> Vec<CountryRevenue> {
    (0..n)
        .map(|i| CountryRevenue {
            country: format!("{} {}", COUNTRIES[i % COUNTRIES.len()], i / COUNTRIES.len() + 1),
            product_name: format!("Product {i:03}"),
            total_revenue: 1_000_000.0 - (i as f64) * 1_250.5,
            transaction_count: 500 - i as u64 % 500,
        })
        .collect()
}

pub fn top_product(name: &str, quantity: u64, stock: u64) -> TopProduct {
    TopProduct {
        product_name: name.to_string(),
        total_quantity_sold: quantity,
        stock_quantity: stock,
    }
}

/// `n` products in ascending quantity order, so client sorting is visible.
pub fn top_products(n: usize) -> Vec<TopProduct> {
    (0..n)
        .map(|i| top_product(&format!("Product {i:03}"), (i as u64 + 1) * 10, 100 - i as u64 % 100))
        .collect()
}

/// Consecutive months starting at `2024-01`.
pub fn monthly_sales(months: usize) -> Vec<MonthlySales> {
    (0..months)
        .map(|i| MonthlySales {
            month: format!("{}-{:02}", 2024 + i / 12, i % 12 + 1),
            total_quantity_sold: 100 + (i as u64 * 37) % 250,
            total_revenue: 25_000.0 + (i as f64) * 1_500.0,
        })
        .collect()
}

/// `n` regions with strictly decreasing revenue.
pub fn top_regions(n: usize) -> Vec<RegionRevenue> {
    (0..n)
        .map(|i| RegionRevenue {
            region: format!("Region {i:02}"),
            total_revenue: 5_000_000.0 / (i as f64 + 1.0),
            total_items_sold: 10_000 - i as u64 * 10,
        })
        .collect()
}

/// Regions as the backend actually spells them (`total_item_sold`).
pub fn raw_regions_backend_spelling(n: usize) -> Value {
    Value::Array(
        top_regions(n)
            .into_iter()
            .map(|r| {
                json!({
                    "region": r.region,
                    "total_revenue": r.total_revenue,
                    "total_item_sold": r.total_items_sold,
                })
            })
            .collect(),
    )
}

/// Monthly rows without the `total_revenue` column.
pub fn raw_monthly_quantities_only(months: usize) -> Value {
    Value::Array(
        monthly_sales(months)
            .into_iter()
            .map(|m| json!({ "month": m.month, "total_quantity_sold": m.total_quantity_sold }))
            .collect(),
    )
}

/// A body that is valid JSON but not an array of records.
pub fn raw_error_object() -> Value {
    json!({ "error": "database unavailable" })
}
