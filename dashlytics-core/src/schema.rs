//! View schema: what varies between dashboard views
//!
//! One `DataView` controller implementation serves every view; a schema
//! supplies the endpoint, the record and sort-field types, default request
//! parameters, the wire query, the record ordering and the layout.

use crate::models::MetricRecord;
use crate::params::{RequestParameters, SortField};
use std::cmp::Ordering;

pub trait ViewSchema: Send + Sync + 'static {
    type Record: MetricRecord;
    type Field: SortField;

    /// Heading shown above the view.
    fn title(&self) -> &'static str;

    /// Path relative to the API base URL, e.g. `country-revenue`.
    fn endpoint(&self) -> &'static str;

    fn default_parameters(&self) -> RequestParameters<Self::Field>;

    /// Query pairs sent with the request. Views that take no parameters
    /// return an empty list.
    fn query(&self, params: &RequestParameters<Self::Field>) -> Vec<(&'static str, String)>;

    /// Ascending comparison of two records on `field`.
    fn compare(&self, a: &Self::Record, b: &Self::Record, field: Self::Field) -> Ordering;

    /// Rows per page for table views; chart views show everything.
    fn page_size(&self) -> Option<usize> {
        None
    }

    /// Truncation applied after sorting when the backend ignores `limit`.
    fn client_limit(&self, _params: &RequestParameters<Self::Field>) -> Option<usize> {
        None
    }

    /// Preset limits offered alongside the free-form `limit` input.
    fn limit_presets(&self) -> &'static [u32] {
        &[]
    }

    fn success_message(&self) -> &'static str;

    /// Generic message shown to the user; the real cause is only logged.
    fn failure_message(&self) -> &'static str;

    fn columns(&self) -> &'static [&'static str];

    /// Display cells for one record, aligned with `columns`.
    fn cells(&self, record: &Self::Record) -> Vec<String>;
}
