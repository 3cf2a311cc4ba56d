//! DataFetcher - one request, one outcome, one notification
//!
//! Builds the request URL from the view schema and parameters, performs the
//! GET through a [`Transport`], decodes the JSON array and announces the
//! result on the [`NotificationBus`]. Nothing escapes as an error: every
//! failure mode ends up in [`FetchOutcome::Failure`].

use crate::error::FetchError;
use crate::models::MetricRecord;
use crate::notifications::{NotificationBus, NotificationEvent};
use crate::params::RequestParameters;
use crate::schema::ViewSchema;
use crate::transport::Transport;
use tracing::{debug, error, info};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<R> {
    Success(Vec<R>),
    Failure(FetchError),
}

impl<R> FetchOutcome<R> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn records(&self) -> Option<&[R]> {
        match self {
            FetchOutcome::Success(records) => Some(records),
            FetchOutcome::Failure(_) => None,
        }
    }
}

pub struct DataFetcher<T> {
    transport: T,
    base_url: Url,
    bus: NotificationBus,
}

impl<T: Transport> DataFetcher<T> {
    pub fn new(transport: T, base_url: &str, bus: NotificationBus) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(format!("{base_url} cannot be a base URL")));
        }
        Ok(Self {
            transport,
            base_url,
            bus,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `<base>/<endpoint>?<query>`; the base path is kept even without a
    /// trailing slash.
    pub fn build_url<S: ViewSchema>(
        &self,
        schema: &S,
        params: &RequestParameters<S::Field>,
    ) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(schema.endpoint().split('/').filter(|s| !s.is_empty()));
        }

        let query = schema.query(params);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn fetch<S: ViewSchema>(
        &self,
        schema: &S,
        params: &RequestParameters<S::Field>,
    ) -> FetchOutcome<S::Record> {
        match self.try_fetch(schema, params).await {
            Ok(records) => {
                info!(endpoint = schema.endpoint(), records = records.len(), "fetch succeeded");
                self.bus.notify(NotificationEvent::success(schema.success_message()));
                FetchOutcome::Success(records)
            }
            Err(err) => {
                let url = self
                    .build_url(schema, params)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| self.base_url.to_string());
                error!(
                    endpoint = schema.endpoint(),
                    kind = err.kind(),
                    %url,
                    "fetch failed: {err}"
                );
                self.bus.notify(NotificationEvent::error(schema.failure_message()));
                FetchOutcome::Failure(err)
            }
        }
    }

    async fn try_fetch<S: ViewSchema>(
        &self,
        schema: &S,
        params: &RequestParameters<S::Field>,
    ) -> Result<Vec<S::Record>, FetchError> {
        let url = self.build_url(schema, params)?;
        debug!(%url, "GET");

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }
        decode_records(&response.body)
    }
}

/// Decodes a JSON array of records. `null` is treated as an empty array, as
/// the backend encodes empty result sets that way.
pub fn decode_records<R: MetricRecord>(body: &str) -> Result<Vec<R>, FetchError> {
    let records: Option<Vec<R>> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let records = records.unwrap_or_default();

    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|msg| FetchError::Decode(format!("record {index}: {msg}")))?;
    }
    Ok(records)
}
