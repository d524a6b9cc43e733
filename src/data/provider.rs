//! Sources of geolocated property records

use crate::data::property::PropertyGeoRecord;
use crate::{MapError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Yields the records the map renders.
///
/// Implementations may fail or return an empty list; both are ordinary
/// outcomes for the map. Records missing coordinates are allowed and are
/// filtered out by the caller.
#[async_trait]
pub trait GeoDataProvider: Send + Sync {
    async fn fetch_properties(&self, max_count: Option<usize>) -> Result<Vec<PropertyGeoRecord>>;
}

/// In-memory provider whose response can be swapped at runtime
pub struct StaticProvider {
    response: Mutex<std::result::Result<Vec<PropertyGeoRecord>, String>>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(records: Vec<PropertyGeoRecord>) -> Self {
        Self {
            response: Mutex::new(Ok(records)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every fetch fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(Err(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_records(&self, records: Vec<PropertyGeoRecord>) {
        if let Ok(mut response) = self.response.lock() {
            *response = Ok(records);
        }
    }

    pub fn set_failure(&self, message: impl Into<String>) {
        if let Ok(mut response) = self.response.lock() {
            *response = Err(message.into());
        }
    }

    /// Number of fetches issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoDataProvider for StaticProvider {
    async fn fetch_properties(&self, max_count: Option<usize>) -> Result<Vec<PropertyGeoRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self
            .response
            .lock()
            .map_err(|_| MapError::DataFetch("provider state poisoned".into()))?;

        match &*response {
            Ok(records) => {
                let limit = max_count.unwrap_or(records.len());
                Ok(records.iter().take(limit).cloned().collect())
            }
            Err(message) => Err(MapError::DataFetch(message.clone())),
        }
    }
}

/// Fetches a JSON array of records from a REST endpoint
pub struct HttpGeoDataProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoDataProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GeoDataProvider for HttpGeoDataProvider {
    async fn fetch_properties(&self, max_count: Option<usize>) -> Result<Vec<PropertyGeoRecord>> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(limit) = max_count {
            request = request.query(&[("limit", limit)]);
        }

        #[cfg(feature = "debug")]
        log::debug!("Fetching properties from {} (limit {:?})", self.endpoint, max_count);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::DataFetch(format!(
                "{} responded with HTTP {}",
                self.endpoint, status
            )));
        }

        let body = response.text().await?;
        let records: Vec<PropertyGeoRecord> = serde_json::from_str(&body)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::property::Currency;

    fn record(id: i64) -> PropertyGeoRecord {
        PropertyGeoRecord {
            id,
            title: format!("Depto {id}"),
            price: 90_000.0,
            currency: Currency::Usd,
            latitude: Some(-34.6),
            longitude: Some(-58.4),
            property_type: "apartment".into(),
            operation_type: "rent".into(),
            images: Vec::new(),
            status: "available".into(),
        }
    }

    #[tokio::test]
    async fn test_static_provider_limits_and_counts() {
        let provider = StaticProvider::new((1..=5).map(record).collect());

        let all = provider.fetch_properties(None).await.unwrap();
        let some = provider.fetch_properties(Some(2)).await.unwrap();

        assert_eq!(all.len(), 5);
        assert_eq!(some.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_static_provider_failure_switch() {
        let provider = StaticProvider::failing("backend down");
        let err = provider.fetch_properties(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Data fetch error: backend down");

        provider.set_records(vec![record(1)]);
        assert_eq!(provider.fetch_properties(None).await.unwrap().len(), 1);
    }

    #[test]
    fn test_http_provider_endpoint() {
        let provider = HttpGeoDataProvider::new("https://api.example.com/properties");
        assert_eq!(provider.endpoint(), "https://api.example.com/properties");
    }
}
