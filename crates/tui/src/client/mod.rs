use std::time::Duration;

use api_types::{
    ErrorResponse, Selection,
    record::{NewRecord, RecordCreated, RecordListResponse, RecordQuery, TransactionRecord},
    spending::{CategoriesResponse, NamedRef, SpendingGroupsResponse},
};
use ledger_view::{
    SourceError,
    sources::{CategorySource, RecordMutator, RecordSource, SpendingGroupSource},
};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON client of the ledger service.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|err| SourceError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    /// `records/{id}` with `id` percent-encoded as a single path segment.
    fn record_endpoint(&self, id: &str) -> std::result::Result<Url, SourceError> {
        let mut endpoint = self.endpoint("records")?;
        endpoint
            .path_segments_mut()
            .map_err(|()| SourceError::Transport(format!("{} cannot be a base", self.base_url)))?
            .push(id);
        Ok(endpoint)
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, SourceError> {
        let res = request
            .send()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let path = res.url().path().to_string();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::debug!("{path} answered {status}: {body}");
        Err(error_for_status(status, &path, body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, SourceError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| SourceError::Transport(err.to_string()))
    }
}

fn error_for_status(status: u16, path: &str, body: String) -> SourceError {
    match status {
        401 | 403 => SourceError::Unauthorized,
        404 => SourceError::NotFound(path.to_string()),
        400 | 409 | 422 => SourceError::Validation(body),
        _ => SourceError::Server(body),
    }
}

impl SpendingGroupSource for Client {
    async fn list_spending_groups(&self) -> std::result::Result<Vec<NamedRef>, SourceError> {
        let endpoint = self.endpoint("spendings")?;
        let res: SpendingGroupsResponse = self.send_json(self.http.get(endpoint)).await?;
        Ok(res.spendings)
    }
}

impl CategorySource for Client {
    async fn list_categories(
        &self,
        spending: &Selection,
    ) -> std::result::Result<Vec<NamedRef>, SourceError> {
        let mut endpoint = self.endpoint("categories")?;
        endpoint
            .query_pairs_mut()
            .append_pair("spending_id", spending.as_str());
        let res: CategoriesResponse = self.send_json(self.http.get(endpoint)).await?;
        Ok(res.categories)
    }
}

impl RecordSource for Client {
    async fn list_records(
        &self,
        query: &RecordQuery,
    ) -> std::result::Result<Vec<TransactionRecord>, SourceError> {
        let endpoint = self.endpoint("records/list")?;
        let res: RecordListResponse = self
            .send_json(self.http.post(endpoint).json(query))
            .await?;
        Ok(res.records)
    }
}

impl RecordMutator for Client {
    async fn delete_record(&self, id: &str) -> std::result::Result<(), SourceError> {
        let endpoint = self.record_endpoint(id)?;
        self.send(self.http.delete(endpoint)).await?;
        Ok(())
    }

    async fn create_record(&self, record: NewRecord) -> std::result::Result<String, SourceError> {
        let endpoint = self.endpoint("records")?;
        let res: RecordCreated = self
            .send_json(self.http.post(endpoint).json(&record))
            .await?;
        Ok(res.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_source_errors() {
        assert_eq!(
            error_for_status(401, "/api/records", String::new()),
            SourceError::Unauthorized
        );
        assert_eq!(
            error_for_status(404, "/api/records/r9", String::new()),
            SourceError::NotFound("/api/records/r9".to_string())
        );
        assert_eq!(
            error_for_status(422, "/api/records", "Amount is required".to_string()),
            SourceError::Validation("Amount is required".to_string())
        );
        assert_eq!(
            error_for_status(500, "/api/records", "boom".to_string()),
            SourceError::Server("boom".to_string())
        );
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let client = Client::new("http://127.0.0.1:8080/api").unwrap();
        assert_eq!(
            client.endpoint("records/list").unwrap().as_str(),
            "http://127.0.0.1:8080/api/records/list"
        );
    }

    #[test]
    fn record_ids_stay_in_one_path_segment() {
        let client = Client::new("http://127.0.0.1:8080/api/").unwrap();
        assert_eq!(
            client.record_endpoint("r42").unwrap().as_str(),
            "http://127.0.0.1:8080/api/records/r42"
        );
        assert_eq!(
            client.record_endpoint("a/b?c#d").unwrap().as_str(),
            "http://127.0.0.1:8080/api/records/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::new("not a url"),
            Err(AppError::Terminal(_))
        ));
    }
}
