//! Payments API HTTP client
//!
//! Talks to the remote personal-finance API: statement parsing, duplicate
//! detection, bulk persistence, and the category/bank reference lists.
//!
//! No request timeout is configured. A request that never resolves leaves
//! the caller suspended; the service has no retry or cancellation policy.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};

use crate::domain::result::{Error, Result};
use crate::domain::{BankAccount, Category, ImportCandidate, PaymentCreate, StatementDialect};
use crate::ports::{PaymentsApi, StatementFile};

/// HTTP client for the payments API
#[derive(Debug)]
pub struct HttpPaymentsApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPaymentsApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::config("API base URL cannot be empty"));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Map transport-level failures to user-facing messages
    fn map_request_error(error: reqwest::Error) -> Error {
        if error.is_connect() {
            Error::api("Unable to connect to the payments API")
        } else {
            Error::api(format!("Request failed: {}", error))
        }
    }

    /// Turn a non-success response into an error, preferring the
    /// server-supplied message when the body carries one.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if let Some(message) = server_message(&body) {
            return Err(Error::api(message));
        }

        Err(map_status(status))
    }
}

/// Extract the server's own error message from a response body, if any
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["detail", "message", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            if !msg.is_empty() {
                return Some(msg.to_string());
            }
        }
    }
    None
}

fn map_status(status: StatusCode) -> Error {
    match status.as_u16() {
        401 => Error::api("Authentication failed. Your API token may be invalid or expired."),
        403 => Error::api("Access denied. Please check your API token permissions."),
        404 => Error::api("API resource not found."),
        413 => Error::api("The statement file is too large."),
        422 => Error::api("The server could not parse the uploaded statement."),
        429 => Error::api("Rate limit exceeded. Please wait a moment and try again."),
        code => Error::api(format!("API error: HTTP {}", code)),
    }
}

#[async_trait]
impl PaymentsApi for HttpPaymentsApi {
    async fn import_statement(
        &self,
        file: &StatementFile,
        dialect: StatementDialect,
    ) -> Result<Vec<ImportCandidate>> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")
            .map_err(|e| Error::api(format!("Invalid upload: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("source", dialect.as_str());

        let response = self
            .request(reqwest::Method::POST, "payments/import")
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse import response: {}", e)))
    }

    async fn create_payments_bulk(&self, payments: &[PaymentCreate]) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, "payments/bulk")
            .json(payments)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let response = self
            .request(reqwest::Method::GET, "categories/")
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse categories response: {}", e)))
    }

    async fn list_banks(&self) -> Result<Vec<BankAccount>> {
        let response = self
            .request(reqwest::Method::GET, "banks/")
            .send()
            .await
            .map_err(Self::map_request_error)?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse banks response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_empty_base_url() {
        let result = HttpPaymentsApi::new("", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpPaymentsApi::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(api.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"detail": "unsupported statement layout"}"#),
            Some("unsupported statement layout".to_string())
        );
        assert_eq!(
            server_message(r#"{"error": "boom"}"#),
            Some("boom".to_string())
        );
        assert_eq!(server_message(r#"{"detail": ""}"#), None);
        assert_eq!(server_message("<html>gateway error</html>"), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(map_status(StatusCode::UNAUTHORIZED)
            .to_string()
            .contains("Authentication failed"));
        assert!(map_status(StatusCode::TOO_MANY_REQUESTS)
            .to_string()
            .contains("Rate limit"));
        assert!(map_status(StatusCode::BAD_GATEWAY)
            .to_string()
            .contains("HTTP 502"));
    }
}
