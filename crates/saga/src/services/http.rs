//! Helpers shared by the reqwest clients.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::ServiceError;

/// Longest slice of an error body kept in a [`ServiceError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turns a non-2xx response into [`ServiceError::Status`] and decodes the rest.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_once() {
        assert_eq!(
            endpoint("http://localhost:8001", "/flight"),
            "http://localhost:8001/flight"
        );
        assert_eq!(
            endpoint("http://localhost:8001/", "flight"),
            "http://localhost:8001/flight"
        );
    }
}
