use crate::domain::model::{
    ErrorResponse, LineRequest, LineResponse, Page, StationRequest, StationResponse,
};
use crate::utils::error::{Result, SubwayError};
use crate::utils::validation::validate_url;
use reqwest::header::LOCATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Raw outcome of one HTTP exchange.
///
/// Non-2xx statuses are not turned into errors here; callers assert on
/// `status` and `location` directly.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn error(&self) -> Option<ErrorResponse> {
        serde_json::from_str(&self.body).ok()
    }

    /// Id in the last segment of the `Location` header, e.g. `/lines/3` → 3.
    pub fn location_id(&self) -> Option<u64> {
        self.location
            .as_deref()?
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }

    /// Fails with a validation error unless the status matches.
    pub fn expect_status(self, expected: u16) -> Result<Self> {
        if self.status == expected {
            return Ok(self);
        }
        Err(SubwayError::validation(format!(
            "expected HTTP {}, got {}: {}",
            expected, self.status, self.body
        )))
    }
}

#[derive(Debug, Clone)]
pub struct SubwayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SubwayClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| SubwayError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SubwayError::InvalidConfigValueError {
                field: "path".to_string(),
                value: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(status, location = ?location, "Response received");
        Ok(ApiResponse {
            status,
            location,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.http.get(self.url(path)?)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(self.http.post(self.url(path)?).json(body)).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(self.http.put(self.url(path)?).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.http.delete(self.url(path)?)).await
    }

    pub async fn create_station(&self, name: &str) -> Result<ApiResponse> {
        let request = StationRequest {
            name: name.to_string(),
        };
        self.post_json("/stations", &request).await
    }

    /// Creates a station and decodes it, failing unless the server answers 201.
    pub async fn register_station(&self, name: &str) -> Result<StationResponse> {
        self.create_station(name).await?.expect_status(201)?.json()
    }

    pub async fn list_stations(&self) -> Result<ApiResponse> {
        self.get("/stations").await
    }

    pub async fn delete_station(&self, id: u64) -> Result<ApiResponse> {
        self.delete(&format!("/stations/{}", id)).await
    }

    pub async fn create_line(&self, request: &LineRequest) -> Result<ApiResponse> {
        self.post_json("/lines", request).await
    }

    /// Creates a line and decodes it, failing unless the server answers 201.
    pub async fn register_line(&self, request: &LineRequest) -> Result<LineResponse> {
        self.create_line(request).await?.expect_status(201)?.json()
    }

    pub async fn list_lines(&self) -> Result<ApiResponse> {
        self.get("/lines").await
    }

    pub async fn get_line(&self, id: u64) -> Result<ApiResponse> {
        self.get(&format!("/lines/{}", id)).await
    }

    /// `GET /lines/page`, with any extra query parameters appended as given.
    pub async fn lines_page(
        &self,
        page: usize,
        size: usize,
        extra: &[(&str, String)],
    ) -> Result<ApiResponse> {
        let mut url = self.url("/lines/page")?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("page", &page.to_string());
            query.append_pair("size", &size.to_string());
        }
        self.send(self.http.get(url)).await
    }

    pub async fn fetch_page(&self, page: usize, size: usize) -> Result<Page<LineResponse>> {
        self.lines_page(page, size, &[]).await?.expect_status(200)?.json()
    }

    pub async fn update_line(&self, id: u64, request: &LineRequest) -> Result<ApiResponse> {
        self.put_json(&format!("/lines/{}", id), request).await
    }

    pub async fn delete_line(&self, id: u64) -> Result<ApiResponse> {
        self.delete(&format!("/lines/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, location: Option<&str>) -> ApiResponse {
        ApiResponse {
            status,
            location: location.map(str::to_string),
            body: String::new(),
        }
    }

    #[test]
    fn test_location_id() {
        assert_eq!(response(201, Some("/lines/42")).location_id(), Some(42));
        assert_eq!(response(201, Some("/lines/abc")).location_id(), None);
        assert_eq!(response(201, None).location_id(), None);
    }

    #[test]
    fn test_expect_status() {
        assert!(response(204, None).expect_status(204).is_ok());
        assert!(response(404, None).expect_status(204).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(SubwayClient::new("not a url").is_err());
        assert!(SubwayClient::new("ftp://example.com").is_err());
        assert!(SubwayClient::new("http://127.0.0.1:8080").is_ok());
    }
}
