use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: u64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

/// Validated line fields, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    pub name: String,
    pub color: String,
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u64,
}

/// Request body for `POST /lines` and `PUT /lines/{id}`.
///
/// Numeric fields accept both JSON numbers and numeric strings, so
/// `{"distance": "10"}` and `{"distance": 10}` are equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    #[serde(deserialize_with = "number_or_string")]
    pub up_station_id: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub down_station_id: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub distance: i64,
}

impl LineRequest {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        up_station_id: u64,
        down_station_id: u64,
        distance: i64,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            up_station_id,
            down_station_id,
            distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub id: u64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
            created_date: station.created_date,
            modified_date: station.modified_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u64,
    /// Up station first, then down station. A station deleted after the line
    /// was created is left out.
    pub stations: Vec<StationSummary>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl LineResponse {
    pub fn new(line: Line, stations: Vec<StationSummary>) -> Self {
        Self {
            id: line.id,
            name: line.name,
            color: line.color,
            up_station_id: line.up_station_id,
            down_station_id: line.down_station_id,
            distance: line.distance,
            stations,
            created_date: line.created_date,
            modified_date: line.modified_date,
        }
    }
}

/// Body returned with every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn of(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Index of the first element, or `None` when it does not fit in `usize`.
    pub fn offset(&self) -> Option<usize> {
        self.page.checked_mul(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: usize,
    pub page_size: usize,
    pub offset: usize,
    pub paged: bool,
    pub unpaged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_elements: usize,
    pub total_pages: usize,
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };
        let number_of_elements = content.len();

        Self {
            pageable: Pageable {
                page_number: request.page,
                page_size: request.size,
                offset: request.offset().unwrap_or(usize::MAX),
                paged: true,
                unpaged: false,
            },
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            number_of_elements,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            empty: number_of_elements == 0,
            content,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_request_accepts_string_numbers() {
        let request: LineRequest = serde_json::from_value(serde_json::json!({
            "name": "신분당선",
            "color": "bg-red-600",
            "upStationId": "1",
            "downStationId": 2,
            "distance": "10"
        }))
        .unwrap();

        assert_eq!(request, LineRequest::new("신분당선", "bg-red-600", 1, 2, 10));
    }

    #[test]
    fn test_line_request_rejects_non_numeric_strings() {
        let result: std::result::Result<LineRequest, _> =
            serde_json::from_value(serde_json::json!({
                "name": "신분당선",
                "color": "bg-red-600",
                "upStationId": "gangnam",
                "downStationId": 2,
                "distance": 10
            }));
        assert!(result.is_err());
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![0; 8], PageRequest::of(5, 8), 100);

        assert_eq!(page.pageable.page_number, 5);
        assert_eq!(page.pageable.offset, 40);
        assert_eq!(page.total_pages, 13);
        assert!(!page.first);
        assert!(!page.last);
        assert!(!page.empty);
    }

    #[test]
    fn test_page_beyond_last() {
        let page: Page<u64> = Page::new(vec![], PageRequest::of(20, 10), 100);

        assert_eq!(page.total_elements, 100);
        assert_eq!(page.total_pages, 10);
        assert!(page.last);
        assert!(page.empty);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec![1u64], PageRequest::of(0, 10), 1);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["pageable"]["pageNumber"], 0);
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["numberOfElements"], 1);
    }
}
