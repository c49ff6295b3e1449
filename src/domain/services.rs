use crate::domain::model::{
    Line, LineDraft, LineRequest, LineResponse, Page, PageRequest, StationResponse,
    StationSummary,
};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::utils::error::{Result, SubwayError};
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_size: usize,
    pub max_size: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PaginationSettings {
    /// Resolves optional query values into a page request.
    ///
    /// Missing values fall back to page 0 and the default size; sizes above
    /// the maximum are clamped. A size of zero is rejected.
    pub fn resolve(&self, page: Option<usize>, size: Option<usize>) -> Result<PageRequest> {
        let size = size.unwrap_or(self.default_size);
        if size == 0 {
            return Err(SubwayError::validation("Page size must be at least 1"));
        }
        Ok(PageRequest::of(page.unwrap_or(0), size.min(self.max_size)))
    }
}

#[derive(Clone)]
pub struct LineService {
    lines: Arc<dyn LineRepository>,
    stations: Arc<dyn StationRepository>,
    pagination: PaginationSettings,
}

impl LineService {
    pub fn new(
        lines: Arc<dyn LineRepository>,
        stations: Arc<dyn StationRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            lines,
            stations,
            pagination,
        }
    }

    pub fn pagination(&self) -> PaginationSettings {
        self.pagination
    }

    pub async fn create(&self, request: LineRequest) -> Result<LineResponse> {
        let draft = self.validate(request).await?;
        let line = self.lines.save(draft).await?;
        tracing::info!(line_id = line.id, name = %line.name, "Line created");
        self.to_response(line).await
    }

    pub async fn list(&self) -> Result<Vec<LineResponse>> {
        let lines = self.lines.find_all().await?;
        let mut responses = Vec::with_capacity(lines.len());
        for line in lines {
            responses.push(self.to_response(line).await?);
        }
        Ok(responses)
    }

    pub async fn list_page(&self, request: PageRequest) -> Result<Page<LineResponse>> {
        // 超出 usize 範圍的 offset 一定落在最後一頁之後
        let (lines, total) = match request.offset() {
            Some(offset) => self.lines.find_page(offset, request.size).await?,
            None => (Vec::new(), self.lines.find_all().await?.len()),
        };

        let mut content = Vec::with_capacity(lines.len());
        for line in lines {
            content.push(self.to_response(line).await?);
        }
        tracing::debug!(
            page = request.page,
            size = request.size,
            total,
            returned = content.len(),
            "Line page resolved"
        );
        Ok(Page::new(content, request, total))
    }

    pub async fn get(&self, id: u64) -> Result<LineResponse> {
        let line = self
            .lines
            .find_by_id(id)
            .await?
            .ok_or(SubwayError::NotFoundError { resource: "Line", id })?;
        self.to_response(line).await
    }

    /// Fails with `NotFoundError` unless a line with `id` exists.
    pub async fn ensure_exists(&self, id: u64) -> Result<()> {
        if self.lines.find_by_id(id).await?.is_none() {
            return Err(SubwayError::NotFoundError { resource: "Line", id });
        }
        Ok(())
    }

    pub async fn update(&self, id: u64, request: LineRequest) -> Result<LineResponse> {
        self.ensure_exists(id).await?;
        let draft = self.validate(request).await?;
        let line = self.lines.update(id, draft).await?;
        tracing::info!(line_id = id, name = %line.name, "Line updated");
        self.to_response(line).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.lines.delete_by_id(id).await? {
            return Err(SubwayError::NotFoundError { resource: "Line", id });
        }
        tracing::info!(line_id = id, "Line deleted");
        Ok(())
    }

    async fn validate(&self, request: LineRequest) -> Result<LineDraft> {
        if request.name.trim().is_empty() {
            return Err(SubwayError::validation("Line name cannot be empty"));
        }
        if request.color.trim().is_empty() {
            return Err(SubwayError::validation("Line color cannot be empty"));
        }
        if request.distance <= 0 {
            return Err(SubwayError::validation(format!(
                "Distance must be positive, got {}",
                request.distance
            )));
        }
        if request.up_station_id == request.down_station_id {
            return Err(SubwayError::validation(
                "Up and down stations must be different",
            ));
        }
        for station_id in [request.up_station_id, request.down_station_id] {
            if self.stations.find_by_id(station_id).await?.is_none() {
                return Err(SubwayError::validation(format!(
                    "Station {} does not exist",
                    station_id
                )));
            }
        }

        Ok(LineDraft {
            name: request.name.trim().to_string(),
            color: request.color.trim().to_string(),
            up_station_id: request.up_station_id,
            down_station_id: request.down_station_id,
            distance: request.distance as u64,
        })
    }

    async fn to_response(&self, line: Line) -> Result<LineResponse> {
        let mut stations = Vec::with_capacity(2);
        for station_id in [line.up_station_id, line.down_station_id] {
            if let Some(station) = self.stations.find_by_id(station_id).await? {
                stations.push(StationSummary {
                    id: station.id,
                    name: station.name,
                });
            }
        }
        Ok(LineResponse::new(line, stations))
    }
}

#[derive(Clone)]
pub struct StationService {
    stations: Arc<dyn StationRepository>,
}

impl StationService {
    pub fn new(stations: Arc<dyn StationRepository>) -> Self {
        Self { stations }
    }

    pub async fn create(&self, name: String) -> Result<StationResponse> {
        if name.trim().is_empty() {
            return Err(SubwayError::validation("Station name cannot be empty"));
        }
        let station = self.stations.save(name.trim().to_string()).await?;
        tracing::info!(station_id = station.id, name = %station.name, "Station created");
        Ok(station.into())
    }

    pub async fn list(&self) -> Result<Vec<StationResponse>> {
        let stations = self.stations.find_all().await?;
        Ok(stations.into_iter().map(StationResponse::from).collect())
    }

    pub async fn get(&self, id: u64) -> Result<StationResponse> {
        self.stations
            .find_by_id(id)
            .await?
            .map(StationResponse::from)
            .ok_or(SubwayError::NotFoundError {
                resource: "Station",
                id,
            })
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        if !self.stations.delete_by_id(id).await? {
            return Err(SubwayError::NotFoundError {
                resource: "Station",
                id,
            });
        }
        tracing::info!(station_id = id, "Station deleted");
        Ok(())
    }
}
