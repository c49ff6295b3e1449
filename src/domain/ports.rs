use crate::domain::model::{Line, LineDraft, Station};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence port for lines.
///
/// Implementations own the name-uniqueness invariant: `save` and `update`
/// must reject a name already held by another line as part of the same
/// atomic write, returning `SubwayError::DuplicateNameError`.
#[async_trait]
pub trait LineRepository: Send + Sync {
    async fn save(&self, draft: LineDraft) -> Result<Line>;
    async fn find_all(&self) -> Result<Vec<Line>>;
    /// Lines ordered by id, `limit` of them starting at `offset`, plus the total count.
    async fn find_page(&self, offset: usize, limit: usize) -> Result<(Vec<Line>, usize)>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Line>>;
    /// Returns `SubwayError::NotFoundError` when `id` is absent.
    async fn update(&self, id: u64, draft: LineDraft) -> Result<Line>;
    /// Returns whether a line was removed.
    async fn delete_by_id(&self, id: u64) -> Result<bool>;
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn save(&self, name: String) -> Result<Station>;
    async fn find_all(&self) -> Result<Vec<Station>>;
    async fn find_by_id(&self, id: u64) -> Result<Option<Station>>;
    async fn delete_by_id(&self, id: u64) -> Result<bool>;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn default_page_size(&self) -> usize;
    fn max_page_size(&self) -> usize;
    fn log_level(&self) -> &str;
    fn json_logs(&self) -> bool;
}
