use crate::domain::model::{Line, LineDraft, Station};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::utils::error::{Result, SubwayError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Id-ordered table with a never-reused id sequence.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLineRepository {
    table: RwLock<Table<Line>>,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique_line_name(table: &Table<Line>, name: &str, except: Option<u64>) -> Result<()> {
    let taken = table
        .rows
        .values()
        .any(|line| line.name == name && Some(line.id) != except);

    if taken {
        return Err(SubwayError::DuplicateNameError {
            resource: "Line",
            name: name.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl LineRepository for InMemoryLineRepository {
    async fn save(&self, draft: LineDraft) -> Result<Line> {
        let mut table = self.table.write().await;
        ensure_unique_line_name(&table, &draft.name, None)?;

        let now = Utc::now();
        let line = Line {
            id: table.allocate_id(),
            name: draft.name,
            color: draft.color,
            up_station_id: draft.up_station_id,
            down_station_id: draft.down_station_id,
            distance: draft.distance,
            created_date: now,
            modified_date: now,
        };
        table.rows.insert(line.id, line.clone());
        Ok(line)
    }

    async fn find_all(&self) -> Result<Vec<Line>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_page(&self, offset: usize, limit: usize) -> Result<(Vec<Line>, usize)> {
        let table = self.table.read().await;
        let content = table
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((content, table.rows.len()))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Line>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn update(&self, id: u64, draft: LineDraft) -> Result<Line> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Err(SubwayError::NotFoundError { resource: "Line", id });
        }
        ensure_unique_line_name(&table, &draft.name, Some(id))?;

        let line = table
            .rows
            .get_mut(&id)
            .ok_or(SubwayError::NotFoundError { resource: "Line", id })?;
        line.name = draft.name;
        line.color = draft.color;
        line.up_station_id = draft.up_station_id;
        line.down_station_id = draft.down_station_id;
        line.distance = draft.distance;
        line.modified_date = Utc::now();
        Ok(line.clone())
    }

    async fn delete_by_id(&self, id: u64) -> Result<bool> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStationRepository {
    table: RwLock<Table<Station>>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, name: String) -> Result<Station> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|station| station.name == name) {
            return Err(SubwayError::DuplicateNameError {
                resource: "Station",
                name,
            });
        }

        let now = Utc::now();
        let station = Station {
            id: table.allocate_id(),
            name,
            created_date: now,
            modified_date: now,
        };
        table.rows.insert(station.id, station.clone());
        Ok(station)
    }

    async fn find_all(&self) -> Result<Vec<Station>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Station>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: u64) -> Result<bool> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
