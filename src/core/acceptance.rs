//! End-to-end acceptance scenarios for the line API.
//!
//! Every scenario talks to the server only through [`SubwayClient`], so the
//! suite can target an in-process server or a deployed one. Names are
//! suffixed with a per-run id and totals are measured relative to a baseline,
//! which keeps the scenarios valid against a server that already holds data.

use crate::adapters::client::SubwayClient;
use crate::domain::model::{LineRequest, LineResponse, Page};
use crate::utils::error::{Result, SubwayError};
use std::time::{Duration, Instant};

pub const BULK_LINE_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    CreateLine,
    CreateLineWithDuplicateName,
    GetLines,
    GetLinesPage,
    GetLinesPageWithUnusedId,
    GetLine,
    UpdateLine,
    DeleteLine,
}

impl Scenario {
    pub const ALL: [Scenario; 8] = [
        Scenario::CreateLine,
        Scenario::CreateLineWithDuplicateName,
        Scenario::GetLines,
        Scenario::GetLinesPage,
        Scenario::GetLinesPageWithUnusedId,
        Scenario::GetLine,
        Scenario::UpdateLine,
        Scenario::DeleteLine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::CreateLine => "create_line",
            Scenario::CreateLineWithDuplicateName => "create_line_with_duplicate_name",
            Scenario::GetLines => "get_lines",
            Scenario::GetLinesPage => "get_lines_page",
            Scenario::GetLinesPageWithUnusedId => "get_lines_page_with_unused_id",
            Scenario::GetLine => "get_line",
            Scenario::UpdateLine => "update_line",
            Scenario::DeleteLine => "delete_line",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub duration: Duration,
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
}

/// Two stations registered for one scenario.
struct Fixture {
    up_station_id: u64,
    down_station_id: u64,
}

pub struct AcceptanceSuite {
    client: SubwayClient,
    run_id: String,
}

fn check(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SubwayError::validation(message()))
    }
}

impl AcceptanceSuite {
    pub fn new(client: SubwayClient) -> Self {
        let run_id = chrono::Utc::now().format("%Y%m%d%H%M%S%3f").to_string();
        Self::with_run_id(client, run_id)
    }

    pub fn with_run_id(client: SubwayClient, run_id: impl Into<String>) -> Self {
        Self {
            client,
            run_id: run_id.into(),
        }
    }

    pub async fn run_all(&self) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(Scenario::ALL.len());
        for scenario in Scenario::ALL {
            results.push(self.run(scenario).await);
        }
        results
    }

    pub async fn run(&self, scenario: Scenario) -> ScenarioResult {
        let start_time = Instant::now();
        let outcome = match scenario {
            Scenario::CreateLine => self.create_line().await,
            Scenario::CreateLineWithDuplicateName => self.create_line_with_duplicate_name().await,
            Scenario::GetLines => self.get_lines().await,
            Scenario::GetLinesPage => self.get_lines_page().await,
            Scenario::GetLinesPageWithUnusedId => self.get_lines_page_with_unused_id().await,
            Scenario::GetLine => self.get_line().await,
            Scenario::UpdateLine => self.update_line().await,
            Scenario::DeleteLine => self.delete_line().await,
        };
        let duration = start_time.elapsed();

        match &outcome {
            Ok(()) => tracing::info!("✅ {} ({:?})", scenario.name(), duration),
            Err(e) => tracing::error!("❌ {} ({:?}): {}", scenario.name(), duration, e),
        }

        ScenarioResult {
            scenario,
            duration,
            error: outcome.err().map(|e| e.to_string()),
        }
    }

    pub fn summarize(results: &[ScenarioResult]) -> SuiteSummary {
        let passed = results.iter().filter(|r| r.passed()).count();
        SuiteSummary {
            passed,
            failed: results.len() - passed,
        }
    }

    fn unique(&self, name: &str, scenario: Scenario) -> String {
        format!("{}-{}-{}", name, scenario.name(), self.run_id)
    }

    async fn fixture(&self, scenario: Scenario) -> Result<Fixture> {
        let up = self
            .client
            .register_station(&self.unique("강남역", scenario))
            .await?;
        let down = self
            .client
            .register_station(&self.unique("광교역", scenario))
            .await?;
        Ok(Fixture {
            up_station_id: up.id,
            down_station_id: down.id,
        })
    }

    fn line_request(&self, fixture: &Fixture, name: String, distance: i64) -> LineRequest {
        LineRequest::new(
            name,
            "bg-red-600",
            fixture.up_station_id,
            fixture.down_station_id,
            distance,
        )
    }

    async fn total_lines(&self) -> Result<usize> {
        let page = self.client.fetch_page(0, 1).await?;
        Ok(page.total_elements)
    }

    async fn register_bulk_lines(&self, scenario: Scenario, fixture: &Fixture) -> Result<()> {
        for index in 0..BULK_LINE_COUNT {
            let name = self.unique(&format!("line{}", index), scenario);
            let request = self.line_request(fixture, name, index as i64 + 1);
            self.client.register_line(&request).await?;
        }
        Ok(())
    }

    async fn create_line(&self) -> Result<()> {
        let scenario = Scenario::CreateLine;
        let fixture = self.fixture(scenario).await?;
        let request = self.line_request(&fixture, self.unique("신분당선", scenario), 10);

        let response = self.client.create_line(&request).await?;

        check(response.status == 201, || {
            format!("expected 201, got {}", response.status)
        })?;
        let location = response.location.clone().unwrap_or_default();
        check(!location.trim().is_empty(), || {
            "Location header is blank".to_string()
        })?;

        let fetched: LineResponse = self.client.get(&location).await?.expect_status(200)?.json()?;
        check(fetched.name == request.name, || {
            format!("stored name {} differs from {}", fetched.name, request.name)
        })
    }

    async fn create_line_with_duplicate_name(&self) -> Result<()> {
        let scenario = Scenario::CreateLineWithDuplicateName;
        let fixture = self.fixture(scenario).await?;
        let request = self.line_request(&fixture, self.unique("신분당선", scenario), 10);
        self.client.register_line(&request).await?;
        let before = self.total_lines().await?;

        let response = self.client.create_line(&request).await?;

        check(response.status == 400, || {
            format!("expected 400, got {}", response.status)
        })?;
        let after = self.total_lines().await?;
        check(before == after, || {
            format!("line count changed from {} to {}", before, after)
        })
    }

    async fn get_lines(&self) -> Result<()> {
        let scenario = Scenario::GetLines;
        let fixture = self.fixture(scenario).await?;
        let first = self
            .client
            .create_line(&self.line_request(&fixture, self.unique("구분당선", scenario), 15))
            .await?
            .expect_status(201)?;
        let second = self
            .client
            .create_line(&self.line_request(&fixture, self.unique("신분당선", scenario), 10))
            .await?
            .expect_status(201)?;

        let response = self.client.list_lines().await?.expect_status(200)?;

        let listed: Vec<u64> = response
            .json::<Vec<LineResponse>>()?
            .into_iter()
            .map(|line| line.id)
            .collect();
        for created in [&first, &second] {
            let id = created.location_id().ok_or_else(|| {
                SubwayError::validation(format!("unparsable Location {:?}", created.location))
            })?;
            check(listed.contains(&id), || format!("line {} missing from list", id))?;
        }
        Ok(())
    }

    async fn get_lines_page(&self) -> Result<()> {
        let scenario = Scenario::GetLinesPage;
        let fixture = self.fixture(scenario).await?;
        let baseline = self.total_lines().await?;
        self.register_bulk_lines(scenario, &fixture).await?;

        let page: Page<LineResponse> = self
            .client
            .lines_page(5, 8, &[])
            .await?
            .expect_status(200)?
            .json()?;

        check(page.content.len() == 8, || {
            format!("page size mismatch: {}", page.content.len())
        })?;
        check(page.pageable.page_number == 5, || {
            format!("page number mismatch: {}", page.pageable.page_number)
        })?;
        check(page.total_elements == baseline + BULK_LINE_COUNT, || {
            format!(
                "total elements mismatch: {} (expected {})",
                page.total_elements,
                baseline + BULK_LINE_COUNT
            )
        })
    }

    async fn get_lines_page_with_unused_id(&self) -> Result<()> {
        let scenario = Scenario::GetLinesPageWithUnusedId;
        let fixture = self.fixture(scenario).await?;
        let baseline = self.total_lines().await?;
        self.register_bulk_lines(scenario, &fixture).await?;

        let page: Page<LineResponse> = self
            .client
            .lines_page(0, 10, &[("id", "25".to_string())])
            .await?
            .expect_status(200)?
            .json()?;

        check(page.content.len() == 10, || {
            format!("page size mismatch: {}", page.content.len())
        })?;
        check(page.pageable.page_number == 0, || {
            format!("page number mismatch: {}", page.pageable.page_number)
        })?;
        check(page.total_elements == baseline + BULK_LINE_COUNT, || {
            format!("total elements mismatch: {}", page.total_elements)
        })
    }

    async fn get_line(&self) -> Result<()> {
        let scenario = Scenario::GetLine;
        let fixture = self.fixture(scenario).await?;
        let request = self.line_request(&fixture, self.unique("신분당선", scenario), 10);
        let created = self.client.create_line(&request).await?.expect_status(201)?;
        let location = created.location.clone().unwrap_or_default();

        let line: LineResponse = self.client.get(&location).await?.expect_status(200)?.json()?;

        check(line.color == request.color && line.distance == 10, || {
            format!("unexpected line body: {:?}", line)
        })
    }

    async fn update_line(&self) -> Result<()> {
        let scenario = Scenario::UpdateLine;
        let fixture = self.fixture(scenario).await?;
        let created = self
            .client
            .register_line(&self.line_request(&fixture, self.unique("신분당선", scenario), 10))
            .await?;
        let update = self.line_request(&fixture, self.unique("구분당선", scenario), 15);

        self.client
            .update_line(created.id, &update)
            .await?
            .expect_status(200)?;

        let line: LineResponse = self
            .client
            .get_line(created.id)
            .await?
            .expect_status(200)?
            .json()?;
        check(line.name == update.name && line.distance == 15, || {
            format!("update not reflected: {:?}", line)
        })
    }

    async fn delete_line(&self) -> Result<()> {
        let scenario = Scenario::DeleteLine;
        let fixture = self.fixture(scenario).await?;
        let created = self
            .client
            .register_line(&self.line_request(&fixture, self.unique("신분당선", scenario), 10))
            .await?;

        self.client.delete_line(created.id).await?.expect_status(204)?;

        self.client.get_line(created.id).await?.expect_status(404)?;
        self.client.delete_line(created.id).await?.expect_status(404)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerSettings;
    use crate::core::server::LineServer;
    use std::net::SocketAddr;

    #[tokio::test]
    async fn test_all_scenarios_pass_against_in_process_server() {
        let settings = ServerSettings {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..ServerSettings::default()
        };
        let server = LineServer::in_memory(settings).spawn().await.unwrap();
        let client = SubwayClient::new(&server.base_url()).unwrap();

        let suite = AcceptanceSuite::with_run_id(client, "unit");
        let results = suite.run_all().await;
        let failures: Vec<_> = results.iter().filter(|r| !r.passed()).collect();

        assert!(failures.is_empty(), "failed scenarios: {:?}", failures);
        assert_eq!(
            AcceptanceSuite::summarize(&results),
            SuiteSummary {
                passed: Scenario::ALL.len(),
                failed: 0
            }
        );

        server.shutdown().await.unwrap();
    }

    #[test]
    fn test_summarize_counts_failures() {
        let results = vec![
            ScenarioResult {
                scenario: Scenario::CreateLine,
                duration: Duration::from_millis(3),
                error: None,
            },
            ScenarioResult {
                scenario: Scenario::DeleteLine,
                duration: Duration::from_millis(5),
                error: Some("expected 204".to_string()),
            },
        ];

        assert_eq!(
            AcceptanceSuite::summarize(&results),
            SuiteSummary {
                passed: 1,
                failed: 1
            }
        );
    }
}
