//! Create → verify → cleanup scenarios.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, info_span, warn};

use school_db_core::{Connection, DbConfig, SqliteConnection};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::fixture::TeacherFixture;
use crate::gateway::{CreationPath, RemovalPath, TeacherGateway};
use crate::names::NameGenerator;
use crate::record::{Teacher, TeacherId};
use crate::verify;

/// One create/verify/remove cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub creation: CreationPath,
    pub removal: RemovalPath,
    /// Also cross-check through `ps.vTeacher`
    pub verify_view: bool,
}

/// What a passing scenario observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub creation: CreationPath,
    pub removal: RemovalPath,
    pub teacher: Teacher,
    pub teacher_id: TeacherId,
    pub baseline_count: usize,
    pub post_creation_count: usize,
    pub view_verified: bool,
    pub baseline_restored: bool,
    pub elapsed_ms: u64,
}

impl Scenario {
    pub fn new(creation: CreationPath, removal: RemovalPath) -> Self {
        Self {
            creation,
            removal,
            verify_view: true,
        }
    }

    pub fn without_view(mut self) -> Self {
        self.verify_view = false;
        self
    }

    /// Every creation path paired with every removal path.
    pub fn all() -> Vec<Scenario> {
        let mut scenarios = Vec::with_capacity(4);
        for creation in [CreationPath::Direct, CreationPath::Procedure] {
            for removal in [RemovalPath::Direct, RemovalPath::Procedure] {
                scenarios.push(Scenario::new(creation, removal));
            }
        }
        scenarios
    }

    /// Runs the scenario over an open connection.
    ///
    /// The fixture is removed on every exit path once it exists. Checks run
    /// in order and the first failing one ends the scenario.
    pub fn run<C: Connection>(
        &self,
        gateway: &TeacherGateway<C>,
        config: &HarnessConfig,
    ) -> Result<ScenarioReport, HarnessError> {
        config.validate()?;
        let span = info_span!("scenario", creation = ?self.creation, removal = ?self.removal);
        let _enter = span.enter();
        let started = Instant::now();

        let baseline = gateway.snapshot()?;
        let names = NameGenerator::from_config(config);
        let teacher = Teacher::new(names.next_name(), names.next_name());
        info!(%teacher, baseline = baseline.len(), "creating fixture");

        let fixture = TeacherFixture::create(gateway, teacher.clone(), self.creation, self.removal)?;
        let teacher_id = fixture.id();

        let after = gateway.snapshot()?;
        if config.ignore_foreign_fixtures {
            verify::baseline_preserved(
                &verify::without_foreign_fixtures(&baseline, &names, &teacher),
                &verify::without_foreign_fixtures(&after, &names, &teacher),
            )?;
        } else {
            verify::baseline_preserved(&baseline, &after)?;
        }
        verify::contains_exactly_once(&after, &teacher)?;

        let view_verified = self.verify_view && config.verify_view;
        if view_verified {
            gateway.check_view(teacher_id, &teacher)?;
        }

        fixture.release()?;

        let restored = gateway.snapshot()?;
        verify::fixture_absent(&restored, &teacher)?;
        // Unfiltered: rows left behind by concurrent runs show up here too.
        let baseline_restored = restored == baseline;
        if !baseline_restored {
            warn!("store differs from baseline after removal");
        }

        let report = ScenarioReport {
            creation: self.creation,
            removal: self.removal,
            teacher,
            teacher_id,
            baseline_count: baseline.len(),
            post_creation_count: after.len(),
            view_verified,
            baseline_restored,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(teacher_id = %report.teacher_id, elapsed_ms = report.elapsed_ms, "scenario passed");
        Ok(report)
    }
}

/// Opens a connection from `db`, deploying the schema if configured, and
/// runs one scenario on it. A connection failure ends the scenario.
pub fn run_with_config(
    db: &DbConfig,
    config: &HarnessConfig,
    scenario: &Scenario,
) -> Result<ScenarioReport, HarnessError> {
    let conn = SqliteConnection::open(db)?;
    let gateway = TeacherGateway::new(conn);
    scenario.run(&gateway, config)
}

/// Runs each scenario on its own connection, collecting every outcome.
pub fn run_all(
    db: &DbConfig,
    config: &HarnessConfig,
    scenarios: &[Scenario],
) -> Vec<(Scenario, Result<ScenarioReport, HarnessError>)> {
    scenarios
        .iter()
        .map(|scenario| (*scenario, run_with_config(db, config, scenario)))
        .collect()
}
