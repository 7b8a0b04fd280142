//! Fixture Loader: best-effort population of the remote store.
//!
//! Records are posted strictly in catalog order (dishes, then meals, then
//! diets) and every outcome is logged and recorded. A rejected record -
//! duplicate name, unrecognized dish, even a transport fault - never stops
//! the run; the harness is meant to be pointed at an empty store once, and
//! anything unexpected shows up in the report instead of aborting it.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::client::{ApiClient, CreateOutcome, NewMeal};
use crate::error::{ErrorCode, HarnessError};
use crate::fixtures::FixtureSet;

/// Which endpoint a record was posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Dish,
    Meal,
    Diet,
}

/// Outcome of posting one fixture record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Created {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<i64>,
        status: u16,
    },
    Rejected {
        status: u16,
        code: i32,
        message: String,
    },
    Failed {
        details: String,
    },
}

/// One line of the population report.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub kind: RecordKind,
    pub name: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

/// Aggregate population report.
#[derive(Debug, Default, Serialize)]
pub struct PopulateReport {
    pub created: usize,
    pub rejected: usize,
    pub failed: usize,
    pub records: Vec<RecordReport>,
}

impl PopulateReport {
    fn push(&mut self, kind: RecordKind, name: &str, outcome: RecordOutcome) {
        match &outcome {
            RecordOutcome::Created { id, status } => {
                self.created += 1;
                info!(
                    "[Populate] created {:?} {:?} (status {}, id {:?})",
                    kind, name, status, id
                );
            }
            RecordOutcome::Rejected {
                status,
                code,
                message,
            } => {
                self.rejected += 1;
                info!(
                    "[Populate] rejected {:?} {:?} (status {}, code {}: {})",
                    kind, name, status, code, message
                );
            }
            RecordOutcome::Failed { details } => {
                self.failed += 1;
                warn!("[Populate] failed {:?} {:?}: {}", kind, name, details);
            }
        }
        self.records.push(RecordReport {
            kind,
            name: name.to_string(),
            outcome,
        });
    }

    pub fn print_json(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing populate report")?;
        println!("{json}");
        Ok(())
    }

    pub fn print_table(&self) {
        println!(
            "Records created/rejected/failed : {} / {} / {}",
            self.created, self.rejected, self.failed
        );
        for record in &self.records {
            let detail = match &record.outcome {
                RecordOutcome::Created { id: Some(id), .. } => format!("created id {}", id),
                RecordOutcome::Created { id: None, .. } => "created".to_string(),
                RecordOutcome::Rejected { code, message, .. } => {
                    format!("rejected ({}: {})", code, message)
                }
                RecordOutcome::Failed { details } => format!("failed: {}", details),
            };
            println!("  - [{:?}] {}: {}", record.kind, record.name, detail);
        }
    }
}

fn outcome_from(result: Result<CreateOutcome, HarnessError>) -> RecordOutcome {
    match result {
        Ok(CreateOutcome::Created { id, status }) => RecordOutcome::Created { id, status },
        Ok(CreateOutcome::Rejected { status, rejection }) => RecordOutcome::Rejected {
            status,
            code: rejection.code(),
            message: rejection.message(),
        },
        Err(err) => RecordOutcome::Failed {
            details: err.message(),
        },
    }
}

/// Post every record of `fixtures` in order and collect the outcomes.
///
/// The only hard error is an invalid fixture set; once loading starts,
/// everything is best-effort.
pub async fn run(client: &ApiClient, fixtures: &FixtureSet) -> Result<PopulateReport, HarnessError> {
    fixtures.validate()?;

    let mut report = PopulateReport::default();

    for dish in &fixtures.dishes {
        let result = client.create_dish(&dish.name).await;
        report.push(RecordKind::Dish, &dish.name, outcome_from(result));
    }

    for meal in &fixtures.meals {
        let payload = NewMeal {
            name: meal.name.clone(),
            appetizer: meal.appetizer,
            main: meal.main,
            dessert: meal.dessert,
        };
        let result = client.create_meal(&payload).await;
        report.push(RecordKind::Meal, &meal.name, outcome_from(result));
    }

    for diet in &fixtures.diets {
        let payload = crate::client::NewDiet {
            name: diet.name.clone(),
            cal: diet.cal,
            sodium: diet.sodium,
            sugar: diet.sugar,
        };
        let result = client.create_diet(&payload).await;
        report.push(RecordKind::Diet, &diet.name, outcome_from(result));
    }

    Ok(report)
}
