use super::{json_pretty, mark_fail, mark_ok, EXIT_MANIFEST_ERROR, EXIT_SUCCESS};
use pinset_schema::{check_batch, BatchOutcome, PipelineError};
use serde_json::{json, Value};
use std::path::PathBuf;

fn outcome_json(outcome: &BatchOutcome) -> Value {
    match &outcome.result {
        Ok(set) => {
            let identity = set.identity();
            json!({
                "path": outcome.path,
                "status": "valid",
                "name": set.package().name,
                "requirements": set.len(),
                "digest": identity.digest,
            })
        }
        Err(PipelineError::Validation(report)) => json!({
            "path": outcome.path,
            "status": "invalid",
            "name": report.manifest,
            "violations": report
                .violations
                .iter()
                .map(|v| json!({ "field": v.field(), "error": v, "message": v.to_string() }))
                .collect::<Vec<_>>(),
        }),
        Err(e) => json!({
            "path": outcome.path,
            "status": "error",
            "message": e.to_string(),
        }),
    }
}

fn print_outcome(outcome: &BatchOutcome) {
    let path = outcome.path.display();
    match &outcome.result {
        Ok(set) => println!(
            "{}",
            mark_ok(&format!(
                "{path}: {} ({} requirements, {})",
                set.package().name,
                set.len(),
                set.identity().short_digest
            ))
        ),
        Err(PipelineError::Validation(report)) => {
            println!(
                "{}",
                mark_fail(&format!(
                    "{path}: {} violation(s) in '{}'",
                    report.violations.len(),
                    report.manifest
                ))
            );
            for v in &report.violations {
                println!("    {}: {v}", v.field());
            }
        }
        Err(e) => println!("{}", mark_fail(&format!("{path}: {e}"))),
    }
}

pub fn run(manifests: &[PathBuf], json: bool) -> Result<u8, String> {
    let outcomes = check_batch(manifests);
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();

    if json {
        let payload = json!({
            "checked": outcomes.len(),
            "failed": failed,
            "manifests": outcomes.iter().map(outcome_json).collect::<Vec<_>>(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
        if outcomes.len() > 1 {
            println!(
                "{} of {} manifests passed",
                outcomes.len() - failed,
                outcomes.len()
            );
        }
    }

    if failed == 0 {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_MANIFEST_ERROR)
    }
}
