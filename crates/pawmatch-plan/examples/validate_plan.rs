use std::env;
use std::path::PathBuf;

use pawmatch_plan::{plan_json_schema_value, read_plan_document, validate_plan};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let plan_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("missing plan path")?;

    let plan_json = read_plan_document(&plan_path)?;
    let plan_schema = plan_json_schema_value()?;

    match validate_plan(&plan_json, &plan_schema) {
        Ok(validated) => {
            for line in validated
                .warnings
                .iter()
                .map(|issue| format!("warning {} {}: {}", issue.code, issue.path, issue.message))
            {
                eprintln!("{line}");
            }
            println!(
                "plan validated: {} pets, {} users, adoption target {}",
                validated.plan.num_pets,
                validated.plan.num_users,
                validated.plan.effective_adoption_target()
            );
            Ok(())
        }
        Err(report) => {
            eprintln!("plan validation failed");
            for line in report.lines() {
                eprintln!("{line}");
            }
            std::process::exit(1);
        }
    }
}
