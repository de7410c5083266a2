//! Plan fueling for one session from the command line
//! Usage: cargo run --bin fueling_plan -- <athlete_id> <weight> <goal> <sport> <calories_burned>
//!        [--unit kg|lb] [--age N] [--height CM] [--log]

use tracing_subscriber::EnvFilter;

use endurithm::config;
use endurithm::db::{Database, DbResult};
use endurithm::tools::fueling::{self, PlanSessionResponse};

const USAGE: &str = "Usage: fueling_plan <athlete_id> <weight> <goal> <sport> <calories_burned> \
                     [--unit kg|lb] [--age N] [--height CM] [--log]";

struct Args {
    athlete_id: String,
    weight: f64,
    goal: String,
    sport: String,
    calories_burned: f64,
    unit: String,
    age_years: f64,
    height_cm: f64,
    log: bool,
}

fn parse_number(name: &str, value: Option<&String>) -> Result<f64, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}\n{}", name, USAGE))?;
    value
        .parse()
        .map_err(|_| format!("Invalid number for {}: '{}'", name, value))
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut unit = "kg".to_string();
    let mut age_years = 0.0;
    let mut height_cm = 0.0;
    let mut log = false;

    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--unit" => {
                unit = iter
                    .next()
                    .cloned()
                    .ok_or_else(|| format!("Missing value for --unit\n{}", USAGE))?;
            }
            "--age" => age_years = parse_number("--age", iter.next())?,
            "--height" => height_cm = parse_number("--height", iter.next())?,
            "--log" => log = true,
            _ => positional.push(arg.clone()),
        }
    }

    if positional.len() != 5 {
        return Err(USAGE.to_string());
    }

    Ok(Args {
        athlete_id: positional[0].clone(),
        weight: parse_number("weight", positional.get(1))?,
        goal: positional[2].clone(),
        sport: positional[3].clone(),
        calories_burned: parse_number("calories_burned", positional.get(4))?,
        unit,
        age_years,
        height_cm,
        log,
    })
}

/// Plan the session, opening the database only when the plan is logged
fn run<F>(args: &Args, open_database: F) -> Result<PlanSessionResponse, Box<dyn std::error::Error>>
where
    F: FnOnce() -> DbResult<Database>,
{
    let stats = fueling::athlete_stats(
        &args.athlete_id,
        args.age_years,
        args.height_cm,
        args.weight,
        Some(&args.unit),
    )?;

    let database = if args.log { Some(open_database()?) } else { None };
    let response = fueling::plan_session(
        database.as_ref(),
        &stats,
        &args.goal,
        &args.sport,
        args.calories_burned,
    )?;

    Ok(response)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;
    let response = run(&args, config::open_database)?;

    if response.session.goal_resolution.fell_back {
        eprintln!(
            "Goal '{}' is not allowed for {}. Using maintain.",
            args.goal, args.athlete_id
        );
    }

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use endurithm::db::DbError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let parsed = parse_args(&args(&[
            "A001", "160", "cutting", "marathon_running", "612.5", "--unit", "lb", "--age", "23", "--log",
        ]))
        .unwrap();
        assert_eq!(parsed.athlete_id, "A001");
        assert_eq!(parsed.weight, 160.0);
        assert_eq!(parsed.unit, "lb");
        assert_eq!(parsed.age_years, 23.0);
        assert_eq!(parsed.height_cm, 0.0);
        assert_eq!(parsed.calories_burned, 612.5);
        assert!(parsed.log);
    }

    #[test]
    fn test_parse_defaults_to_kilograms() {
        let parsed = parse_args(&args(&["A1", "70", "maintain", "track_and_field_mid", "400"])).unwrap();
        assert_eq!(parsed.unit, "kg");
        assert!(!parsed.log);
    }

    fn unavailable_database() -> DbResult<Database> {
        Err(DbError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "database unavailable",
        )))
    }

    #[test]
    fn test_run_without_log_skips_database() {
        let parsed = parse_args(&args(&["A1", "160", "cutting", "marathon_running", "600"])).unwrap();
        let response = run(&parsed, unavailable_database).unwrap();
        assert_eq!(response.logged_session_id, None);
        assert_eq!(response.session.plan.total_kcal_to_replenish, 450.0);
    }

    #[test]
    fn test_run_with_log_appends() {
        let parsed = parse_args(&args(&["A1", "160", "cutting", "marathon_running", "600", "--log"])).unwrap();
        assert!(run(&parsed, unavailable_database).is_err());

        let response = run(&parsed, || {
            let db = Database::open_in_memory()?;
            db.with_conn(endurithm::db::migrations::run_migrations)?;
            Ok(db)
        })
        .unwrap();
        assert!(response.logged_session_id.is_some());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["A1", "70", "maintain"])).is_err());
        assert!(parse_args(&args(&["A1", "heavy", "maintain", "track_and_field_mid", "400"])).is_err());
        assert!(parse_args(&args(&["A1", "70", "maintain", "track_and_field_mid", "400", "--age"])).is_err());
    }
}
