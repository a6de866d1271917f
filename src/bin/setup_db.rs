use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use pushkind_stations::migration::{read_script, run_embedded, run_script};

/// Create or upgrade the back-office database.
#[derive(Parser, Debug)]
#[command(name = "setup_db", version)]
struct Args {
    /// SQLite database file.
    #[arg(long, env = "DATABASE_URL", default_value = "app.db")]
    database_url: String,
    /// Extra SQL script applied after the schema migrations (seed data, fixes).
    #[arg(long)]
    script: Option<PathBuf>,
    /// Only run the script, not the embedded migrations.
    #[arg(long)]
    skip_migrations: bool,
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let args = Args::parse();

    let pool = match establish_connection_pool(&args.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("Failed to get a database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !args.skip_migrations {
        match run_embedded(&mut *conn) {
            Ok(versions) if versions.is_empty() => println!("Schema is up to date."),
            Ok(versions) => println!("Applied migrations: {}", versions.join(", ")),
            Err(e) => {
                log::error!("{e}");
                println!("Run the files under migrations/*/up.sql manually, in order.");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(path) = args.script else {
        return ExitCode::SUCCESS;
    };

    let sql = match read_script(&path) {
        Ok(sql) => sql,
        Err(e) => {
            log::error!("{}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let report = run_script(&mut *conn, &sql);
    println!(
        "{}: {} applied, {} skipped, {} failed",
        path.display(),
        report.applied,
        report.skipped,
        report.failed.len()
    );

    match report.manual_instructions() {
        Some(instructions) => {
            println!("\n{instructions}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
