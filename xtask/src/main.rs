// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation and Infrastructure Orchestration
//!
//! Build, lint, and test automation for the aidcase workspace, plus
//! explicit, opt-in backend validation for MySQL/MariaDB in addition to
//! the default `SQLite` backend.
//!
//! ### Backend Testing Commands
//!
//! - `cargo test` — Runs all standard tests against `SQLite` (fast, no infrastructure)
//! - `cargo xtask test-mariadb` — Runs backend validation tests against `MariaDB`
//! - `cargo xtask verify-migrations` — Checks schema parity between migration trees
//!
//! ### Design Principles
//!
//! - No test infrastructure is embedded in test code
//! - No tests silently skip due to missing services
//! - External databases are opt-in only, never automatic
//! - Standard `cargo test` remains fast and infrastructure-free
//! - All backend-specific orchestration lives in xtask

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use diesel::{MysqlConnection, QueryableByName, SqliteConnection};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run()
        .map(|_| ())
        .wrap_err_with(|| format!("doc build failed for {}", package.name))?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run()?;
    Ok(())
}

/// Container configuration for MariaDB orchestration.
struct MariadbContainer {
    name: &'static str,
    db_name: &'static str,
    db_user: &'static str,
    db_password: &'static str,
    port: &'static str,
}

impl MariadbContainer {
    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.db_user, self.db_password, self.port, self.db_name
        )
    }

    /// Starts a fresh container, replacing any leftover with the same name.
    fn start(&self) -> Result<()> {
        tracing::info!("Checking Docker availability");
        cmd!("docker", "--version")
            .run()
            .wrap_err("Docker is not available. Please install Docker.")?;

        tracing::info!("Cleaning up any existing container: {}", self.name);
        self.stop();

        tracing::info!("Starting MariaDB container: {}", self.name);
        cmd!(
            "docker",
            "run",
            "--name",
            self.name,
            "-e",
            format!("MARIADB_DATABASE={}", self.db_name),
            "-e",
            format!("MARIADB_USER={}", self.db_user),
            "-e",
            format!("MARIADB_PASSWORD={}", self.db_password),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{}:3306", self.port),
            "-d",
            "mariadb:11"
        )
        .run()
        .wrap_err("Failed to start MariaDB container")?;

        self.wait_until_ready()
    }

    fn wait_until_ready(&self) -> Result<()> {
        use std::thread::sleep;
        use std::time::Duration;

        tracing::info!("Waiting for MariaDB to be ready...");
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            sleep(Duration::from_secs(1));
            tracing::debug!("Connection attempt {}/{}", attempt, max_attempts);

            let result = cmd!(
                "docker",
                "exec",
                self.name,
                "mariadb",
                "-u",
                self.db_user,
                format!("-p{}", self.db_password),
                "-e",
                "SELECT 1"
            )
            .run();

            if result.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }

        self.stop();
        Err(color_eyre::eyre::eyre!(
            "MariaDB did not become ready within timeout"
        ))
    }

    fn stop(&self) {
        let _ = cmd!("docker", "stop", self.name)
            .stderr_null()
            .stdout_null()
            .run();
        let _ = cmd!("docker", "rm", self.name)
            .stderr_null()
            .stdout_null()
            .run();
    }
}

/// Run `MariaDB` backend validation tests
///
/// Provisions a `MariaDB` 11 container, sets `DATABASE_URL` and
/// `AIDCASE_TEST_BACKEND`, runs the `#[ignore]`-marked backend validation
/// tests from `aidcase-persistence`, and always cleans up the container.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");

    let container = MariadbContainer {
        name: "aidcase-test-mariadb",
        db_name: "aidcase_test",
        db_user: "aidcase",
        db_password: "test_password",
        port: "3307", // non-standard port to avoid conflicts
    };

    container.start()?;

    tracing::info!("Running MariaDB backend validation tests");
    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "aidcase-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.url())
    .env("AIDCASE_TEST_BACKEND", "mariadb")
    .run();

    // Always cleanup container
    tracing::info!("Stopping MariaDB container");
    container.stop();

    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Normalized table shape used for schema parity comparison.
///
/// Column types are deliberately not compared: the two backends use
/// different storage classes for the same semantics (TEXT vs VARCHAR).
/// Names, nullability, and table membership must match exactly.
#[derive(Debug, PartialEq, Eq)]
struct TableShape {
    columns: BTreeMap<String, bool>, // column name -> nullable
}

/// Verify schema parity between `SQLite` and `MySQL` migrations
///
/// Applies each backend's migration tree to an ephemeral database and
/// compares the resulting table and column sets. A divergence between
/// `migrations/` and `migrations_mysql/` is a hard failure.
fn verify_migrations() -> Result<()> {
    use diesel_migrations::{MigrationHarness, embed_migrations};

    tracing::info!("Starting schema parity verification");

    const SQLITE_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");
    const MYSQL_MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations_mysql");

    let container = MariadbContainer {
        name: "aidcase-verify-migrations",
        db_name: "aidcase_verify",
        db_user: "aidcase",
        db_password: "verify_password",
        port: "3308", // different port from test-mariadb to avoid conflicts
    };

    container.start()?;

    let verification = (|| -> Result<()> {
        tracing::info!("Applying SQLite migrations");
        let mut sqlite_conn = SqliteConnection::establish(":memory:")
            .wrap_err("Failed to create SQLite in-memory database")?;
        sqlite_conn
            .run_pending_migrations(SQLITE_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {e}"))?;

        tracing::info!("Applying MySQL migrations");
        let mut mysql_conn = MysqlConnection::establish(&container.url())
            .wrap_err("Failed to connect to MariaDB")?;
        mysql_conn
            .run_pending_migrations(MYSQL_MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to apply MySQL migrations: {e}"))?;

        let sqlite_schema = sqlite_table_shapes(&mut sqlite_conn)?;
        let mysql_schema = mysql_table_shapes(&mut mysql_conn, container.db_name)?;

        compare_schemas(&sqlite_schema, &mysql_schema)?;

        tracing::info!("Schema parity verification passed");
        Ok(())
    })();

    container.stop();
    verification
}

fn sqlite_table_shapes(
    conn: &mut SqliteConnection,
) -> Result<BTreeMap<String, TableShape>> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema: BTreeMap<String, TableShape> = BTreeMap::new();
    for table in tables {
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get columns for table {}", table.name))?;

        let shape = TableShape {
            columns: columns
                .into_iter()
                .map(|col| (col.name, col.notnull == 0))
                .collect(),
        };
        schema.insert(table.name, shape);
    }

    Ok(schema)
}

fn mysql_table_shapes(
    conn: &mut MysqlConnection,
    db_name: &str,
) -> Result<BTreeMap<String, TableShape>> {
    #[derive(QueryableByName)]
    struct ColumnRow {
        #[diesel(sql_type = Text)]
        table_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
    }

    let rows: Vec<ColumnRow> = diesel::sql_query(format!(
        "SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, \
         IS_NULLABLE AS is_nullable \
         FROM information_schema.COLUMNS \
         WHERE TABLE_SCHEMA = '{db_name}' \
         AND TABLE_NAME != '__diesel_schema_migrations' \
         ORDER BY TABLE_NAME, COLUMN_NAME"
    ))
    .load(conn)
    .wrap_err("Failed to query MySQL columns")?;

    let mut schema: BTreeMap<String, TableShape> = BTreeMap::new();
    for row in rows {
        schema
            .entry(row.table_name)
            .or_insert_with(|| TableShape {
                columns: BTreeMap::new(),
            })
            .columns
            .insert(row.column_name, row.is_nullable == "YES");
    }

    Ok(schema)
}

fn compare_schemas(
    sqlite: &BTreeMap<String, TableShape>,
    mysql: &BTreeMap<String, TableShape>,
) -> Result<()> {
    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();
    if sqlite_tables != mysql_tables {
        return Err(color_eyre::eyre::eyre!(
            "Table sets differ: SQLite {sqlite_tables:?} vs MySQL {mysql_tables:?}"
        ));
    }

    for (table_name, sqlite_shape) in sqlite {
        let Some(mysql_shape) = mysql.get(table_name) else {
            continue;
        };
        if sqlite_shape != mysql_shape {
            return Err(color_eyre::eyre::eyre!(
                "Table '{table_name}' differs between backends:\n  SQLite: {:?}\n  MySQL: {:?}",
                sqlite_shape.columns,
                mysql_shape.columns
            ));
        }
    }

    Ok(())
}
