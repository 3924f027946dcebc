//! CLI integration tests for sqlport.
//!
//! These tests run the binary against temporary SQL and config files and
//! check stdout, stderr and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command for the sqlport binary.
fn cmd() -> Command {
    Command::cargo_bin("sqlport").unwrap()
}

fn sql_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("procedure"))
        .stdout(predicate::str::contains("diff"));
}

#[test]
fn test_convert_subcommand_help() {
    cmd()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlport"));
}

// =============================================================================
// Convert Tests
// =============================================================================

#[test]
fn test_convert_oracle_by_default() {
    let file = sql_file("CREATE TABLE t (id NUMBER(10), name VARCHAR2(50))");
    cmd()
        .arg("convert")
        .arg(file.path())
        .assert()
        .success()
        .stdout("CREATE TABLE t (id INTEGER, name VARCHAR(50))\n");
}

#[test]
fn test_convert_mysql_override() {
    let file = sql_file("CREATE TABLE t (flag TINYINT(1), doc JSON)");
    cmd()
        .args(["convert", "--from", "mysql"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("CREATE TABLE t (flag BOOLEAN, doc JSONB)\n");
}

#[test]
fn test_convert_with_config_renames() {
    let sql = sql_file("SELECT * FROM users WHERE users.id = 1");
    let config = sql_file(r#"{"tables": {"users": "products"}}"#);
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("convert")
        .arg(sql.path())
        .assert()
        .success()
        .stdout("SELECT * FROM products WHERE products.id = 1\n")
        .stderr(predicate::str::contains("Renamed users -> products"));
}

#[test]
fn test_convert_json_output() {
    let file = sql_file("CREATE TABLE t (id NUMBER)");
    cmd()
        .args(["convert", "--json"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("CREATE TABLE t (id NUMERIC)"));
}

#[test]
fn test_convert_strict_fails_on_unmapped_type() {
    let file = sql_file("CREATE TABLE geo (shape SDO_GEOMETRY)");
    cmd()
        .args(["convert", "--strict"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unmapped type 'SDO_GEOMETRY'"));
}

#[test]
fn test_convert_unknown_dialect_is_rejected() {
    let file = sql_file("SELECT 1");
    cmd()
        .args(["convert", "--from", "sybase"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown dialect: sybase"));
}

#[test]
fn test_missing_file_fails() {
    cmd()
        .args(["convert", "/nonexistent/schema.sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_invalid_config_fails() {
    let sql = sql_file("SELECT 1");
    let config = sql_file("{ not json");
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("convert")
        .arg(sql.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

// =============================================================================
// Parse, Procedure and Diff Tests
// =============================================================================

#[test]
fn test_parse_prints_tables() {
    let file = sql_file("CREATE TABLE orders (order_id NUMBER PRIMARY KEY)");
    cmd()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"orders\""))
        .stdout(predicate::str::contains("\"primary_key\": \"order_id\""))
        .stdout(predicate::str::contains("\"dialect\": \"oracle\""));
}

#[test]
fn test_procedure_prints_stub() {
    let file = sql_file(
        "CREATE PROCEDURE SP_CREATE_ORDER(p_customer_id IN NUMBER, p_order_id OUT NUMBER)",
    );
    cmd()
        .arg("procedure")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("async def create_order("))
        .stdout(predicate::str::contains("customer_id: int,"))
        .stdout(predicate::str::contains(") -> int:"));
}

#[test]
fn test_procedure_without_header_fails() {
    let file = sql_file("BEGIN NULL; END;");
    cmd()
        .arg("procedure")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No procedure signature found"));
}

#[test]
fn test_diff_prints_migration() {
    let from = sql_file("CREATE TABLE a (id INT); CREATE TABLE b (id INT);");
    let to = sql_file("CREATE TABLE b (id INT); CREATE TABLE c (id INT);");
    cmd()
        .arg("diff")
        .arg(from.path())
        .arg(to.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-- Migration Script\n"))
        .stdout(predicate::str::contains("CREATE TABLE c (id INT);"))
        .stdout(predicate::str::contains("DROP TABLE IF EXISTS a CASCADE;"))
        .stdout(predicate::str::contains("TABLE b").not());
}

#[test]
fn test_diff_accepts_dialect() {
    let from = sql_file("CREATE TABLE a (id INT);");
    let to = sql_file("CREATE TABLE b (id INT);");
    cmd()
        .args(["diff", "--dialect", "mysql"])
        .arg(from.path())
        .arg(to.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE b (id INT);"))
        .stdout(predicate::str::contains("DROP TABLE IF EXISTS a CASCADE;"));

    cmd()
        .args(["diff", "--dialect", "sybase"])
        .arg(from.path())
        .arg(to.path())
        .assert()
        .failure();
}
