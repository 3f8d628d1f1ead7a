mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{DATED_SALES_CSV, TestWorkspace};

fn salescope(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("salescope").expect("binary exists");
    cmd.args(["--base-dir", workspace.path().to_str().unwrap()]);
    cmd
}

#[test]
fn probe_prints_columns_and_role_suggestions() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", "Item, Amount ,qty,order_date\nWidget,10,2,2024-01-05\n");

    salescope(&workspace)
        .args(["probe", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Columns: item, amount, qty, order_date"))
        .stdout(contains("product  -> item"))
        .stdout(contains("total    -> amount"))
        .stdout(contains("quantity -> qty"))
        .stdout(contains("date     -> order_date"))
        .stdout(contains("year     -> (none)"));
}

#[test]
fn probe_writes_suggestions_json_when_requested() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);
    let out_path = workspace.path().join("probe.json");

    salescope(&workspace)
        .args([
            "probe",
            "-i",
            csv_path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).expect("read probe")).expect("json");
    assert_eq!(json["suggestions"]["product"], "product");
    assert_eq!(json["suggestions"]["date"], "date");
}

#[test]
fn report_aggregates_and_writes_all_outputs() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);

    salescope(&workspace)
        .args([
            "report",
            "-i",
            csv_path.to_str().unwrap(),
            "--time-mode",
            "date",
            "--product-col",
            "product",
            "--total-col",
            "total",
            "--date-col",
            "date",
        ])
        .assert()
        .success()
        .stdout(contains("2024-01"))
        .stdout(contains("Total revenue: 22"))
        .stdout(contains("Best product:  A"));

    let output_dir = workspace.path().join("output");
    assert!(output_dir.join("sales_report.xlsx").is_file());
    assert!(output_dir.join("summary.pdf").is_file());
    assert!(workspace.path().join("chart_history.json").is_file());
}

#[test]
fn report_rejects_missing_revenue_selection() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);

    salescope(&workspace)
        .args([
            "report",
            "-i",
            csv_path.to_str().unwrap(),
            "--product-col",
            "product",
            "--date-col",
            "date",
        ])
        .assert()
        .failure()
        .stderr(contains("quantity and price"));
}

#[test]
fn upload_token_round_trips_through_report() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);

    let output = salescope(&workspace)
        .args(["upload", "-i", csv_path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let token = String::from_utf8(output).unwrap().trim().to_string();
    assert!(token.ends_with("_sales.csv"));

    salescope(&workspace)
        .args([
            "report",
            "--token",
            &token,
            "--product-col",
            "product",
            "--total-col",
            "total",
            "--date-col",
            "date",
        ])
        .assert()
        .success()
        .stdout(contains("Total revenue: 22"));
}

#[test]
fn report_with_unknown_token_reads_as_expired_session() {
    let workspace = TestWorkspace::new();
    salescope(&workspace)
        .args([
            "report",
            "--token",
            "deadbeef_gone.csv",
            "--product-col",
            "product",
            "--total-col",
            "total",
            "--date-col",
            "date",
        ])
        .assert()
        .failure()
        .stderr(contains("upload the file again"));
}

#[test]
fn config_set_normalizes_creates_and_persists_paths() {
    let workspace = TestWorkspace::new();

    salescope(&workspace)
        .args(["config", "set", "--upload-folder", "incoming"])
        .assert()
        .success()
        .stdout(contains("Storage paths updated successfully"));

    assert!(workspace.path().join("incoming").is_dir());
    assert!(workspace.path().join("output").is_dir());

    let config: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(workspace.path().join("config.json")).expect("read config"),
    )
    .expect("config json");
    assert!(
        config["upload_folder"]
            .as_str()
            .unwrap()
            .ends_with("incoming")
    );

    salescope(&workspace)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("incoming"));
}

#[test]
fn config_set_with_one_flag_keeps_the_other_path() {
    let workspace = TestWorkspace::new();

    salescope(&workspace)
        .args(["config", "set", "--output-folder", "custom_out"])
        .assert()
        .success();

    salescope(&workspace)
        .args(["config", "set", "--upload-folder", "incoming"])
        .assert()
        .success();

    let config: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(workspace.path().join("config.json")).expect("read config"),
    )
    .expect("config json");
    assert!(
        config["upload_folder"]
            .as_str()
            .unwrap()
            .ends_with("incoming")
    );
    // The earlier output-folder choice survives the upload-only update.
    assert!(
        config["output_folder"]
            .as_str()
            .unwrap()
            .ends_with("custom_out")
    );
}

#[test]
fn reports_lists_generated_files_newest_first() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);

    salescope(&workspace)
        .args([
            "report",
            "-i",
            csv_path.to_str().unwrap(),
            "--product-col",
            "product",
            "--total-col",
            "total",
            "--date-col",
            "date",
        ])
        .assert()
        .success();

    salescope(&workspace)
        .args(["reports"])
        .assert()
        .success()
        .stdout(contains("sales_report"))
        .stdout(contains("Excel"))
        .stdout(contains("PDF"));
}

#[test]
fn history_list_and_show_round_trip() {
    let workspace = TestWorkspace::new();
    let csv_path = workspace.write("sales.csv", DATED_SALES_CSV);

    salescope(&workspace)
        .args([
            "report",
            "-i",
            csv_path.to_str().unwrap(),
            "--product-col",
            "product",
            "--total-col",
            "total",
            "--date-col",
            "date",
        ])
        .assert()
        .success();

    let output = salescope(&workspace)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(contains("revenue 22"))
        .get_output()
        .stdout
        .clone();
    let listing = String::from_utf8(output).unwrap();
    let id = listing
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .expect("entry id");

    salescope(&workspace)
        .args(["history", "show", id])
        .assert()
        .success()
        .stdout(contains("2024-01"))
        .stdout(contains("\"product\": \"A\""));
}
