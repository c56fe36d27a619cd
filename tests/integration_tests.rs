use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{clok, init_db, setup_test_db, temp_out};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates");

    clok()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    clok()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("already initialized"));

    clok()
        .args(["--db", &db_path, "jobs"])
        .assert()
        .success()
        .stdout(contains("default"));
}

#[test]
fn test_in_with_range_then_show_day() {
    let db_path = setup_test_db("in_range_show");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 01:00-02:00"])
        .assert()
        .success()
        .stdout(contains("Recorded session"));

    clok()
        .args(["--db", &db_path, "show", "day", "--key", "2020-09-01"])
        .assert()
        .success()
        .stdout(contains("2020-09-01"))
        .stdout(contains("01:00:00"))
        .stdout(contains("Total Hours Worked: 1.000"));

    clok()
        .args(["--db", &db_path, "show", "week", "--key", "35"])
        .assert()
        .success()
        .stdout(contains("Total Hours Worked: 1.000"));
}

#[test]
fn test_in_with_when_and_out() {
    let db_path = setup_test_db("in_when_out");
    init_db(&db_path);

    clok()
        .args([
            "--db",
            &db_path,
            "in",
            "--when",
            "2020-09-01 9:00am",
            "--out",
            "5:30pm",
        ])
        .assert()
        .success()
        .stdout(contains("09:00:00 to 17:30:00"));

    clok()
        .args(["--db", &db_path, "show", "month", "--key", "9"])
        .assert()
        .success()
        .stdout(contains("Total Hours Worked: 8.500"));
}

#[test]
fn test_out_without_when_is_rejected() {
    let db_path = setup_test_db("out_needs_when");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--out", "17:00"])
        .assert()
        .failure()
        .stderr(contains("--out needs --when"));
}

#[test]
fn test_bad_time_expression() {
    let db_path = setup_test_db("bad_time");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "noon"])
        .assert()
        .failure()
        .stderr(contains("could not parse time string"));

    clok()
        .args(["--db", &db_path, "in", "--when", "_3d"])
        .assert()
        .failure()
        .stderr(contains("unsupported delta unit"));
}

#[test]
fn test_in_out_cycle() {
    let db_path = setup_test_db("in_out_cycle");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "_2m", "-m", "started"])
        .assert()
        .success()
        .stdout(contains("Clocked in at"));

    clok()
        .args(["--db", &db_path, "in"])
        .assert()
        .failure()
        .stderr(contains("already has an open session"));

    clok()
        .args(["--db", &db_path, "out", "-m", "done"])
        .assert()
        .success()
        .stdout(contains("Clocked out of session 1"))
        .stdout(contains("(0h 02m)"));

    clok()
        .args(["--db", &db_path, "out"])
        .assert()
        .failure()
        .stderr(contains("Session 1 is already closed"));

    clok()
        .args(["--db", &db_path, "show", "day", "--journal"])
        .assert()
        .success()
        .stdout(contains("started"))
        .stdout(contains("done"));
}

#[test]
fn test_long_session_asks_before_clock_out() {
    let db_path = setup_test_db("long_session");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "_20h"])
        .assert()
        .success();

    clok()
        .args(["--db", &db_path, "out"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Did you forget to clock out?"))
        .stdout(contains("Operation cancelled."));

    clok()
        .args(["--db", &db_path, "out", "--yes"])
        .assert()
        .success()
        .stdout(contains("Clocked out of session 1"));
}

#[test]
fn test_journal_add_show_delete() {
    let db_path = setup_test_db("journal_cycle");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 01:00-02:00"])
        .assert()
        .success();

    clok()
        .args([
            "--db",
            &db_path,
            "journal",
            "fixed the flaky build",
            "--id",
            "1",
        ])
        .assert()
        .success()
        .stdout(contains("Journal entry 1 added to session 1"));

    clok()
        .args([
            "--db", &db_path, "journal", "--show", "--period", "day", "--key", "20200901",
        ])
        .assert()
        .success()
        .stdout(contains("fixed the flaky build"));

    clok()
        .args(["--db", &db_path, "journal", "--delete", "1"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Journal entry 1 deleted."));

    clok()
        .args([
            "--db", &db_path, "journal", "--show", "--period", "day", "--key", "20200901",
        ])
        .assert()
        .success()
        .stdout(contains("fixed the flaky build").not());
}

#[test]
fn test_switch_and_jobs() {
    let db_path = setup_test_db("switch_jobs");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in"])
        .assert()
        .success();

    clok()
        .args(["--db", &db_path, "switch", "Client-A", "--create"])
        .assert()
        .success()
        .stdout(contains("Created job 'client-a'"))
        .stdout(contains("Clocked out of session 1"))
        .stdout(contains("Current job: client-a"));

    clok()
        .args(["--db", &db_path, "jobs"])
        .assert()
        .success()
        .stdout(contains("default"))
        .stdout(contains("* "))
        .stdout(contains("client-a"));

    clok()
        .args(["--db", &db_path, "switch", "nowhere"])
        .assert()
        .failure()
        .stderr(contains("Not found: job 'nowhere'"));

    clok()
        .args(["--db", &db_path, "jobs", "--add", "client-a"])
        .assert()
        .failure()
        .stderr(contains("Already exists"));
}

#[test]
fn test_show_is_scoped_to_current_job() {
    let db_path = setup_test_db("show_scoped");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 08:00-09:00"])
        .assert()
        .success();
    clok()
        .args(["--db", &db_path, "switch", "work", "--create"])
        .assert()
        .success();
    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 10:00-12:00"])
        .assert()
        .success();

    clok()
        .args(["--db", &db_path, "show", "day", "--key", "2020-09-01"])
        .assert()
        .success()
        .stdout(contains("Total Hours Worked: 2.000"));

    clok()
        .args(["--db", &db_path, "show", "day", "--key", "2020-09-01", "--all"])
        .assert()
        .success()
        .stdout(contains("default"))
        .stdout(contains("Total Hours Worked: 3.000"));
}

#[test]
fn test_delete_session_confirm() {
    let db_path = setup_test_db("delete_confirm");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 01:00-02:00"])
        .assert()
        .success();

    clok()
        .args(["--db", &db_path, "delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    clok()
        .args(["--db", &db_path, "delete", "1"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Deleted session 1."));

    clok()
        .args(["--db", &db_path, "show", "day", "--key", "2020-09-01"])
        .assert()
        .success()
        .stdout(contains("Total Hours Worked: 0.000"));

    clok()
        .args(["--db", &db_path, "delete", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Not found: session with id 1"));
}

#[test]
fn test_clear_day() {
    let db_path = setup_test_db("clear_day");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-01 01:00-02:00"])
        .assert()
        .success();
    clok()
        .args(["--db", &db_path, "in", "--when", "2020-09-02 01:00-02:00"])
        .assert()
        .success();

    clok()
        .args(["--db", &db_path, "clear", "day", "--key", "2020-09-01", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted 1 records."));

    clok()
        .args(["--db", &db_path, "show", "week", "--key", "35"])
        .assert()
        .success()
        .stdout(contains("2020-09-02"))
        .stdout(contains("2020-09-01").not());
}

#[test]
fn test_dump_and_import() {
    let src = setup_test_db("dump_src");
    let dst = setup_test_db("dump_dst");
    let out = temp_out("clok_dump", "json");
    init_db(&src);
    init_db(&dst);

    clok()
        .args([
            "--db",
            &src,
            "in",
            "--when",
            "2020-09-01 01:00-02:00",
            "-m",
            "imported note",
        ])
        .assert()
        .success();

    clok()
        .args(["--db", &src, "dump", &out])
        .assert()
        .success()
        .stdout(contains("Dumped 1 jobs, 1 sessions, 1 journal entries."));

    let json = fs::read_to_string(&out).expect("dump file");
    assert!(json.contains("time_clok_journal"));

    clok()
        .args(["--db", &dst, "import", &out])
        .assert()
        .success()
        .stdout(contains("Imported 0 jobs, 1 sessions, 1 journal entries."))
        .stdout(contains("Skipped 1 jobs"));

    clok()
        .args(["--db", &dst, "show", "day", "--key", "2020-09-01", "--journal"])
        .assert()
        .success()
        .stdout(contains("imported note"))
        .stdout(contains("Total Hours Worked: 1.000"));
}

#[test]
fn test_import_missing_key() {
    let db_path = setup_test_db("import_missing_key");
    let out = temp_out("clok_bad_dump", "json");
    init_db(&db_path);
    fs::write(&out, r#"{"time_clok_jobs": []}"#).unwrap();

    clok()
        .args(["--db", &db_path, "import", &out])
        .assert()
        .failure()
        .stderr(contains("missing key 'time_clok_state'"));
}

#[test]
fn test_log_on_fresh_database() {
    let db_path = setup_test_db("log_fresh");

    clok()
        .args(["--db", &db_path, "log"])
        .assert()
        .success()
        .stdout(contains("Internal log is empty."));
}

#[test]
fn test_repair_and_log() {
    let db_path = setup_test_db("repair_log");
    init_db(&db_path);

    clok()
        .args(["--db", &db_path, "repair"])
        .assert()
        .success()
        .stdout(contains("Nothing to repair."));

    clok()
        .args(["--db", &db_path, "log"])
        .assert()
        .success()
        .stdout(contains("Internal log"))
        .stdout(contains("init").and(contains("repair")));
}
