#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use clok::core::context::{AppContext, Settings};
use clok::db::pool::DbPool;
use clok::utils::clock::FixedClock;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn clok() -> Command {
    cargo_bin_cmd!("clok")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_clok.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a fresh DB through the CLI
pub fn init_db(db_path: &str) {
    clok()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// `YYYY-MM-DD HH:MM:SS` to a timestamp
pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test timestamp")
}

/// In-memory context whose clock is frozen at `now`
pub fn ctx_at(now: &str) -> AppContext {
    let pool = DbPool::in_memory().expect("in-memory db");
    AppContext::with_pool(pool, Box::new(FixedClock(at(now))), Settings::default())
        .expect("context")
}

/// Move the frozen clock of a context
pub fn set_now(ctx: &mut AppContext, now: &str) {
    ctx.clock = Box::new(FixedClock(at(now)));
}
