use chrono::Duration;
use clok::core::jobs::JobRegistry;
use clok::core::query::PeriodQuery;
use clok::core::session::ClockLogic;
use clok::db::log::load_log;
use clok::db::queries;
use clok::utils::time::parse_junction;
use clok::errors::AppError;
use clok::models::period::{PeriodKey, PeriodKind};

mod common;
use common::{at, ctx_at, set_now};

#[test]
fn test_clock_in_and_out_freezes_span() {
    let mut ctx = ctx_at("2020-09-01 01:00:00");

    let opened = ClockLogic::clock_in(&mut ctx, at("2020-09-01 01:00:00")).unwrap();
    assert!(opened.is_open());
    assert_eq!(ctx.state.state().session_id, Some(opened.id));

    set_now(&mut ctx, "2020-09-01 02:00:00");
    let closed = ClockLogic::clock_out(&mut ctx, at("2020-09-01 02:00:00")).unwrap();

    assert_eq!(closed.id, opened.id);
    assert_eq!(closed.time_span(), 3600);
    assert_eq!(closed.date_key(), 20200901);
    assert_eq!(closed.week_key(), 35);
    assert_eq!(closed.month_key(), 9);

    // the closed session stays current
    let current = ctx.state.current_session(ctx.conn()).unwrap().unwrap();
    assert_eq!(current.id, closed.id);
    assert_eq!(current.time_out(), Some(at("2020-09-01 02:00:00")));
}

#[test]
fn test_zero_length_span() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    let t = at("2020-09-01 09:00:00");
    let clok = ClockLogic::create_closed(&mut ctx, t, t).unwrap();
    assert_eq!(clok.time_span(), 0);
    assert!(!clok.is_open());
}

#[test]
fn test_stored_keys_follow_time_in() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");

    let closed =
        ClockLogic::create_closed(&mut ctx, at("2020-09-01 08:00:00"), at("2020-09-01 09:00:00"))
            .unwrap();
    let (start, end) = parse_junction("2020-01-04 11:00pm-11:30pm").unwrap();
    let ranged = ClockLogic::create_closed(&mut ctx, start, end).unwrap();

    for id in [closed.id, ranged.id] {
        let stored = queries::load_session(ctx.conn(), id).unwrap().unwrap();
        assert!(stored.keys_are_current(), "session {}", id);
    }
    let ranged = queries::load_session(ctx.conn(), ranged.id).unwrap().unwrap();
    assert_eq!(ranged.date_key(), 20200104);
    assert_eq!(ranged.week_key(), 0);
    assert_eq!(ranged.month_key(), 1);

    // moving time_in carries the keys and the span along
    let mut moved = queries::load_session(ctx.conn(), closed.id).unwrap().unwrap();
    moved.set_time_in(at("2020-08-31 08:30:00"));
    queries::update_session(ctx.conn(), &moved).unwrap();

    let stored = queries::load_session(ctx.conn(), closed.id).unwrap().unwrap();
    assert!(stored.keys_are_current());
    assert_eq!(stored.date_key(), 20200831);
    assert_eq!(stored.month_key(), 8);
    assert_eq!(stored.time_span(), 24 * 3600 + 1800);
}

#[test]
fn test_audit_log_uses_the_context_clock() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    ClockLogic::clock_in(&mut ctx, at("2020-09-01 08:45:00")).unwrap();

    let log = load_log(ctx.conn()).unwrap();
    let last = log.last().expect("clock in is logged");
    assert_eq!(last.operation, "in");
    assert_eq!(last.date, "2020-09-01 09:00:00");
}

#[test]
fn test_negative_span_is_stored() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    let clok = ClockLogic::create_closed(
        &mut ctx,
        at("2020-09-01 17:00:00"),
        at("2020-09-01 09:00:00"),
    )
    .unwrap();
    assert_eq!(clok.time_span(), -8 * 3600);
}

#[test]
fn test_create_closed_leaves_state_alone() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    ClockLogic::create_closed(&mut ctx, at("2020-09-01 09:00:00"), at("2020-09-01 10:00:00"))
        .unwrap();
    assert_eq!(ctx.state.state().session_id, None);
}

#[test]
fn test_second_open_session_is_rejected() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let first = ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();

    match ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:30:00")) {
        Err(AppError::SessionAlreadyOpen(job, id)) => {
            assert_eq!(job, "default");
            assert_eq!(id, first.id);
        }
        other => panic!("expected SessionAlreadyOpen, got {:?}", other),
    }
}

#[test]
fn test_clock_out_without_open_session() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    assert!(matches!(
        ClockLogic::clock_out(&mut ctx, at("2020-09-01 09:00:00")),
        Err(AppError::NotFound(_))
    ));

    ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();
    let closed = ClockLogic::clock_out(&mut ctx, at("2020-09-01 10:00:00")).unwrap();

    match ClockLogic::clock_out(&mut ctx, at("2020-09-01 11:00:00")) {
        Err(AppError::SessionClosed(id)) => assert_eq!(id, closed.id),
        other => panic!("expected SessionClosed, got {:?}", other),
    }
}

#[test]
fn test_first_clock_in_is_offset() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let clok = ClockLogic::first_clock_in(&mut ctx).unwrap();
    assert_eq!(clok.time_in(), at("2020-09-01 08:55:00"));
}

#[test]
fn test_long_session_warning() {
    let mut ctx = ctx_at("2020-09-01 08:00:00");
    let clok = ClockLogic::clock_in(&mut ctx, at("2020-09-01 08:00:00")).unwrap();

    assert!(ClockLogic::long_session_warning(&ctx, &clok, at("2020-09-01 17:00:00")).is_none());

    let warning = ClockLogic::long_session_warning(&ctx, &clok, at("2020-09-02 09:00:00"))
        .expect("a session open for 25h should warn");
    assert_eq!(warning.session_id, clok.id);
    assert_eq!(warning.open_for, Duration::hours(25));
    assert!(warning.message().contains("25h 00m"));
}

#[test]
fn test_journal_lands_on_current_session() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let clok = ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();
    ClockLogic::clock_out(&mut ctx, at("2020-09-01 10:00:00")).unwrap();

    set_now(&mut ctx, "2020-09-01 10:05:00");
    let entry = ClockLogic::add_journal(&mut ctx, "wrote the report", None).unwrap();
    assert_eq!(entry.session_id, clok.id);
    assert_eq!(entry.time, at("2020-09-01 10:05:00"));

    let stored = queries::load_session(ctx.conn(), clok.id).unwrap().unwrap();
    assert_eq!(stored.journal.len(), 1);
    assert_eq!(stored.journal[0].entry, "wrote the report");
}

#[test]
fn test_journal_needs_a_session() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    assert!(matches!(
        ClockLogic::add_journal(&mut ctx, "orphan", None),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        ClockLogic::add_journal_to(&mut ctx, 42, "orphan", None),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_job_names_are_normalized_and_unique() {
    let ctx = ctx_at("2020-09-01 09:00:00");

    let job = JobRegistry::create(ctx.conn(), "  Work ", ctx.now()).unwrap();
    assert_eq!(job.name, "work");
    assert_eq!(JobRegistry::get_by_name(ctx.conn(), "WORK").unwrap(), job);

    assert!(matches!(
        JobRegistry::create(ctx.conn(), "work", ctx.now()),
        Err(AppError::Duplicate(_))
    ));
    assert!(matches!(
        JobRegistry::create(ctx.conn(), "   ", ctx.now()),
        Err(AppError::Parse(_))
    ));

    let names: Vec<String> = JobRegistry::list(ctx.conn())
        .unwrap()
        .into_iter()
        .map(|j| j.name)
        .collect();
    assert_eq!(names, vec!["default", "work"]);
}

#[test]
fn test_switch_closes_open_session() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let open = ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();

    set_now(&mut ctx, "2020-09-01 11:00:00");
    let outcome = JobRegistry::switch_to(&mut ctx, "Work", true).unwrap();

    assert!(outcome.created);
    assert_eq!(outcome.job.name, "work");
    let closed = outcome.closed.expect("the open session is closed");
    assert_eq!(closed.id, open.id);
    assert_eq!(closed.time_span(), 2 * 3600);

    assert_eq!(ctx.state.state().job_id, Some(outcome.job.id));
    assert_eq!(ctx.state.state().session_id, None);
    assert!(ctx.state.current_session(ctx.conn()).unwrap().is_none());

    // the new job can clock in right away
    let next = ClockLogic::clock_in(&mut ctx, at("2020-09-01 11:00:00")).unwrap();
    assert_eq!(next.job_id, outcome.job.id);
}

#[test]
fn test_switch_to_same_job_is_noop() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let open = ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();

    let outcome = JobRegistry::switch_to(&mut ctx, "default", false).unwrap();
    assert!(outcome.closed.is_none());
    assert!(!outcome.created);
    assert_eq!(ctx.state.state().session_id, Some(open.id));
}

#[test]
fn test_switch_to_unknown_job() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    assert!(matches!(
        JobRegistry::switch_to(&mut ctx, "nowhere", false),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_period_query_is_scoped_to_current_job() {
    let mut ctx = ctx_at("2020-09-01 18:00:00");
    ClockLogic::create_closed(&mut ctx, at("2020-09-01 08:00:00"), at("2020-09-01 09:00:00"))
        .unwrap();
    JobRegistry::switch_to(&mut ctx, "work", true).unwrap();
    ClockLogic::create_closed(&mut ctx, at("2020-09-01 10:00:00"), at("2020-09-01 12:00:00"))
        .unwrap();
    // another day, same week
    ClockLogic::create_closed(&mut ctx, at("2020-08-31 10:00:00"), at("2020-08-31 11:00:00"))
        .unwrap();

    let today = PeriodQuery::get_by_period(&ctx, PeriodKind::Day, PeriodKey::Default, false)
        .unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].time_span(), 2 * 3600);

    let everyone =
        PeriodQuery::get_by_period(&ctx, PeriodKind::Day, PeriodKey::Default, true).unwrap();
    assert_eq!(everyone.len(), 2);
    assert_eq!(everyone[0].time_in(), at("2020-09-01 08:00:00"));

    let week = PeriodQuery::get_by_period(&ctx, PeriodKind::Week, PeriodKey::Explicit(35), false)
        .unwrap();
    assert_eq!(week.len(), 2);
    assert_eq!(PeriodQuery::total_seconds(&week, ctx.now()), 3 * 3600);

    let other_month =
        PeriodQuery::get_by_period(&ctx, PeriodKind::Month, PeriodKey::Explicit(8), true).unwrap();
    assert_eq!(other_month.len(), 1);
}

#[test]
fn test_totals_include_open_sessions() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    ClockLogic::create_closed(&mut ctx, at("2020-09-01 08:00:00"), at("2020-09-01 09:00:00"))
        .unwrap();
    ClockLogic::clock_in(&mut ctx, at("2020-09-01 11:30:00")).unwrap();

    let records =
        PeriodQuery::get_by_period(&ctx, PeriodKind::Day, PeriodKey::Default, false).unwrap();
    assert_eq!(PeriodQuery::total_seconds(&records, ctx.now()), 5400);
}

#[test]
fn test_journals_by_period() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    let a = ClockLogic::create_closed(&mut ctx, at("2020-09-01 08:00:00"), at("2020-09-01 09:00:00"))
        .unwrap();
    let b = ClockLogic::create_closed(&mut ctx, at("2020-08-01 08:00:00"), at("2020-08-01 09:00:00"))
        .unwrap();
    ClockLogic::add_journal_to(&mut ctx, a.id, "today", None).unwrap();
    ClockLogic::add_journal_to(&mut ctx, b.id, "last month", None).unwrap();

    let entries =
        PeriodQuery::journals_by_period(&ctx, PeriodKind::Day, PeriodKey::Default, false).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry, "today");
}

#[test]
fn test_delete_current_session_clears_reference() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    let clok = ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();
    ClockLogic::add_journal(&mut ctx, "soon gone", None).unwrap();

    ClockLogic::delete_session(&mut ctx, clok.id).unwrap();

    assert_eq!(ctx.state.state().session_id, None);
    assert!(queries::load_session(ctx.conn(), clok.id).unwrap().is_none());
    assert!(queries::load_all_journals(ctx.conn()).unwrap().is_empty());
    assert!(matches!(
        ClockLogic::delete_session(&mut ctx, clok.id),
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn test_delete_journal_entry() {
    let mut ctx = ctx_at("2020-09-01 09:00:00");
    ClockLogic::clock_in(&mut ctx, at("2020-09-01 09:00:00")).unwrap();
    let keep = ClockLogic::add_journal(&mut ctx, "keep", None).unwrap();
    let gone = ClockLogic::add_journal(&mut ctx, "gone", None).unwrap();

    ClockLogic::delete_journal(&mut ctx, gone.id).unwrap();

    let left = queries::load_all_journals(ctx.conn()).unwrap();
    assert_eq!(left, vec![keep]);
}

#[test]
fn test_clear_period_only_touches_that_period() {
    let mut ctx = ctx_at("2020-09-01 12:00:00");
    let today = ClockLogic::clock_in(&mut ctx, at("2020-09-01 08:00:00")).unwrap();
    ClockLogic::add_journal(&mut ctx, "today", None).unwrap();
    let yesterday =
        ClockLogic::create_closed(&mut ctx, at("2020-08-31 08:00:00"), at("2020-08-31 09:00:00"))
            .unwrap();
    ClockLogic::add_journal_to(&mut ctx, yesterday.id, "yesterday", None).unwrap();

    let deleted =
        PeriodQuery::clear_period(&mut ctx, PeriodKind::Day, PeriodKey::Default, false).unwrap();

    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].id, today.id);
    assert_eq!(ctx.state.state().session_id, None);

    let remaining = queries::load_all_sessions(ctx.conn()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, yesterday.id);
    assert_eq!(remaining[0].journal.len(), 1);
    assert_eq!(queries::load_all_journals(ctx.conn()).unwrap().len(), 1);
}
