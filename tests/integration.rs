//! Integration tests for the payroll engine.
//!
//! This test suite covers the end-to-end scenarios:
//! - Time-in / time-out day flows through the HTTP API
//! - Work-window rejections
//! - Orphan time-outs
//! - Weekly salary computation and the cash-advance carryover
//! - Rollover idempotence
//! - Frame recognition through the double acceptance gate
//! - Universal invariants as property tests

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::attendance::{AttendanceAction, OutcomeStatus, SessionMachine, StatsProjector};
use payroll_engine::clock::FixedClock;
use payroll_engine::config::{EnginePolicy, RecognitionThresholds, WorkWindow};
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    AttendanceStatus, NewAttendance, NewEmployee, NewPayroll, Payroll, PayrollStatus,
};
use payroll_engine::payroll::{PeriodEngine, compute_salary, confirm_payroll};
use payroll_engine::recognition::{
    ENCODING_LEN, EnrollmentCache, FaceAnalyzer, FaceEncoding, FaceRegion, Frame,
    RecognitionVerdict, Recognizer,
};
use payroll_engine::store::{
    AttendanceRepo, EmployeeRepo, HistoryRepo, MemoryStore, PayrollRepo,
};

// =============================================================================
// Test helpers
// =============================================================================

/// Deterministic face backend: one face per frame unless the frame is
/// all black, encoded as the first pixel scaled to [0, 1].
struct LumaStub;

impl FaceAnalyzer for LumaStub {
    fn detect_faces(&self, frame: &Frame) -> Vec<FaceRegion> {
        if frame.data().first().copied().unwrap_or(0) == 0 {
            return vec![];
        }
        vec![FaceRegion {
            top: 0,
            right: frame.width(),
            bottom: frame.height(),
            left: 0,
        }]
    }

    fn encode(&self, frame: &Frame, _region: &FaceRegion) -> Option<FaceEncoding> {
        let mut values = vec![0.0; ENCODING_LEN];
        values[0] = frame.data()[0] as f64 / 255.0;
        Some(FaceEncoding::new(values).unwrap())
    }
}

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
        .unwrap()
}

fn png_bytes(value: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([value, value, value]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn create_test_router(store: Arc<MemoryStore>, now: NaiveDateTime) -> Router {
    let state = AppState::new(
        store,
        Arc::new(LumaStub),
        Arc::new(FixedClock(now)),
        EnginePolicy::default(),
    );
    create_router(state)
}

fn seed_employee(store: &MemoryStore, first: &str, portrait: Vec<u8>) -> u64 {
    store
        .insert_employee(NewEmployee {
            first_name: first.to_string(),
            last_name: "Dela Cruz".to_string(),
            date_of_birth: make_date("1990-01-15"),
            date_of_employment: make_date("2026-03-02"),
            portrait,
        })
        .unwrap()
        .id
}

fn record_presence(store: &MemoryStore, employee_id: u64, date: &str) {
    let date = make_date(date);
    let now = NaiveDateTime::new(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    store
        .insert_attendance(
            NewAttendance {
                employee_id,
                date,
                time_in: Some(now.time()),
                time_out: Some(NaiveTime::from_hms_opt(16, 0, 0).unwrap()),
                hours_worked: Decimal::new(700, 2),
                status: AttendanceStatus::Present,
            },
            now,
        )
        .unwrap();
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

// =============================================================================
// Scenario: a full attendance day through the API
// =============================================================================

#[tokio::test]
async fn test_time_in_warn_then_time_out_flow() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));

    // 09:00 time in succeeds.
    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "09:00:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_in"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Time in recorded at 09:00:00.");
    assert_eq!(body["has_open_session"], true);

    // 09:05 second time in warns and writes nothing.
    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "09:05:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_in"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "warning");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("already have an open session")
    );

    // 12:00 time out closes the session with 3.00 hours.
    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "12:00:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_out"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["has_open_session"], false);

    let rows = store
        .attendance_on(id, make_date("2026-03-02"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].time_in, NaiveTime::from_hms_opt(9, 0, 0));
    assert_eq!(rows[0].time_out, NaiveTime::from_hms_opt(12, 0, 0));
    assert_eq!(rows[0].hours_worked, Decimal::new(300, 2));

    // The stats projector ran: one working day, one presence.
    let employee = store.employee(id).unwrap();
    assert_eq!(employee.days_worked, 1);
    assert_eq!(employee.absences, 0);
}

#[tokio::test]
async fn test_orphan_time_out_via_api() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));

    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "17:00:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_out"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "warning");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("needs admin adjustment")
    );

    let rows = store.attendance_on(id, make_date("2026-03-02")).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].time_in.is_none());
    assert_eq!(rows[0].time_out, NaiveTime::from_hms_opt(17, 0, 0));
    assert_eq!(rows[0].status, AttendanceStatus::Absent);
}

#[tokio::test]
async fn test_early_time_in_rejected_via_api() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));

    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "07:30:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_in"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVARIANT_VIOLATION");
    assert_eq!(body["message"], "Cannot time in before 8:00 AM.");
    assert!(store.attendance_on(id, make_date("2026-03-02")).unwrap().is_empty());
}

#[tokio::test]
async fn test_late_time_out_rejected_via_api() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));

    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "09:00:00"));
    post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_in"}),
    )
    .await;

    let router = create_test_router(store.clone(), make_datetime("2026-03-02", "17:30:00"));
    let (status, body) = post_json(
        router,
        "/attendance",
        json!({"employee_id": id, "action": "time_out"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot time out after 5:00 PM.");
}

// =============================================================================
// Scenario: weekly salary and cash-advance carryover
// =============================================================================

#[test]
fn test_salary_prices_week_and_ignores_cash_advance() {
    let store = MemoryStore::new();
    let id = seed_employee(&store, "Juan", png_bytes(100));
    // Five present days Monday through Friday.
    for date in [
        "2026-03-02",
        "2026-03-03",
        "2026-03-04",
        "2026-03-05",
        "2026-03-06",
    ] {
        record_presence(&store, id, date);
    }
    store
        .insert_payroll(NewPayroll {
            employee_id: id,
            rate: Decimal::new(500, 0),
            incentives: Decimal::new(100, 0),
            deductions: Decimal::new(50, 0),
            cash_advance: Decimal::new(200, 0),
            salary: Decimal::ZERO,
            payment_date: make_date("2026-03-07"),
            status: PayrollStatus::Pending,
        })
        .unwrap();

    let clock = FixedClock(make_datetime("2026-03-06", "18:00:00"));
    let engine = PeriodEngine::new(&store, &clock, Weekday::Sat);
    let payroll = engine.current_payroll(id).unwrap();

    // 500 * 5 + 100 - 50; the cash advance is not part of the formula.
    assert_eq!(payroll.salary, Decimal::new(2450, 0).round_dp(2));
    assert_eq!(payroll.cash_advance, Decimal::new(200, 0));
}

#[test]
fn test_rollover_carries_cash_advance_into_deductions() {
    let store = MemoryStore::new();
    let id = seed_employee(&store, "Juan", png_bytes(100));
    for date in ["2026-03-02", "2026-03-03", "2026-03-04", "2026-03-05", "2026-03-06"] {
        record_presence(&store, id, date);
    }
    store
        .insert_payroll(NewPayroll {
            employee_id: id,
            rate: Decimal::new(500, 0),
            incentives: Decimal::new(100, 0),
            deductions: Decimal::new(50, 0),
            cash_advance: Decimal::new(200, 0),
            salary: Decimal::ZERO,
            payment_date: make_date("2026-03-07"),
            status: PayrollStatus::Pending,
        })
        .unwrap();

    let clock = FixedClock(make_datetime("2026-03-07", "10:00:00"));
    let outcome = confirm_payroll(&store, &clock, Weekday::Sat).unwrap();
    assert_eq!(outcome.processed, 1);

    let rows = store.payrolls_for_employee(id).unwrap();
    let processed = rows
        .iter()
        .find(|row| row.status == PayrollStatus::Processed)
        .unwrap();
    assert_eq!(processed.salary, Decimal::new(2450, 0).round_dp(2));
    assert_eq!(processed.cash_advance, Decimal::new(200, 0));

    let pending = rows.iter().find(|row| row.is_pending()).unwrap();
    assert_eq!(pending.rate, Decimal::new(500, 0));
    assert_eq!(pending.incentives, Decimal::ZERO);
    assert_eq!(pending.deductions, Decimal::new(200, 0));
    assert_eq!(pending.cash_advance, Decimal::ZERO);
    assert_eq!(pending.salary, Decimal::ZERO);
    // Next Saturday after the rollover day.
    assert_eq!(pending.payment_date, make_date("2026-03-14"));
}

#[tokio::test]
async fn test_payroll_flow_through_api() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));
    record_presence(&store, id, "2026-03-02");
    store
        .insert_payroll(NewPayroll {
            employee_id: id,
            rate: Decimal::new(500, 0),
            incentives: Decimal::ZERO,
            deductions: Decimal::ZERO,
            cash_advance: Decimal::ZERO,
            salary: Decimal::ZERO,
            payment_date: make_date("2026-03-07"),
            status: PayrollStatus::Pending,
        })
        .unwrap();
    let now = make_datetime("2026-03-02", "18:00:00");

    // Add incentives.
    let router = create_test_router(store.clone(), now);
    let (status, body) = post_json(
        router,
        "/payroll/incentives",
        json!({"employee_id": id, "action": "add", "amount": "100"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payroll: Payroll = serde_json::from_value(body).unwrap();
    assert_eq!(payroll.incentives, Decimal::new(100, 0));
    assert_eq!(payroll.salary, Decimal::new(600, 0).round_dp(2));

    // Grant a cash advance; salary is unchanged.
    let router = create_test_router(store.clone(), now);
    let (status, body) = post_json(
        router,
        "/payroll/cash-advance",
        json!({"employee_id": id, "amount": "250"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payroll: Payroll = serde_json::from_value(body).unwrap();
    assert_eq!(payroll.cash_advance, Decimal::new(250, 0));
    assert_eq!(payroll.salary, Decimal::new(600, 0).round_dp(2));

    // Confirm payroll.
    let router = create_test_router(store.clone(), make_datetime("2026-03-07", "09:00:00"));
    let (status, body) = post_json(router, "/payroll/confirm", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], 1);

    // The fresh period carries the advance as a deduction.
    let router = create_test_router(store.clone(), make_datetime("2026-03-09", "09:00:00"));
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/payroll/current?employee_id={}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payroll: Payroll = serde_json::from_slice(&body_bytes).unwrap();
    assert!(payroll.is_pending());
    assert_eq!(payroll.deductions, Decimal::new(250, 0));
    assert_eq!(payroll.cash_advance, Decimal::ZERO);
}

#[test]
fn test_negative_gross_clamps_to_zero() {
    // One present day at rate 500 against deductions 5000.
    let salary = compute_salary(
        Decimal::new(500, 0),
        Decimal::ZERO,
        Decimal::new(5000, 0),
        1,
    );
    assert_eq!(salary, Decimal::ZERO);
}

// =============================================================================
// Scenario: recognition through the double gate
// =============================================================================

#[test]
fn test_recognition_accepts_close_face_and_rejects_far_face() {
    let store = MemoryStore::new();
    let id = seed_employee(&store, "Juan", png_bytes(0x40)); // 64/255 ≈ 0.251

    let cache = EnrollmentCache::new();
    let templates = cache.templates(&store, &LumaStub).unwrap();
    assert_eq!(templates.len(), 1);
    let recognizer = Recognizer::new(RecognitionThresholds::default());

    // Probe at 166/255 ≈ 0.651: distance ≈ 0.4 from the template, accepted.
    let close = Frame::decode(&png_bytes(166)).unwrap();
    match recognizer.recognize(&close, &templates, &LumaStub) {
        RecognitionVerdict::Recognized { employee_id, .. } => assert_eq!(employee_id, id),
        other => panic!("expected Recognized, got {:?}", other),
    }

    // Probe at 230/255 ≈ 0.902: distance ≈ 0.65, past both gates.
    let far = Frame::decode(&png_bytes(230)).unwrap();
    assert_eq!(
        recognizer.recognize(&far, &templates, &LumaStub),
        RecognitionVerdict::Unknown
    );
}

#[tokio::test]
async fn test_recognize_endpoint_returns_waiting_without_face() {
    let store = Arc::new(MemoryStore::new());
    seed_employee(&store, "Juan", png_bytes(100));
    let router = create_test_router(store, make_datetime("2026-03-02", "09:00:00"));

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/recognize")
                .body(Body::from(png_bytes(0)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let verdict: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(verdict["status"], "waiting");
}

// =============================================================================
// Status endpoint history window
// =============================================================================

#[tokio::test]
async fn test_status_history_defaults_to_thirty_days() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_employee(&store, "Juan", png_bytes(100));
    record_presence(&store, id, "2026-03-02");
    record_presence(&store, id, "2026-03-20");
    // Well outside the 30-day window.
    record_presence(&store, id, "2026-01-05");

    let router = create_test_router(store, make_datetime("2026-03-23", "09:00:00"));
    let (status, body) = post_json(
        router,
        "/attendance/status",
        json!({"employee_id": id}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_open_session"], false);
    let history = body["history_logs"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Newest first.
    assert_eq!(history[0]["date"], "2026-03-20");
    assert_eq!(history[1]["date"], "2026-03-02");
}

// =============================================================================
// Universal invariants
// =============================================================================

fn arbitrary_action() -> impl Strategy<Value = AttendanceAction> {
    prop_oneof![
        Just(AttendanceAction::TimeIn),
        Just(AttendanceAction::TimeOut),
        Just(AttendanceAction::Auto),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// At most one open session per employee-day, and every stored row
    /// respects the time ordering and work-window bounds.
    #[test]
    fn prop_session_machine_preserves_row_invariants(
        steps in prop::collection::vec((arbitrary_action(), 6u32..20, 0u32..60), 1..12)
    ) {
        let store = MemoryStore::new();
        let id = seed_employee(&store, "Juan", png_bytes(100));
        let employee = store.employee(id).unwrap();
        let machine = SessionMachine::new(&store, WorkWindow::default());

        let mut times: Vec<(u32, u32)> = steps.iter().map(|s| (s.1, s.2)).collect();
        times.sort();
        for ((action, _, _), (hour, minute)) in steps.iter().zip(times) {
            let now = NaiveDateTime::new(
                make_date("2026-03-02"),
                NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            );
            // Window rejections are expected for out-of-window samples.
            let _ = machine.apply(&employee, *action, now);
        }

        let rows = store.attendance_on(id, make_date("2026-03-02")).unwrap();
        prop_assert!(rows.iter().filter(|row| row.is_open()).count() <= 1);
        for row in &rows {
            if let (Some(t_in), Some(t_out)) = (row.time_in, row.time_out) {
                prop_assert!(t_in < t_out);
            }
            if let Some(t_in) = row.time_in {
                prop_assert!(t_in >= NaiveTime::from_hms_opt(8, 0, 0).unwrap());
            }
            if let Some(t_out) = row.time_out {
                prop_assert!(t_out <= NaiveTime::from_hms_opt(17, 0, 0).unwrap());
            }
            if row.status == AttendanceStatus::Present {
                prop_assert!(row.time_in.is_some());
            }
        }
    }

    /// At most one PENDING payroll per employee across arbitrary period
    /// operations and rollovers.
    #[test]
    fn prop_single_pending_payroll(ops in prop::collection::vec(0u8..4, 1..10)) {
        let store = MemoryStore::new();
        let clock = FixedClock(make_datetime("2026-03-02", "09:00:00"));
        let engine = PeriodEngine::new(&store, &clock, Weekday::Sat);
        let employee = engine
            .register_employee(
                NewEmployee {
                    first_name: "Juan".to_string(),
                    last_name: "Dela Cruz".to_string(),
                    date_of_birth: make_date("1990-01-15"),
                    date_of_employment: make_date("2026-03-02"),
                    portrait: vec![0xFF, 0xD8],
                },
                Decimal::new(500, 0),
            )
            .unwrap();

        for op in ops {
            match op {
                0 => {
                    engine.current_payroll(employee.id).unwrap();
                }
                1 => {
                    engine
                        .grant_cash_advance(employee.id, Decimal::new(50, 0))
                        .unwrap();
                }
                2 => {
                    confirm_payroll(&store, &clock, Weekday::Sat).unwrap();
                }
                _ => {
                    engine
                        .update_incentives(
                            employee.id,
                            payroll_engine::payroll::IncentiveAction::Add,
                            Decimal::new(10, 0),
                        )
                        .unwrap();
                }
            }
            let pending = store
                .payrolls_for_employee(employee.id)
                .unwrap()
                .into_iter()
                .filter(|row| row.is_pending())
                .count();
            prop_assert!(pending <= 1);
        }
    }

    /// The salary formula holds for every priced payroll.
    #[test]
    fn prop_salary_formula(
        rate in 0u32..2000,
        incentives in 0u32..1000,
        deductions in 0u32..5000,
        count in 0u32..7,
    ) {
        let salary = compute_salary(
            Decimal::from(rate),
            Decimal::from(incentives),
            Decimal::from(deductions),
            count,
        );
        let gross = Decimal::from(rate) * Decimal::from(count) + Decimal::from(incentives)
            - Decimal::from(deductions);
        prop_assert!(salary >= Decimal::ZERO);
        prop_assert_eq!(salary, gross.max(Decimal::ZERO).round_dp(2));
    }

    /// Recognition is a pure function of frame and templates.
    #[test]
    fn prop_recognition_is_deterministic(probe in 1u8..=255, reference in 1u8..=255) {
        let store = MemoryStore::new();
        seed_employee(&store, "Juan", png_bytes(reference));
        let cache = EnrollmentCache::new();
        let templates = cache.templates(&store, &LumaStub).unwrap();
        let recognizer = Recognizer::new(RecognitionThresholds::default());

        let frame = Frame::decode(&png_bytes(probe)).unwrap();
        let first = recognizer.recognize(&frame, &templates, &LumaStub);
        let second = recognizer.recognize(&frame, &templates, &LumaStub);
        prop_assert_eq!(first, second);
    }

    /// Two successive stats refreshes with no writes in between agree.
    #[test]
    fn prop_stats_refresh_converges(days in prop::collection::btree_set(0u64..20, 0..10)) {
        let store = MemoryStore::new();
        let id = seed_employee(&store, "Juan", png_bytes(100));
        let start = make_date("2026-03-02");
        for offset in days {
            let date = start.checked_add_days(chrono::Days::new(offset)).unwrap();
            let now = NaiveDateTime::new(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
            store
                .insert_attendance(
                    NewAttendance {
                        employee_id: id,
                        date,
                        time_in: Some(now.time()),
                        time_out: None,
                        hours_worked: Decimal::ZERO,
                        status: AttendanceStatus::Present,
                    },
                    now,
                )
                .unwrap();
        }

        let projector = StatsProjector::new(&store, Weekday::Sun);
        projector.refresh(id, make_date("2026-03-25")).unwrap();
        let first = store.employee(id).unwrap();
        projector.refresh(id, make_date("2026-03-25")).unwrap();
        let second = store.employee(id).unwrap();

        prop_assert_eq!(first.days_worked, second.days_worked);
        prop_assert_eq!(first.absences, second.absences);
    }
}

/// Rollover on an empty PENDING set is a no-op, twice over.
#[test]
fn test_empty_rollover_is_idempotent() {
    let store = MemoryStore::new();
    let clock = FixedClock(make_datetime("2026-03-07", "10:00:00"));

    let first = confirm_payroll(&store, &clock, Weekday::Sat).unwrap();
    let second = confirm_payroll(&store, &clock, Weekday::Sat).unwrap();

    assert_eq!(first.processed, 0);
    assert_eq!(second.processed, 0);
    assert!(store.history().unwrap().is_empty());
}

/// A warning outcome leaves the machine usable for the rest of the day.
#[test]
fn test_warning_does_not_wedge_the_session_machine() {
    let store = MemoryStore::new();
    let id = seed_employee(&store, "Juan", png_bytes(100));
    let employee = store.employee(id).unwrap();
    let machine = SessionMachine::new(&store, WorkWindow::default());

    machine
        .apply(&employee, AttendanceAction::TimeIn, make_datetime("2026-03-02", "09:00:00"))
        .unwrap();
    let warning = machine
        .apply(&employee, AttendanceAction::TimeIn, make_datetime("2026-03-02", "09:01:00"))
        .unwrap();
    assert_eq!(warning.status, OutcomeStatus::Warning);

    let out = machine
        .apply(&employee, AttendanceAction::Auto, make_datetime("2026-03-02", "15:00:00"))
        .unwrap();
    assert_eq!(out.status, OutcomeStatus::Success);
    assert!(!out.has_open_session);
}

/// Duplicate enrollment is rejected with an invariant violation.
#[test]
fn test_duplicate_employee_rejected() {
    let store = MemoryStore::new();
    seed_employee(&store, "Juan", png_bytes(100));

    let result = store.insert_employee(NewEmployee {
        first_name: "Juan".to_string(),
        last_name: "Dela Cruz".to_string(),
        date_of_birth: make_date("1990-01-15"),
        date_of_employment: make_date("2026-04-01"),
        portrait: png_bytes(50),
    });
    assert!(matches!(result, Err(EngineError::InvariantViolation { .. })));
}
