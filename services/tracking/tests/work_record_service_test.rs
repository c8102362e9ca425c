//! Integration tests for the work-record service.

use tracking::error::TrackError;
use tracking::models::{
    CreateWorkRecordRequest, OutboundSubtype, UpdateWorkRecordRequest, WorkCategory,
};
use tracking::repositories::InMemoryWorkRecordRepository;
use tracking::rules::{
    DEFAULT_HOURS_PER_SHIFT, DEFAULT_SHIFT_LEAD_HOURS, InboundRuleTable, RuleEngine, RuleSettings,
};
use tracking::service::WorkRecordService;
use uuid::Uuid;

fn service() -> WorkRecordService<InMemoryWorkRecordRepository> {
    let engine = RuleEngine::new(RuleSettings::default(), InboundRuleTable::default()).unwrap();
    WorkRecordService::new(InMemoryWorkRecordRepository::new(), engine)
}

fn request(work_type: &str, date: &str) -> CreateWorkRecordRequest {
    CreateWorkRecordRequest {
        work_type: work_type.into(),
        date: date.into(),
        ..Default::default()
    }
}

fn inbound(rule: &str, holiday: bool, date: &str) -> CreateWorkRecordRequest {
    CreateWorkRecordRequest {
        inbound_rule: Some(rule.into()),
        holiday_call: holiday,
        ..request("inbound", date)
    }
}

fn outbound(hours: f64, subtype: &str, date: &str) -> CreateWorkRecordRequest {
    CreateWorkRecordRequest {
        working_hours: Some(hours),
        outbound_subtype: Some(subtype.into()),
        ..request("outbound", date)
    }
}

#[tokio::test]
async fn shift_lead_gets_fixed_hours() {
    let svc = service();
    let record = svc
        .create(Uuid::new_v4(), request("shift_lead", "2024-05-01"))
        .await
        .unwrap();

    assert_eq!(record.category, WorkCategory::ShiftLead);
    assert_eq!(record.working_hours, DEFAULT_SHIFT_LEAD_HOURS);
    assert_eq!(
        record.working_shifts,
        DEFAULT_SHIFT_LEAD_HOURS / DEFAULT_HOURS_PER_SHIFT
    );
}

#[tokio::test]
async fn inbound_hours_follow_table_and_holiday_flag() {
    let svc = service();
    let user = Uuid::new_v4();
    let table = InboundRuleTable::default();

    for code in ["101", "102", "103", "104", "105"] {
        for holiday in [false, true] {
            let record = svc
                .create(user, inbound(code, holiday, "2024-05-01T08:00:00Z"))
                .await
                .unwrap();

            assert_eq!(record.working_hours, table.get(code).unwrap().hours(holiday));
            assert_eq!(
                record.working_shifts,
                record.working_hours / DEFAULT_HOURS_PER_SHIFT
            );
            assert_eq!(record.inbound_rule.as_deref(), Some(code));
        }
    }
}

#[tokio::test]
async fn outbound_hours_are_validated() {
    let svc = service();
    let user = Uuid::new_v4();

    let err = svc
        .create(user, outbound(0.0, "regular", "2024-05-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackError::InvalidHours));

    let record = svc
        .create(user, outbound(6.5, "regular", "2024-05-01"))
        .await
        .unwrap();
    assert_eq!(record.working_hours, 6.5);
    assert_eq!(record.working_shifts, 1.0);
    assert_eq!(record.outbound_subtype, Some(OutboundSubtype::Regular));

    let missing = CreateWorkRecordRequest {
        working_hours: Some(3.0),
        ..request("outbound", "2024-05-01")
    };
    assert!(matches!(
        svc.create(user, missing).await,
        Err(TrackError::MissingSubtype)
    ));
}

#[tokio::test]
async fn bad_inputs_are_classified() {
    let svc = service();
    let user = Uuid::new_v4();

    assert!(matches!(
        svc.create(user, request("overtime", "2024-05-01")).await,
        Err(TrackError::UnknownWorkType(_))
    ));
    assert!(matches!(
        svc.create(user, inbound("999", false, "2024-05-01")).await,
        Err(TrackError::UnknownRuleCode(_))
    ));
    assert!(matches!(
        svc.create(user, request("inbound", "2024-05-01")).await,
        Err(TrackError::UnknownRuleCode(code)) if code.is_empty()
    ));
    assert!(matches!(
        svc.create(user, request("shift_lead", "May 1st")).await,
        Err(TrackError::ValidationFailure(_))
    ));
    assert!(matches!(
        svc.create(user, outbound(2.0, "weekend", "2024-05-01")).await,
        Err(TrackError::ValidationFailure(_))
    ));
}

#[tokio::test]
async fn holiday_update_recomputes_inbound_hours() {
    let svc = service();
    let user = Uuid::new_v4();
    let record = svc
        .create(user, inbound("102", false, "2024-05-01"))
        .await
        .unwrap();
    assert_eq!(record.working_hours, 11.0);

    let updated = svc
        .update(
            user,
            record.id,
            UpdateWorkRecordRequest {
                holiday_call: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.holiday_call);
    assert_eq!(updated.working_hours, 13.0);
    assert_eq!(updated.working_shifts, 13.0 / DEFAULT_HOURS_PER_SHIFT);
    assert_eq!(updated.date, record.date);

    // Rule 103 has equal columns; flipping the flag keeps hours consistent.
    let flat = svc
        .create(user, inbound("103", false, "2024-05-02"))
        .await
        .unwrap();
    let flipped = svc
        .update(
            user,
            flat.id,
            UpdateWorkRecordRequest {
                holiday_call: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(flipped.working_hours, 10.0);
    assert_eq!(flipped.working_shifts, 10.0 / DEFAULT_HOURS_PER_SHIFT);
}

#[tokio::test]
async fn explicit_outbound_hours_win_and_inbound_ignores_them() {
    let svc = service();
    let user = Uuid::new_v4();

    let out = svc
        .create(user, outbound(3.25, "extra", "2024-05-01"))
        .await
        .unwrap();
    let updated = svc
        .update(
            user,
            out.id,
            UpdateWorkRecordRequest {
                working_hours: Some(13.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.working_hours, 13.0);
    assert_eq!(updated.working_shifts, 2.0);

    let inb = svc
        .create(user, inbound("101", false, "2024-05-01"))
        .await
        .unwrap();
    let ignored = svc
        .update(
            user,
            inb.id,
            UpdateWorkRecordRequest {
                working_hours: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ignored.working_hours, 6.5);
}

#[tokio::test]
async fn category_change_drops_stale_discriminators() {
    let svc = service();
    let user = Uuid::new_v4();
    let record = svc
        .create(user, inbound("104", false, "2024-05-01"))
        .await
        .unwrap();

    let switched = svc
        .update(
            user,
            record.id,
            UpdateWorkRecordRequest {
                work_type: Some("shift_lead".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(switched.category, WorkCategory::ShiftLead);
    assert_eq!(switched.inbound_rule, None);
    assert_eq!(switched.working_hours, DEFAULT_SHIFT_LEAD_HOURS);

    let to_outbound = svc
        .update(
            user,
            record.id,
            UpdateWorkRecordRequest {
                work_type: Some("outbound".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(to_outbound, Err(TrackError::MissingSubtype)));
}

#[tokio::test]
async fn ownership_is_enforced() {
    let svc = service();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let record = svc
        .create(owner, request("shift_lead", "2024-05-01"))
        .await
        .unwrap();

    assert!(matches!(
        svc.get(stranger, record.id).await,
        Err(TrackError::Forbidden)
    ));
    assert!(matches!(
        svc.delete(stranger, record.id).await,
        Err(TrackError::Forbidden)
    ));
    assert!(matches!(
        svc.update(stranger, record.id, UpdateWorkRecordRequest::default())
            .await,
        Err(TrackError::Forbidden)
    ));
    assert!(matches!(
        svc.get(owner, Uuid::new_v4()).await,
        Err(TrackError::NotFound)
    ));

    svc.delete(owner, record.id).await.unwrap();
    assert!(matches!(
        svc.get(owner, record.id).await,
        Err(TrackError::NotFound)
    ));
    assert!(matches!(
        svc.delete(owner, record.id).await,
        Err(TrackError::NotFound)
    ));
}

#[tokio::test]
async fn date_range_is_inclusive_of_whole_days() {
    let svc = service();
    let user = Uuid::new_v4();

    for date in [
        "2024-04-30T23:59:59Z",
        "2024-05-01T00:00:00Z",
        "2024-05-03T23:59:59Z",
        "2024-05-04T00:00:00Z",
    ] {
        svc.create(user, request("shift_lead", date)).await.unwrap();
    }
    svc.create(Uuid::new_v4(), request("shift_lead", "2024-05-02"))
        .await
        .unwrap();

    let in_range = svc
        .list_by_date_range(user, "2024-05-01", "2024-05-03")
        .await
        .unwrap();
    assert_eq!(in_range.len(), 2);
    assert!(in_range[0].date > in_range[1].date);

    assert_eq!(svc.list(user).await.unwrap().len(), 4);

    assert!(matches!(
        svc.list_by_date_range(user, "2024-05-03", "2024-05-01").await,
        Err(TrackError::ValidationFailure(_))
    ));
    assert!(matches!(
        svc.list_by_date_range(user, "2024-05-01", "soon").await,
        Err(TrackError::ValidationFailure(_))
    ));
}

#[tokio::test]
async fn summary_totals_categories_only() {
    let svc = service();
    let user = Uuid::new_v4();

    // 6.5 h shift lead -> 1 shift; 13 h holiday inbound -> 2 shifts;
    // 6.5 h emergency outbound -> 1 shift.
    let engine = RuleEngine::new(
        RuleSettings {
            shift_lead_hours: 6.5,
            ..RuleSettings::default()
        },
        InboundRuleTable::default(),
    )
    .unwrap();
    let svc_six = WorkRecordService::new(InMemoryWorkRecordRepository::new(), engine);

    svc_six
        .create(user, request("shift_lead", "2024-05-01"))
        .await
        .unwrap();
    svc_six
        .create(user, inbound("104", true, "2024-05-02"))
        .await
        .unwrap();
    svc_six
        .create(
            user,
            CreateWorkRecordRequest {
                emergency_call: true,
                ..outbound(6.5, "regular", "2024-05-03")
            },
        )
        .await
        .unwrap();

    let summary = svc_six
        .summary(user, "2024-05-01", "2024-05-31")
        .await
        .unwrap();
    assert_eq!(summary.total_shifts, 4.0);
    assert_eq!(summary.holiday_shifts, 2.0);
    assert_eq!(summary.emergency_shifts, 1.0);
    assert_eq!(summary.record_count, 3);

    let empty = svc.summary(user, "2024-05-01", "2024-05-31").await.unwrap();
    assert_eq!(empty.total_shifts, 0.0);
}
