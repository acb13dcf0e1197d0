//! Slot lifecycle tests over the in-memory store

mod support;

use petnco_domain::{
    Actor, CloneMode, ErrorKind, PetncoError, SlotChanges, SlotStatus, TimeSlot, UserId,
};
use support::{client, date, time, utc, Harness};

fn now() -> chrono::DateTime<chrono::Utc> {
    utc(2025, 5, 20, 9, 0)
}

#[tokio::test]
async fn test_create_slot_is_available() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;

    let slot = h.slots.create(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await.unwrap();

    assert_eq!(slot.status, SlotStatus::Available);
    assert_eq!(slot.vet_id, vet_id);
    assert_eq!(h.store.slot(slot.id), slot);
}

#[tokio::test]
async fn test_duration_bounds() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);

    let too_short = h.slots.create(&vet, vet_id, day, time(9, 0), time(9, 59)).await.unwrap_err();
    assert_eq!(too_short.field(), Some("end"));

    let too_long = h.slots.create(&vet, vet_id, day, time(8, 0), time(20, 1)).await.unwrap_err();
    assert_eq!(too_long.field(), Some("end"));

    h.slots.create(&vet, vet_id, day, time(6, 0), time(7, 0)).await.unwrap();
    h.slots.create(&vet, vet_id, day, time(8, 0), time(20, 0)).await.unwrap();
}

#[tokio::test]
async fn test_end_before_start_is_rejected() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;

    let err =
        h.slots.create(&vet, vet_id, date(2025, 6, 1), time(11, 0), time(10, 0)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("end"));
}

#[tokio::test]
async fn test_past_date_and_same_day_grace() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;

    let past =
        h.slots.create(&vet, vet_id, date(2025, 5, 19), time(10, 0), time(11, 0)).await.unwrap_err();
    assert_eq!(past.field(), Some("date"));

    // now is 09:00 and grace is 5 minutes
    let inside_grace =
        h.slots.create(&vet, vet_id, date(2025, 5, 20), time(9, 5), time(10, 5)).await.unwrap_err();
    assert_eq!(inside_grace.field(), Some("start"));

    h.slots.create(&vet, vet_id, date(2025, 5, 20), time(9, 6), time(10, 6)).await.unwrap();
}

#[tokio::test]
async fn test_overlap_is_conflict_but_touching_is_not() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;

    let err = h.slots.create(&vet, vet_id, day, time(9, 30), time(10, 30)).await.unwrap_err();
    assert!(matches!(err, PetncoError::Conflict(_)));

    h.slots.create(&vet, vet_id, day, time(10, 0), time(11, 0)).await.unwrap();
    h.slots.create(&vet, vet_id, day, time(8, 0), time(9, 0)).await.unwrap();
}

#[tokio::test]
async fn test_other_vets_and_dates_do_not_conflict() {
    let h = Harness::at(now());
    let (vet_a, vet_a_id) = h.vet("Dr. Rivera").await;
    let (vet_b, vet_b_id) = h.vet("Dr. Okafor").await;
    h.slot(&vet_a, vet_a_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;

    h.slots.create(&vet_b, vet_b_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await.unwrap();
    h.slots.create(&vet_a, vet_a_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await.unwrap();
}

#[tokio::test]
async fn test_withdrawn_slot_does_not_block() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    let withdrawn = h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;
    h.slots.withdraw(withdrawn.id, &vet).await.unwrap();

    let replacement = h.slots.create(&vet, vet_id, day, time(9, 0), time(10, 0)).await.unwrap();
    assert_ne!(replacement.id, withdrawn.id);
}

#[tokio::test]
async fn test_create_requires_managing_actor() {
    let h = Harness::at(now());
    let (_, vet_id) = h.vet("Dr. Rivera").await;

    let err = h
        .slots
        .create(&client(), vet_id, date(2025, 6, 1), time(9, 0), time(10, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let staff = Actor::staff(UserId::new());
    h.slots.create(&staff, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await.unwrap();
}

#[tokio::test]
async fn test_create_for_unknown_or_revoked_vet() {
    let h = Harness::at(now());
    let staff = Actor::staff(UserId::new());

    let missing = h
        .slots
        .create(&staff, petnco_domain::VetId::new(), date(2025, 6, 1), time(9, 0), time(10, 0))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);

    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    h.catalog.revoke(&vet, vet_id).await.unwrap();
    let revoked = h
        .slots
        .create(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0))
        .await
        .unwrap_err();
    assert_eq!(revoked.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_update_moves_available_slot() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let slot = h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;

    let changes = SlotChanges { start: Some(time(14, 0)), end: Some(time(15, 30)), ..Default::default() };
    let updated = h.slots.update(slot.id, &vet, changes).await.unwrap();

    assert_eq!(updated.start, time(14, 0));
    assert_eq!(updated.end, time(15, 30));
    assert_eq!(h.store.slot(slot.id).start, time(14, 0));
}

#[tokio::test]
async fn test_update_does_not_conflict_with_itself() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let slot = h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(11, 0)).await;

    let changes = SlotChanges { end: Some(time(10, 0)), ..Default::default() };
    let updated = h.slots.update(slot.id, &vet, changes).await.unwrap();

    assert_eq!(updated.end, time(10, 0));
}

#[tokio::test]
async fn test_update_into_neighbour_is_conflict() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    let slot = h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;
    h.slot(&vet, vet_id, day, time(11, 0), time(12, 0)).await;

    let changes = SlotChanges { end: Some(time(11, 30)), ..Default::default() };
    let err = h.slots.update(slot.id, &vet, changes).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(h.store.slot(slot.id).end, time(10, 0));
}

#[tokio::test]
async fn test_update_reserved_slot_is_invalid_state() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let slot = h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;
    h.book(&client(), &slot).await;

    let changes = SlotChanges { start: Some(time(13, 0)), end: Some(time(14, 0)), ..Default::default() };
    let err = h.slots.update(slot.id, &vet, changes).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_delete_reserved_slot_is_refused() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let slot = h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;
    let appointment = h.book(&client(), &slot).await;

    let err = h.slots.delete(slot.id, &vet).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    h.booking.cancel(appointment.id, &vet).await.unwrap();
    h.slots.delete(slot.id, &vet).await.unwrap();

    assert!(h.store.all_slots().is_empty());
    // history survives without its slot
    let history = h.store.appointment(appointment.id);
    assert_eq!(history.slot_id, None);
    assert_eq!(history.start, time(9, 0));
}

#[tokio::test]
async fn test_delete_unknown_slot_is_not_found() {
    let h = Harness::at(now());
    let (vet, _) = h.vet("Dr. Rivera").await;

    let err = h.slots.delete(petnco_domain::SlotId::new(), &vet).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_clone_week_reports_each_date() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    // Monday
    let source = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;
    // Wednesday already busy
    h.slot(&vet, vet_id, date(2025, 6, 4), time(9, 30), time(10, 30)).await;

    let outcomes = h.slots.clone_slot(source.id, &vet, CloneMode::Week, None).await.unwrap();

    assert_eq!(outcomes.len(), 7);
    assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 6);
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].date, date(2025, 6, 4));
    assert_eq!(failed[0].result.as_ref().unwrap_err().kind, ErrorKind::Conflict);

    let created = h.store.all_slots();
    assert_eq!(created.len(), 8);
    assert!(created.iter().all(|s| s.start == time(9, 0) || s.date == date(2025, 6, 4)));
}

#[tokio::test]
async fn test_clone_next_day_and_specific() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let source = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;

    let next = h.slots.clone_slot(source.id, &vet, CloneMode::NextDay, None).await.unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].date, date(2025, 6, 3));
    assert!(next[0].is_success());

    let specific = h
        .slots
        .clone_slot(source.id, &vet, CloneMode::Specific, Some(date(2025, 7, 14)))
        .await
        .unwrap();
    assert_eq!(specific[0].date, date(2025, 7, 14));
    assert!(specific[0].is_success());
}

#[tokio::test]
async fn test_clone_specific_without_target_is_validation() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let source = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;

    let err = h.slots.clone_slot(source.id, &vet, CloneMode::Specific, None).await.unwrap_err();

    assert_eq!(err.field(), Some("target_date"));
    assert_eq!(h.store.all_slots().len(), 1);
}

#[tokio::test]
async fn test_clone_into_past_reports_failure() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let source = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;

    let outcomes = h
        .slots
        .clone_slot(source.id, &vet, CloneMode::Specific, Some(date(2025, 5, 1)))
        .await
        .unwrap();

    let failure = outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(failure.field.as_deref(), Some("date"));
}

#[tokio::test]
async fn test_withdraw_only_available_slots() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    let free = h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;
    let booked = h.slot(&vet, vet_id, day, time(10, 0), time(11, 0)).await;
    h.book(&client(), &booked).await;

    let withdrawn = h.slots.withdraw(free.id, &vet).await.unwrap();
    assert_eq!(withdrawn.status, SlotStatus::Cancelled);
    assert_eq!(h.store.slot(free.id).status, SlotStatus::Cancelled);

    let err = h.slots.withdraw(booked.id, &vet).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_delete_day_skips_reserved() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    let first = h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;
    let booked = h.slot(&vet, vet_id, day, time(10, 0), time(11, 0)).await;
    let last = h.slot(&vet, vet_id, day, time(12, 0), time(13, 0)).await;
    let other_day = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;
    h.book(&client(), &booked).await;

    let outcomes = h.slots.delete_day(&vet, vet_id, day).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].slot_id, first.id);
    assert!(outcomes[0].result.is_ok());
    assert_eq!(outcomes[1].result.as_ref().unwrap_err().kind, ErrorKind::InvalidState);
    assert!(outcomes[2].result.is_ok());

    let remaining: Vec<_> = h.store.all_slots().into_iter().map(|s| s.id).collect();
    assert!(remaining.contains(&booked.id));
    assert!(remaining.contains(&other_day.id));
    assert!(!remaining.contains(&last.id));
}

#[tokio::test]
async fn test_list_available_is_ordered_and_filtered() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let late = h.slot(&vet, vet_id, date(2025, 6, 2), time(9, 0), time(10, 0)).await;
    let afternoon = h.slot(&vet, vet_id, date(2025, 6, 1), time(14, 0), time(15, 0)).await;
    let morning = h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;
    let booked = h.slot(&vet, vet_id, date(2025, 6, 1), time(11, 0), time(12, 0)).await;
    h.book(&client(), &booked).await;
    h.slot(&vet, vet_id, date(2025, 6, 10), time(9, 0), time(10, 0)).await;

    let listed = h.slots.list_available(vet_id, date(2025, 6, 1), date(2025, 6, 2)).await.unwrap();

    let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![morning.id, afternoon.id, late.id]);
}

#[tokio::test]
async fn test_list_available_range_and_vet_checks() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    h.slot(&vet, vet_id, date(2025, 6, 1), time(9, 0), time(10, 0)).await;

    let inverted =
        h.slots.list_available(vet_id, date(2025, 6, 2), date(2025, 6, 1)).await.unwrap_err();
    assert_eq!(inverted.field(), Some("from"));

    let unknown = h
        .slots
        .list_available(petnco_domain::VetId::new(), date(2025, 6, 1), date(2025, 6, 2))
        .await
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    h.catalog.revoke(&vet, vet_id).await.unwrap();
    let hidden = h.slots.list_available(vet_id, date(2025, 6, 1), date(2025, 6, 2)).await.unwrap();
    assert!(hidden.is_empty());
}

#[tokio::test]
async fn test_list_available_hides_expired_slots() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let slot = h.slot(&vet, vet_id, date(2025, 5, 20), time(10, 0), time(11, 0)).await;

    h.clock.set(utc(2025, 5, 20, 10, 6));
    let listed = h.slots.list_available(vet_id, date(2025, 5, 20), date(2025, 5, 20)).await.unwrap();

    assert!(listed.is_empty());
    assert_eq!(h.store.slot(slot.id).status, SlotStatus::Expired);
}

#[tokio::test]
async fn test_vet_schedule_includes_every_status() {
    let h = Harness::at(now());
    let (vet, vet_id) = h.vet("Dr. Rivera").await;
    let day = date(2025, 6, 1);
    let free = h.slot(&vet, vet_id, day, time(9, 0), time(10, 0)).await;
    let booked = h.slot(&vet, vet_id, day, time(10, 0), time(11, 0)).await;
    let withdrawn = h.slot(&vet, vet_id, day, time(11, 0), time(12, 0)).await;
    h.book(&client(), &booked).await;
    h.slots.withdraw(withdrawn.id, &vet).await.unwrap();

    let schedule: Vec<TimeSlot> = h.slots.vet_schedule(&vet, vet_id, day, day).await.unwrap();

    let statuses: Vec<_> = schedule.iter().map(|s| (s.id, s.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (free.id, SlotStatus::Available),
            (booked.id, SlotStatus::Reserved),
            (withdrawn.id, SlotStatus::Cancelled),
        ]
    );

    let err = h.slots.vet_schedule(&client(), vet_id, day, day).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}
