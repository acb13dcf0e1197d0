//! Slot management commands

use chrono::{NaiveDate, NaiveTime};
use petnco_domain::{
    Actor, CloneMode, CloneOutcome, DeleteOutcome, Result, SlotChanges, SlotId, TimeSlot, VetId,
};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn create_slot(
    ctx: &AppContext,
    actor: &Actor,
    vet_id: VetId,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<TimeSlot> {
    execute_command("slots::create", || ctx.slots.create(actor, vet_id, date, start, end)).await
}

pub async fn update_slot(
    ctx: &AppContext,
    actor: &Actor,
    slot_id: SlotId,
    changes: SlotChanges,
) -> Result<TimeSlot> {
    execute_command("slots::update", || ctx.slots.update(slot_id, actor, changes)).await
}

pub async fn delete_slot(ctx: &AppContext, actor: &Actor, slot_id: SlotId) -> Result<()> {
    execute_command("slots::delete", || ctx.slots.delete(slot_id, actor)).await
}

pub async fn clone_slot(
    ctx: &AppContext,
    actor: &Actor,
    slot_id: SlotId,
    mode: CloneMode,
    target_date: Option<NaiveDate>,
) -> Result<Vec<CloneOutcome>> {
    execute_command("slots::clone", || ctx.slots.clone_slot(slot_id, actor, mode, target_date))
        .await
}

pub async fn withdraw_slot(ctx: &AppContext, actor: &Actor, slot_id: SlotId) -> Result<TimeSlot> {
    execute_command("slots::withdraw", || ctx.slots.withdraw(slot_id, actor)).await
}

pub async fn list_available_slots(
    ctx: &AppContext,
    vet_id: VetId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<TimeSlot>> {
    execute_command("slots::list_available", || ctx.slots.list_available(vet_id, from, to)).await
}

pub async fn vet_schedule(
    ctx: &AppContext,
    actor: &Actor,
    vet_id: VetId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<TimeSlot>> {
    execute_command("slots::vet_schedule", || ctx.slots.vet_schedule(actor, vet_id, from, to)).await
}

pub async fn delete_day(
    ctx: &AppContext,
    actor: &Actor,
    vet_id: VetId,
    date: NaiveDate,
) -> Result<Vec<DeleteOutcome>> {
    execute_command("slots::delete_day", || ctx.slots.delete_day(actor, vet_id, date)).await
}
