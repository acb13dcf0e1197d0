//! Booking commands

use petnco_domain::{
    Actor, Appointment, AppointmentFilter, AppointmentId, BookingNotice, NoticeKind, Page,
    PageRequest, Result, ServiceId, SlotId,
};
use tracing::warn;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn reserve_slot(
    ctx: &AppContext,
    actor: &Actor,
    slot_id: SlotId,
    service_ids: &[ServiceId],
    notes: &str,
) -> Result<Appointment> {
    let appointment = execute_command("appointments::reserve", || {
        ctx.booking.reserve(actor, slot_id, service_ids, notes)
    })
    .await?;

    notify(ctx, NoticeKind::Reserved, &appointment).await;
    Ok(appointment)
}

/// Cancel an appointment
///
/// With `withdraw_slot` the vet also takes the slot off sale instead of
/// reopening it.
pub async fn cancel_appointment(
    ctx: &AppContext,
    actor: &Actor,
    appointment_id: AppointmentId,
    withdraw_slot: bool,
) -> Result<Appointment> {
    let appointment = execute_command("appointments::cancel", || async {
        if withdraw_slot {
            ctx.booking.cancel_and_withdraw(appointment_id, actor).await
        } else {
            ctx.booking.cancel(appointment_id, actor).await
        }
    })
    .await?;

    notify(ctx, NoticeKind::Cancelled, &appointment).await;
    Ok(appointment)
}

pub async fn confirm_appointment(
    ctx: &AppContext,
    actor: &Actor,
    appointment_id: AppointmentId,
) -> Result<Appointment> {
    execute_command("appointments::confirm", || ctx.booking.confirm(appointment_id, actor)).await
}

pub async fn complete_appointment(
    ctx: &AppContext,
    actor: &Actor,
    appointment_id: AppointmentId,
) -> Result<Appointment> {
    execute_command("appointments::complete", || ctx.booking.complete(appointment_id, actor)).await
}

pub async fn list_appointments(
    ctx: &AppContext,
    actor: &Actor,
    filter: AppointmentFilter,
    page: PageRequest,
) -> Result<Page<Appointment>> {
    execute_command("appointments::list", || ctx.queries.list_visible(actor, filter, page)).await
}

pub async fn get_appointment(
    ctx: &AppContext,
    actor: &Actor,
    appointment_id: AppointmentId,
) -> Result<Appointment> {
    execute_command("appointments::get", || ctx.queries.get_visible(actor, appointment_id)).await
}

async fn notify(ctx: &AppContext, kind: NoticeKind, appointment: &Appointment) {
    let notice = BookingNotice::for_appointment(kind, appointment);
    if let Err(err) = ctx.notifier.notify(&notice).await {
        warn!(
            appointment_id = %appointment.id,
            kind = ?kind,
            error = %err,
            "booking notification failed"
        );
    }
}
