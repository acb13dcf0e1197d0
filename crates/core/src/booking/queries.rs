//! Appointment read side

use std::sync::Arc;

use petnco_domain::{
    Actor, Appointment, AppointmentFilter, AppointmentId, Page, PageRequest, PetncoError, Result,
};

use super::ports::AppointmentRepository;

/// Filtering, pagination and visibility rules for appointments
pub struct AppointmentQueries {
    appointments: Arc<dyn AppointmentRepository>,
}

impl AppointmentQueries {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    pub async fn list(
        &self,
        filter: &AppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>> {
        filter.validate()?;
        self.appointments.list_appointments(filter, page).await
    }

    /// [`Self::list`] narrowed to what the actor may see
    ///
    /// Staff see everything, a vet sees their own calendar, anyone else only
    /// their own bookings.
    pub async fn list_visible(
        &self,
        actor: &Actor,
        filter: AppointmentFilter,
        page: PageRequest,
    ) -> Result<Page<Appointment>> {
        let filter = visible_filter(actor, filter);
        self.list(&filter, page).await
    }

    pub async fn get(&self, id: AppointmentId) -> Result<Appointment> {
        self.appointments
            .get_appointment(id)
            .await?
            .ok_or_else(|| PetncoError::not_found("appointment", id))
    }

    pub async fn get_visible(&self, actor: &Actor, id: AppointmentId) -> Result<Appointment> {
        let appointment = self.get(id).await?;
        if appointment.user_id == actor.user_id || actor.manages(appointment.vet_id) {
            Ok(appointment)
        } else {
            Err(PetncoError::Forbidden(format!("appointment {id} belongs to another user")))
        }
    }
}

fn visible_filter(actor: &Actor, mut filter: AppointmentFilter) -> AppointmentFilter {
    if actor.is_staff {
        return filter;
    }
    match (actor.vet_id, filter.vet_id) {
        (Some(own), Some(requested)) if own == requested => filter,
        (Some(own), None) if filter.user_id.is_none() => {
            filter.vet_id = Some(own);
            filter
        }
        _ => {
            filter.user_id = Some(actor.user_id);
            filter
        }
    }
}
