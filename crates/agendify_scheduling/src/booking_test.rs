#[cfg(test)]
mod tests {
    use crate::booking::{
        BookingService, BookingStores, ClientRef, CreateAppointmentRequest, CreateServiceRequest,
        NewClientPayload, RescheduleRequest, SharedCalendar, WorkDayPayload,
    };
    use crate::error::SchedulingError;
    use agendify_common::services::{BoxFuture, BoxedError, EventDraft, RemoteEvent, StaffCalendar};
    use agendify_common::{CallerContext, Role};
    use agendify_config::{GoogleConfig, SchedulingConfig};
    use agendify_db::{
        Appointment, AppointmentRepository, AppointmentStatus, CatalogRepository, Client,
        ClientRepository, DbError, GuardedWrite, NewClient, NewServiceOffering, ReschedulePatch,
        ServiceOffering, Staff, StaffRepository, WorkDayTemplate, WorkScheduleRepository,
    };
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    const TZ: Tz = Tz::America__Sao_Paulo;

    // Monday, deterministic
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        TZ.from_local_datetime(&monday().and_hms_opt(hour, minute, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    // --- In-memory stores ---

    #[derive(Default)]
    struct InMemoryAppointments {
        rows: Mutex<HashMap<Uuid, Appointment>>,
    }

    impl AppointmentRepository for InMemoryAppointments {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Box::pin(async { Ok(()) })
        }

        fn insert_if_free(&self, appointment: Appointment) -> BoxFuture<'_, bool, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                let clash = rows.values().any(|existing| {
                    existing.staff_id == appointment.staff_id
                        && existing.status != AppointmentStatus::Cancelled
                        && appointment.start_time < existing.end_time
                        && appointment.end_time > existing.start_time
                });
                if clash {
                    return Ok(false);
                }
                rows.insert(appointment.id, appointment);
                Ok(true)
            })
        }

        fn reschedule_if_free(
            &self,
            tenant_id: Uuid,
            id: Uuid,
            patch: ReschedulePatch,
        ) -> BoxFuture<'_, GuardedWrite, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                match rows.get(&id) {
                    Some(current)
                        if current.tenant_id == tenant_id
                            && current.status != AppointmentStatus::Cancelled => {}
                    _ => return Ok(GuardedWrite::Missing),
                }
                let clash = rows.values().any(|existing| {
                    existing.id != id
                        && existing.staff_id == patch.staff_id
                        && existing.status != AppointmentStatus::Cancelled
                        && patch.start_time < existing.end_time
                        && patch.end_time > existing.start_time
                });
                if clash {
                    return Ok(GuardedWrite::SlotTaken);
                }
                let row = rows.get_mut(&id).unwrap();
                row.staff_id = patch.staff_id;
                row.service_id = patch.service_id;
                row.start_time = patch.start_time;
                row.end_time = patch.end_time;
                row.status = AppointmentStatus::Rescheduled;
                Ok(GuardedWrite::Applied)
            })
        }

        fn cancel(
            &self,
            tenant_id: Uuid,
            id: Uuid,
        ) -> BoxFuture<'_, Option<Appointment>, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                let Some(row) = rows.get_mut(&id) else {
                    return Ok(None);
                };
                if row.tenant_id != tenant_id || row.status == AppointmentStatus::Cancelled {
                    return Ok(None);
                }
                let before = row.clone();
                row.status = AppointmentStatus::Cancelled;
                Ok(Some(before))
            })
        }

        fn find_by_id(
            &self,
            tenant_id: Uuid,
            id: Uuid,
        ) -> BoxFuture<'_, Option<Appointment>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .get(&id)
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned())
            })
        }

        fn list_active_for_staff(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<Appointment> = rows
                    .values()
                    .filter(|row| {
                        row.tenant_id == tenant_id
                            && row.staff_id == staff_id
                            && row.status != AppointmentStatus::Cancelled
                            && row.start_time >= from
                            && row.start_time < to
                    })
                    .cloned()
                    .collect();
                hits.sort_by_key(|row| row.start_time);
                Ok(hits)
            })
        }

        fn list_in_range(
            &self,
            tenant_id: Uuid,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<Appointment> = rows
                    .values()
                    .filter(|row| {
                        row.tenant_id == tenant_id
                            && row.start_time >= from
                            && row.start_time < to
                    })
                    .cloned()
                    .collect();
                hits.sort_by_key(|row| row.start_time);
                Ok(hits)
            })
        }

        fn set_external_event_id(
            &self,
            id: Uuid,
            event_id: Option<&str>,
        ) -> BoxFuture<'_, (), DbError> {
            let event_id = event_id.map(str::to_string);
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                if let Some(row) = rows.get_mut(&id) {
                    row.external_event_id = event_id;
                }
                Ok(())
            })
        }
    }

    #[derive(Default)]
    struct InMemoryClients {
        rows: Mutex<HashMap<Uuid, Client>>,
    }

    impl ClientRepository for InMemoryClients {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Box::pin(async { Ok(()) })
        }

        fn upsert(&self, tenant_id: Uuid, client: NewClient) -> BoxFuture<'_, Client, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                if let Some(existing) = rows
                    .values_mut()
                    .find(|row| row.tenant_id == tenant_id && row.cpf == client.cpf)
                {
                    existing.name = client.name;
                    existing.phone = client.phone;
                    existing.email = client.email;
                    return Ok(existing.clone());
                }
                let row = Client {
                    id: Uuid::new_v4(),
                    tenant_id,
                    name: client.name,
                    cpf: client.cpf,
                    phone: client.phone,
                    email: client.email,
                    created_at: Utc::now(),
                };
                rows.insert(row.id, row.clone());
                Ok(row)
            })
        }

        fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Client>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .get(&id)
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned())
            })
        }

        fn search(&self, tenant_id: Uuid, query: &str) -> BoxFuture<'_, Vec<Client>, DbError> {
            let query = query.to_lowercase();
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<Client> = rows
                    .values()
                    .filter(|row| {
                        row.tenant_id == tenant_id
                            && (row.name.to_lowercase().contains(&query)
                                || row.cpf.contains(&query))
                    })
                    .cloned()
                    .collect();
                hits.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(hits)
            })
        }
    }

    #[derive(Default)]
    struct InMemoryCatalog {
        rows: Mutex<HashMap<Uuid, ServiceOffering>>,
    }

    impl CatalogRepository for InMemoryCatalog {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Box::pin(async { Ok(()) })
        }

        fn create(
            &self,
            tenant_id: Uuid,
            offering: NewServiceOffering,
        ) -> BoxFuture<'_, ServiceOffering, DbError> {
            Box::pin(async move {
                let row = ServiceOffering {
                    id: Uuid::new_v4(),
                    tenant_id,
                    name: offering.name,
                    price_minor: offering.price_minor,
                    duration_minutes: offering.duration_minutes,
                    created_at: Utc::now(),
                };
                self.rows.lock().unwrap().insert(row.id, row.clone());
                Ok(row)
            })
        }

        fn find_by_id(
            &self,
            tenant_id: Uuid,
            id: Uuid,
        ) -> BoxFuture<'_, Option<ServiceOffering>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .get(&id)
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned())
            })
        }

        fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<ServiceOffering>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<ServiceOffering> = rows
                    .values()
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned()
                    .collect();
                hits.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(hits)
            })
        }
    }

    #[derive(Default)]
    struct InMemorySchedules {
        rows: Mutex<Vec<WorkDayTemplate>>,
    }

    impl WorkScheduleRepository for InMemorySchedules {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Box::pin(async { Ok(()) })
        }

        fn find_day(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
            day_of_week: u8,
        ) -> BoxFuture<'_, Option<WorkDayTemplate>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .iter()
                    .find(|row| {
                        row.tenant_id == tenant_id
                            && row.staff_id == staff_id
                            && row.day_of_week == day_of_week
                    })
                    .cloned())
            })
        }

        fn week(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
        ) -> BoxFuture<'_, Vec<WorkDayTemplate>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<WorkDayTemplate> = rows
                    .iter()
                    .filter(|row| row.tenant_id == tenant_id && row.staff_id == staff_id)
                    .cloned()
                    .collect();
                hits.sort_by_key(|row| row.day_of_week);
                Ok(hits)
            })
        }

        fn replace_week(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
            week: Vec<WorkDayTemplate>,
        ) -> BoxFuture<'_, (), DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                rows.retain(|row| !(row.tenant_id == tenant_id && row.staff_id == staff_id));
                rows.extend(week);
                Ok(())
            })
        }
    }

    #[derive(Default)]
    struct InMemoryStaff {
        rows: Mutex<HashMap<Uuid, Staff>>,
    }

    impl StaffRepository for InMemoryStaff {
        fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
            Box::pin(async { Ok(()) })
        }

        fn upsert(&self, staff: Staff) -> BoxFuture<'_, Staff, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                let row = rows.entry(staff.id).or_insert_with(|| staff.clone());
                row.full_name = staff.full_name.clone();
                row.role = staff.role;
                Ok(row.clone())
            })
        }

        fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> BoxFuture<'_, Option<Staff>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .get(&id)
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned())
            })
        }

        fn list(&self, tenant_id: Uuid) -> BoxFuture<'_, Vec<Staff>, DbError> {
            Box::pin(async move {
                let rows = self.rows.lock().unwrap();
                let mut hits: Vec<Staff> = rows
                    .values()
                    .filter(|row| row.tenant_id == tenant_id)
                    .cloned()
                    .collect();
                hits.sort_by(|a, b| a.full_name.cmp(&b.full_name));
                Ok(hits)
            })
        }

        fn save_refresh_token(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
            token: &str,
        ) -> BoxFuture<'_, (), DbError> {
            let token = token.to_string();
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                let row = rows.entry(staff_id).or_insert_with(|| Staff {
                    id: staff_id,
                    tenant_id,
                    full_name: String::new(),
                    role: Role::Staff,
                    google_refresh_token: None,
                });
                row.google_refresh_token = Some(token);
                Ok(())
            })
        }

        fn clear_refresh_token(
            &self,
            tenant_id: Uuid,
            staff_id: Uuid,
        ) -> BoxFuture<'_, bool, DbError> {
            Box::pin(async move {
                let mut rows = self.rows.lock().unwrap();
                let Some(row) = rows.get_mut(&staff_id) else {
                    return Ok(false);
                };
                if row.tenant_id != tenant_id {
                    return Ok(false);
                }
                Ok(row.google_refresh_token.take().is_some())
            })
        }
    }

    // --- Recording calendar double ---

    #[derive(Default)]
    struct RecordingCalendar {
        fail: Mutex<bool>,
        unlinked: Mutex<HashSet<Uuid>>,
        created: Mutex<Vec<(Uuid, EventDraft)>>,
        updated: Mutex<Vec<(Uuid, String, EventDraft)>>,
        deleted: Mutex<Vec<(Uuid, String)>>,
        agenda: Mutex<Vec<RemoteEvent>>,
        counter: Mutex<usize>,
    }

    impl RecordingCalendar {
        fn fail_next_calls(&self) {
            *self.fail.lock().unwrap() = true;
        }

        fn unlink(&self, staff_id: Uuid) {
            self.unlinked.lock().unwrap().insert(staff_id);
        }
    }

    impl StaffCalendar for RecordingCalendar {
        type Error = BoxedError;

        fn create_event(
            &self,
            staff_id: Uuid,
            draft: EventDraft,
        ) -> BoxFuture<'_, Option<String>, BoxedError> {
            Box::pin(async move {
                if *self.fail.lock().unwrap() {
                    return Err(BoxedError("provider down".into()));
                }
                if self.unlinked.lock().unwrap().contains(&staff_id) {
                    return Ok(None);
                }
                let mut counter = self.counter.lock().unwrap();
                *counter += 1;
                let event_id = format!("evt-{}", *counter);
                self.created.lock().unwrap().push((staff_id, draft));
                Ok(Some(event_id))
            })
        }

        fn update_event(
            &self,
            staff_id: Uuid,
            event_id: &str,
            draft: EventDraft,
        ) -> BoxFuture<'_, (), BoxedError> {
            let event_id = event_id.to_string();
            Box::pin(async move {
                if *self.fail.lock().unwrap() {
                    return Err(BoxedError("provider down".into()));
                }
                self.updated.lock().unwrap().push((staff_id, event_id, draft));
                Ok(())
            })
        }

        fn delete_event(&self, staff_id: Uuid, event_id: &str) -> BoxFuture<'_, (), BoxedError> {
            let event_id = event_id.to_string();
            Box::pin(async move {
                if *self.fail.lock().unwrap() {
                    return Err(BoxedError("provider down".into()));
                }
                self.deleted.lock().unwrap().push((staff_id, event_id));
                Ok(())
            })
        }

        fn list_events(
            &self,
            _staff_id: Uuid,
            _start_time: DateTime<Utc>,
            _end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<RemoteEvent>, BoxedError> {
            Box::pin(async move {
                if *self.fail.lock().unwrap() {
                    return Err(BoxedError("provider down".into()));
                }
                Ok(self.agenda.lock().unwrap().clone())
            })
        }
    }

    // --- Fixture ---

    struct TestBooking {
        service: BookingService,
        appointments: Arc<InMemoryAppointments>,
        clients: Arc<InMemoryClients>,
        catalog: Arc<InMemoryCatalog>,
        schedules: Arc<InMemorySchedules>,
        staff: Arc<InMemoryStaff>,
        calendar: Arc<RecordingCalendar>,
    }

    fn google_config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            redirect_uri: "https://app.example.com/oauth/callback".to_string(),
        }
    }

    fn harness(calendar_enabled: bool) -> TestBooking {
        let appointments = Arc::new(InMemoryAppointments::default());
        let clients = Arc::new(InMemoryClients::default());
        let catalog = Arc::new(InMemoryCatalog::default());
        let schedules = Arc::new(InMemorySchedules::default());
        let staff = Arc::new(InMemoryStaff::default());
        let calendar = Arc::new(RecordingCalendar::default());

        let stores = BookingStores {
            appointments: appointments.clone(),
            clients: clients.clone(),
            catalog: catalog.clone(),
            schedules: schedules.clone(),
            staff: staff.clone(),
        };
        let shared = calendar_enabled.then(|| calendar.clone() as SharedCalendar);
        let service = BookingService::new(
            stores,
            shared,
            SchedulingConfig::default(),
            Some(google_config()),
        );

        TestBooking {
            service,
            appointments,
            clients,
            catalog,
            schedules,
            staff,
            calendar,
        }
    }

    fn caller() -> CallerContext {
        CallerContext::new(Uuid::new_v4(), Uuid::new_v4(), Role::Staff)
    }

    fn admin() -> CallerContext {
        CallerContext::new(Uuid::new_v4(), Uuid::new_v4(), Role::Admin)
    }

    async fn seed_service(booking: &TestBooking, tenant_id: Uuid, name: &str, duration: i64) -> ServiceOffering {
        booking
            .catalog
            .create(
                tenant_id,
                NewServiceOffering {
                    name: name.to_string(),
                    price_minor: 8000,
                    duration_minutes: duration,
                },
            )
            .await
            .unwrap()
    }

    fn seed_monday_template(booking: &TestBooking, tenant_id: Uuid, staff_id: Uuid, start: &str, end: &str) {
        booking.schedules.rows.lock().unwrap().push(WorkDayTemplate {
            staff_id,
            tenant_id,
            day_of_week: 1,
            is_active: true,
            start_time: start.to_string(),
            end_time: end.to_string(),
        });
    }

    fn inline_client(name: &str, cpf: &str, phone: &str) -> ClientRef {
        ClientRef::New(NewClientPayload {
            name: name.to_string(),
            cpf: cpf.to_string(),
            phone: phone.to_string(),
            email: None,
        })
    }

    fn create_request(staff_id: Uuid, service_id: Uuid, slot: &str) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            staff_id,
            service_id,
            client: inline_client("Maria Souza", "12345678901", "+55 11 91234-5678"),
            date: monday(),
            slot: slot.to_string(),
        }
    }

    fn stored_appointment(
        tenant_id: Uuid,
        staff_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            tenant_id,
            staff_id,
            service_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            start_time: start,
            end_time: end,
            status: AppointmentStatus::Scheduled,
            external_event_id: None,
            created_at: at(8, 0),
        }
    }

    // --- Slot calculation ---

    #[tokio::test]
    async fn test_available_slots_walk_the_template_window() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        seed_monday_template(&booking, ctx.tenant_id, staff_id, "09:00", "12:00");

        let slots = booking
            .service
            .available_slots(ctx, staff_id, service.id, monday())
            .await
            .unwrap();

        assert_eq!(
            slots,
            vec![
                "09:00", "09:15", "09:30", "09:45", "10:00", "10:15", "10:30", "10:45", "11:00"
            ]
        );
    }

    #[tokio::test]
    async fn test_available_slots_exclude_booked_intervals() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        seed_monday_template(&booking, ctx.tenant_id, staff_id, "09:00", "12:00");

        // Existing booking from 10:00 to 11:00
        let row = stored_appointment(ctx.tenant_id, staff_id, at(10, 0), at(11, 0));
        booking.appointments.rows.lock().unwrap().insert(row.id, row);

        let slots = booking
            .service
            .available_slots(ctx, staff_id, service.id, monday())
            .await
            .unwrap();

        assert_eq!(slots, vec!["09:00", "11:00"]);
    }

    #[tokio::test]
    async fn test_available_slots_empty_without_active_template() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        // No template saved for Monday at all
        let slots = booking
            .service
            .available_slots(ctx, staff_id, service.id, monday())
            .await
            .unwrap();
        assert!(slots.is_empty());

        // An inactive day behaves the same
        booking.schedules.rows.lock().unwrap().push(WorkDayTemplate {
            staff_id,
            tenant_id: ctx.tenant_id,
            day_of_week: 1,
            is_active: false,
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
        });
        let slots = booking
            .service
            .available_slots(ctx, staff_id, service.id, monday())
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_available_slots_require_a_known_service() {
        let booking = harness(true);
        let ctx = caller();

        let err = booking
            .service
            .available_slots(ctx, Uuid::new_v4(), Uuid::new_v4(), monday())
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(_)));
    }

    // --- Create ---

    #[tokio::test]
    async fn test_create_books_and_mirrors_the_event() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        assert_eq!(appointment.start_time, at(9, 30));
        assert_eq!(appointment.end_time, at(10, 30));
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.external_event_id.as_deref(), Some("evt-1"));

        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.external_event_id.as_deref(), Some("evt-1"));

        let created = booking.calendar.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let (event_staff, draft) = &created[0];
        assert_eq!(*event_staff, staff_id);
        assert_eq!(draft.summary, "Corte de cabelo - Maria Souza");
        assert_eq!(
            draft.description.as_deref(),
            Some("Booking for Maria Souza (phone: +55 11 91234-5678).")
        );
        assert_eq!(draft.start_time, at(9, 30));
        assert_eq!(draft.end_time, at(10, 30));
    }

    #[tokio::test]
    async fn test_create_rejects_a_taken_slot() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();
        // Overlapping interval, different start
        let err = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "10:00"))
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::Conflict(_)));
        assert_eq!(booking.appointments.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_racing_creates_commit_exactly_once() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let request = create_request(staff_id, service.id, "09:30");
        let (first, second) = tokio::join!(
            booking.service.create(ctx, request.clone()),
            booking.service.create(ctx, request),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "Exactly one of two racing creates may win");
        assert_eq!(booking.appointments.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_survives_a_calendar_outage() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        booking.calendar.fail_next_calls();

        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        assert_eq!(appointment.external_event_id, None);
        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
        assert_eq!(stored.external_event_id, None);
    }

    #[tokio::test]
    async fn test_create_without_linked_calendar_stores_no_event_id() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        booking.calendar.unlink(staff_id);

        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        assert_eq!(appointment.external_event_id, None);
        assert!(booking.calendar.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_upserts_clients_by_cpf() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let first = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:00"))
            .await
            .unwrap();

        // Same CPF, refreshed phone, different slot
        let mut request = create_request(staff_id, service.id, "14:00");
        request.client = inline_client("Maria Souza", "12345678901", "+55 11 99999-0000");
        let second = booking.service.create(ctx, request).await.unwrap();

        assert_eq!(first.client_id, second.client_id);
        let clients = booking.clients.rows.lock().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[&first.client_id].phone, "+55 11 99999-0000");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_client_reference() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let mut request = create_request(staff_id, service.id, "09:00");
        request.client = ClientRef::Existing {
            client_id: Uuid::new_v4(),
        };
        let err = booking.service.create(ctx, request).await.unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(_)));
        assert!(booking.appointments.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_client_fields_and_slot() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let mut request = create_request(staff_id, service.id, "09:00");
        request.client = inline_client("", "12345678901", "+55 11 91234-5678");
        let err = booking.service.create(ctx, request).await.unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        let err = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "9am"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        assert!(booking.appointments.rows.lock().unwrap().is_empty());
    }

    // --- Cancel ---

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_deletes_the_event_once() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        let cancelled = booking.service.cancel(ctx, appointment.id).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);

        // A second cancel finds nothing live and must not touch the provider
        let err = booking.service.cancel(ctx, appointment.id).await.unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound(_)));

        let deleted = booking.calendar.deleted.lock().unwrap();
        assert_eq!(deleted.as_slice(), &[(staff_id, "evt-1".to_string())]);
    }

    #[tokio::test]
    async fn test_cancel_is_scoped_to_the_tenant() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        let err = booking
            .service
            .cancel(caller(), appointment.id)
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(_)));
        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
        assert!(booking.calendar.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_survives_a_calendar_outage() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        booking.calendar.fail_next_calls();
        let cancelled = booking.service.cancel(ctx, appointment.id).await.unwrap();

        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.status, AppointmentStatus::Cancelled);
    }

    // --- Reschedule ---

    fn reschedule_request(staff_id: Uuid, service_id: Uuid, slot: &str) -> RescheduleRequest {
        RescheduleRequest {
            staff_id,
            service_id,
            date: monday(),
            slot: slot.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reschedule_conflict_leaves_the_row_untouched() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:00"))
            .await
            .unwrap();

        // Another booking already holds 14:00
        let other = stored_appointment(ctx.tenant_id, staff_id, at(14, 0), at(15, 0));
        booking
            .appointments
            .rows
            .lock()
            .unwrap()
            .insert(other.id, other);

        let err = booking
            .service
            .reschedule(
                ctx,
                appointment.id,
                reschedule_request(staff_id, service.id, "14:30"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::Conflict(_)));
        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.start_time, at(9, 0));
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_reschedule_updates_the_event_in_place_for_same_staff() {
        let booking = harness(true);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:30"))
            .await
            .unwrap();

        let moved = booking
            .service
            .reschedule(
                ctx,
                appointment.id,
                reschedule_request(staff_id, service.id, "14:00"),
            )
            .await
            .unwrap();

        assert_eq!(moved.start_time, at(14, 0));
        assert_eq!(moved.end_time, at(15, 0));
        assert_eq!(moved.status, AppointmentStatus::Rescheduled);
        assert_eq!(moved.external_event_id.as_deref(), Some("evt-1"));

        let updated = booking.calendar.updated.lock().unwrap();
        assert_eq!(updated.len(), 1);
        let (event_staff, event_id, draft) = &updated[0];
        assert_eq!(*event_staff, staff_id);
        assert_eq!(event_id, "evt-1");
        assert_eq!(draft.start_time, at(14, 0));
        // An in-place update leaves the stored description alone
        assert!(draft.description.is_none());
        assert!(booking.calendar.deleted.lock().unwrap().is_empty());
        assert!(booking.calendar.created.lock().unwrap().len() == 1);
    }

    #[tokio::test]
    async fn test_reschedule_moves_the_event_across_staff() {
        let booking = harness(true);
        let ctx = caller();
        let old_staff = Uuid::new_v4();
        let new_staff = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;
        let appointment = booking
            .service
            .create(ctx, create_request(old_staff, service.id, "09:30"))
            .await
            .unwrap();

        let moved = booking
            .service
            .reschedule(
                ctx,
                appointment.id,
                reschedule_request(new_staff, service.id, "10:00"),
            )
            .await
            .unwrap();

        assert_eq!(moved.staff_id, new_staff);
        assert_eq!(moved.external_event_id.as_deref(), Some("evt-2"));

        let deleted = booking.calendar.deleted.lock().unwrap();
        assert_eq!(deleted.as_slice(), &[(old_staff, "evt-1".to_string())]);
        let created = booking.calendar.created.lock().unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[1].0, new_staff);

        let stored = booking.appointments.rows.lock().unwrap()[&appointment.id].clone();
        assert_eq!(stored.external_event_id.as_deref(), Some("evt-2"));
    }

    #[tokio::test]
    async fn test_reschedule_never_materializes_a_missing_mirror() {
        let booking = harness(true);
        let ctx = caller();
        let old_staff = Uuid::new_v4();
        let new_staff = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        // Booked while the staff member had no linked calendar
        booking.calendar.unlink(old_staff);
        let appointment = booking
            .service
            .create(ctx, create_request(old_staff, service.id, "09:30"))
            .await
            .unwrap();
        assert_eq!(appointment.external_event_id, None);

        let moved = booking
            .service
            .reschedule(
                ctx,
                appointment.id,
                reschedule_request(new_staff, service.id, "10:00"),
            )
            .await
            .unwrap();

        assert_eq!(moved.external_event_id, None);
        assert!(booking.calendar.created.lock().unwrap().is_empty());
        assert!(booking.calendar.updated.lock().unwrap().is_empty());
        assert!(booking.calendar.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reschedule_requires_a_live_appointment() {
        let booking = harness(false);
        let ctx = caller();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let err = booking
            .service
            .reschedule(
                ctx,
                Uuid::new_v4(),
                reschedule_request(Uuid::new_v4(), service.id, "10:00"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::NotFound(_)));
    }

    // --- Ledger window ---

    #[tokio::test]
    async fn test_list_appointments_includes_cancelled_rows() {
        let booking = harness(false);
        let ctx = caller();
        let staff_id = Uuid::new_v4();
        let service = seed_service(&booking, ctx.tenant_id, "Corte de cabelo", 60).await;

        let kept = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "09:00"))
            .await
            .unwrap();
        let dropped = booking
            .service
            .create(ctx, create_request(staff_id, service.id, "14:00"))
            .await
            .unwrap();
        booking.service.cancel(ctx, dropped.id).await.unwrap();

        let listed = booking
            .service
            .list_appointments(ctx, monday(), monday())
            .await
            .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, kept.id);
        assert_eq!(listed[1].status, AppointmentStatus::Cancelled);

        let err = booking
            .service
            .list_appointments(ctx, monday(), monday().pred_opt().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));
    }

    // --- Work schedules ---

    #[tokio::test]
    async fn test_week_schedule_fills_missing_days_with_defaults() {
        let booking = harness(false);
        let ctx = caller();

        let week = booking.service.week_schedule(ctx).await.unwrap();

        assert_eq!(week.len(), 7);
        assert_eq!(
            week.iter().map(|day| day.day_of_week).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6, 0],
            "Week runs Monday through Sunday"
        );
        for day in &week {
            assert_eq!(day.start_time, "09:00");
            assert_eq!(day.end_time, "18:00");
            assert_eq!(day.is_active, day.day_of_week != 0, "Only Sunday rests");
        }
    }

    #[tokio::test]
    async fn test_week_schedule_keeps_saved_days() {
        let booking = harness(false);
        let ctx = caller();
        booking.schedules.rows.lock().unwrap().push(WorkDayTemplate {
            staff_id: ctx.user_id,
            tenant_id: ctx.tenant_id,
            day_of_week: 1,
            is_active: true,
            start_time: "07:30".to_string(),
            end_time: "13:00".to_string(),
        });

        let week = booking.service.week_schedule(ctx).await.unwrap();

        assert_eq!(week[0].start_time, "07:30");
        assert_eq!(week[0].end_time, "13:00");
        assert_eq!(week[1].start_time, "09:00");
    }

    fn full_week() -> Vec<WorkDayPayload> {
        (0..7u8)
            .map(|day| WorkDayPayload {
                day_of_week: day,
                is_active: day != 0,
                start_time: "09:00".to_string(),
                end_time: "18:00".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_replace_week_stores_exactly_seven_rows() {
        let booking = harness(false);
        let ctx = caller();

        booking
            .service
            .replace_week_schedule(ctx, full_week())
            .await
            .unwrap();

        let rows = booking.schedules.rows.lock().unwrap();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|row| row.staff_id == ctx.user_id));
    }

    #[tokio::test]
    async fn test_replace_week_rejects_malformed_weeks() {
        let booking = harness(false);
        let ctx = caller();

        // Too short
        let err = booking
            .service
            .replace_week_schedule(ctx, full_week()[..6].to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        // Duplicate weekday
        let mut week = full_week();
        week[6].day_of_week = 1;
        let err = booking
            .service
            .replace_week_schedule(ctx, week)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        // Unparseable time
        let mut week = full_week();
        week[2].start_time = "25:00".to_string();
        let err = booking
            .service
            .replace_week_schedule(ctx, week)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        // Active day with an inverted window
        let mut week = full_week();
        week[3].start_time = "18:00".to_string();
        week[3].end_time = "09:00".to_string();
        let err = booking
            .service
            .replace_week_schedule(ctx, week)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Validation(_)));

        assert!(booking.schedules.rows.lock().unwrap().is_empty());
    }

    // --- Catalog & clients ---

    #[tokio::test]
    async fn test_create_service_is_admin_only() {
        let booking = harness(false);

        let request = CreateServiceRequest {
            name: "Corte de cabelo".to_string(),
            price_minor: 8000,
            duration_minutes: 45,
        };
        let err = booking
            .service
            .create_service(caller(), request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));

        let ctx = admin();
        let created = booking.service.create_service(ctx, request).await.unwrap();
        assert_eq!(created.tenant_id, ctx.tenant_id);
        assert_eq!(created.duration_minutes, 45);
    }

    #[tokio::test]
    async fn test_create_service_validates_fields() {
        let booking = harness(false);
        let ctx = admin();

        let blank_name = CreateServiceRequest {
            name: "  ".to_string(),
            price_minor: 8000,
            duration_minutes: 45,
        };
        assert!(matches!(
            booking.service.create_service(ctx, blank_name).await,
            Err(SchedulingError::Validation(_))
        ));

        let zero_duration = CreateServiceRequest {
            name: "Corte".to_string(),
            price_minor: 8000,
            duration_minutes: 0,
        };
        assert!(matches!(
            booking.service.create_service(ctx, zero_duration).await,
            Err(SchedulingError::Validation(_))
        ));

        let negative_price = CreateServiceRequest {
            name: "Corte".to_string(),
            price_minor: -1,
            duration_minutes: 30,
        };
        assert!(matches!(
            booking.service.create_service(ctx, negative_price).await,
            Err(SchedulingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_clients_is_tenant_scoped() {
        let booking = harness(false);
        let ctx = caller();
        let other_tenant = Uuid::new_v4();
        booking
            .clients
            .upsert(
                ctx.tenant_id,
                NewClient {
                    name: "Maria Souza".to_string(),
                    cpf: "12345678901".to_string(),
                    phone: "+55 11 91234-5678".to_string(),
                    email: None,
                },
            )
            .await
            .unwrap();
        booking
            .clients
            .upsert(
                other_tenant,
                NewClient {
                    name: "Maria Oliveira".to_string(),
                    cpf: "98765432109".to_string(),
                    phone: "+55 21 95555-0000".to_string(),
                    email: None,
                },
            )
            .await
            .unwrap();

        let hits = booking.service.search_clients(ctx, "maria").await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Maria Souza");
    }

    // --- Calendar connection ---

    #[tokio::test]
    async fn test_calendar_auth_url_carries_the_caller_as_state() {
        let booking = harness(true);
        let ctx = caller();

        let url = booking.service.calendar_auth_url(ctx).unwrap();

        assert!(url.contains("client-123"));
        assert!(url.contains(&ctx.user_id.to_string()));
        assert!(url.contains("access_type=offline"));
    }

    #[tokio::test]
    async fn test_calendar_operations_need_google_config() {
        let booking = harness(true);
        let stores = BookingStores {
            appointments: booking.appointments.clone(),
            clients: booking.clients.clone(),
            catalog: booking.catalog.clone(),
            schedules: booking.schedules.clone(),
            staff: booking.staff.clone(),
        };
        let bare = BookingService::new(stores, None, SchedulingConfig::default(), None);
        let ctx = caller();

        assert!(matches!(
            bare.calendar_auth_url(ctx),
            Err(SchedulingError::CalendarUnavailable(_))
        ));
        assert!(matches!(
            bare.connect_calendar(ctx, "code").await,
            Err(SchedulingError::CalendarUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_calendar_rejects_blank_codes() {
        let booking = harness(true);

        let err = booking
            .service
            .connect_calendar(caller(), "  ")
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_disconnect_calendar_clears_the_stored_token() {
        let booking = harness(true);
        let ctx = caller();
        booking
            .staff
            .save_refresh_token(ctx.tenant_id, ctx.user_id, "refresh-token")
            .await
            .unwrap();

        booking.service.disconnect_calendar(ctx).await.unwrap();
        let stored = booking.staff.rows.lock().unwrap()[&ctx.user_id].clone();
        assert_eq!(stored.google_refresh_token, None);

        // Disconnecting again is a quiet no-op
        booking.service.disconnect_calendar(ctx).await.unwrap();
    }

    // --- Agenda ---

    #[tokio::test]
    async fn test_agenda_lists_provider_events() {
        let booking = harness(true);
        let ctx = caller();
        booking.calendar.agenda.lock().unwrap().push(RemoteEvent {
            event_id: "evt-9".to_string(),
            title: "Corte de cabelo - Maria Souza".to_string(),
            start: Some("2025-03-10T12:30:00-03:00".to_string()),
            end: Some("2025-03-10T13:30:00-03:00".to_string()),
        });

        let events = booking.service.agenda(ctx, None, None).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "evt-9");
    }

    #[tokio::test]
    async fn test_agenda_reports_provider_failures() {
        let booking = harness(true);
        booking.calendar.fail_next_calls();

        let err = booking
            .service
            .agenda(caller(), None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, SchedulingError::CalendarUnavailable(_)));
    }

    #[tokio::test]
    async fn test_agenda_requires_a_configured_calendar_and_sane_window() {
        let booking = harness(false);
        assert!(matches!(
            booking.service.agenda(caller(), None, None).await,
            Err(SchedulingError::CalendarUnavailable(_))
        ));

        let booking = harness(true);
        let from = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 3, 10, 11, 0, 0).unwrap();
        assert!(matches!(
            booking.service.agenda(caller(), Some(from), Some(to)).await,
            Err(SchedulingError::Validation(_))
        ));
    }
}
