use async_trait::async_trait;
use chrono::Utc;
use futures::join;

use appointment_cell::models::Appointment;
use appointment_cell::services::appointment::AppointmentClient;
use patient_cell::services::patient::PatientClient;
use pharmacy_cell::models::InventoryItem;
use pharmacy_cell::services::pharmacy::PharmacyClient;
use shared_models::{PageRequest, PortalError};
use shared_screens::{render_table, split_first_word, Screen, ScreenEvent};

/// One panel on the dashboard. Panels load independently, so a failed
/// source blanks its own panel and leaves the rest standing.
enum Card<T> {
    Loading,
    Ready(T),
    Unavailable(String),
}

impl<T> Card<T> {
    fn from_result(result: Result<T, PortalError>) -> Self {
        match result {
            Ok(value) => Card::Ready(value),
            Err(err) => Card::Unavailable(err.notice_text()),
        }
    }
}

/// Landing screen: patient volume, today's schedule and stock alerts,
/// pulled from three gateway resources at once.
pub struct DashboardScreen {
    patients: PatientClient,
    appointments: AppointmentClient,
    pharmacy: PharmacyClient,
    patient_count: Card<u64>,
    schedule: Card<Vec<Appointment>>,
    alerts: Card<Vec<InventoryItem>>,
}

impl DashboardScreen {
    pub fn new(
        patients: PatientClient,
        appointments: AppointmentClient,
        pharmacy: PharmacyClient,
    ) -> Self {
        Self {
            patients,
            appointments,
            pharmacy,
            patient_count: Card::Loading,
            schedule: Card::Loading,
            alerts: Card::Loading,
        }
    }

    async fn load(&mut self) -> ScreenEvent {
        let today = Utc::now().date_naive();
        // The patient call is a size-1 probe; only the envelope's
        // totalElements is wanted.
        let (count, schedule, low_stock) = join!(
            self.patients.list(PageRequest::first(1)),
            self.appointments.on_date(today),
            self.pharmacy.low_stock(),
        );

        let expired = matches!(&count, Err(err) if err.is_unauthenticated())
            || matches!(&schedule, Err(err) if err.is_unauthenticated())
            || matches!(&low_stock, Err(err) if err.is_unauthenticated());

        self.patient_count = Card::from_result(count.map(|page| page.total_elements));
        self.schedule = Card::from_result(schedule);
        self.alerts = Card::from_result(low_stock);

        if expired {
            ScreenEvent::SessionExpired
        } else {
            ScreenEvent::None
        }
    }

    fn render_schedule(&self, out: &mut String) {
        out.push_str("Today's appointments:\n");
        match &self.schedule {
            Card::Loading => out.push_str("  Loading...\n"),
            Card::Unavailable(message) => out.push_str(&format!("  {}\n", message)),
            Card::Ready(list) if list.is_empty() => out.push_str("  No appointments today.\n"),
            Card::Ready(list) => {
                let rows: Vec<Vec<String>> = list
                    .iter()
                    .map(|appointment| {
                        vec![
                            appointment.appointment_time.clone(),
                            appointment.patient_name.clone(),
                            appointment.doctor_name.clone(),
                            appointment.status.to_string(),
                        ]
                    })
                    .collect();
                out.push_str(&render_table(&["TIME", "PATIENT", "DOCTOR", "STATUS"], &rows));
            }
        }
    }

    fn render_alerts(&self, out: &mut String) {
        out.push_str("Low stock alerts:\n");
        match &self.alerts {
            Card::Loading => out.push_str("  Loading...\n"),
            Card::Unavailable(message) => out.push_str(&format!("  {}\n", message)),
            Card::Ready(items) if items.is_empty() => out.push_str("  No low stock alerts\n"),
            Card::Ready(items) => {
                for item in items {
                    out.push_str(&format!(
                        "  {} - {} remaining\n",
                        item.medication_name, item.quantity
                    ));
                }
            }
        }
    }
}

fn stat<T>(card: &Card<T>, show: impl Fn(&T) -> String) -> String {
    match card {
        Card::Loading => "...".to_string(),
        Card::Ready(value) => show(value),
        Card::Unavailable(_) => "unavailable".to_string(),
    }
}

#[async_trait]
impl Screen for DashboardScreen {
    fn title(&self) -> String {
        "Dashboard".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        self.load().await
    }

    fn render(&self) -> String {
        let mut out = String::from("Dashboard\n\n");
        out.push_str(&format!(
            "  Total patients:       {}\n",
            stat(&self.patient_count, |count| count.to_string())
        ));
        out.push_str(&format!(
            "  Today's appointments: {}\n",
            stat(&self.schedule, |list| list.len().to_string())
        ));
        out.push_str(&format!(
            "  Low stock alerts:     {}\n",
            stat(&self.alerts, |items| items.len().to_string())
        ));
        out.push('\n');
        self.render_schedule(&mut out);
        out.push('\n');
        self.render_alerts(&mut out);
        out.push_str("\nCommands: patients | appointments | billing | pharmacy | reload\n");
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        let (verb, _) = split_first_word(input);
        match verb {
            "patients" => ScreenEvent::NavigateTo("/patients".to_string()),
            "appointments" => ScreenEvent::NavigateTo("/appointments".to_string()),
            "billing" => ScreenEvent::NavigateTo("/billing".to_string()),
            "pharmacy" => ScreenEvent::NavigateTo("/pharmacy".to_string()),
            "reload" => self.load().await,
            "" => ScreenEvent::None,
            _ => ScreenEvent::notify_error(
                "Commands: patients | appointments | billing | pharmacy | reload",
            ),
        }
    }
}
