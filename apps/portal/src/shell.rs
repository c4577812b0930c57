use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use appointment_cell::services::appointment::AppointmentClient;
use appointment_cell::{AppointmentDetailScreen, AppointmentFormScreen, AppointmentListScreen};
use billing_cell::{BillingClient, InvoiceDetailScreen, InvoiceFormScreen, InvoiceListScreen};
use dashboard_cell::DashboardScreen;
use navigation_cell::{login_path, Navigator, Resolution, ScreenId, BILLING_ROLES, PHARMACY_ROLES};
use patient_cell::{PatientClient, PatientDetailScreen, PatientFormScreen, PatientListScreen};
use pharmacy_cell::{InventoryScreen, MedicationListScreen, PharmacyClient, PrescriptionListScreen};
use session_cell::{AuthClient, LoginScreen, Session, SessionContext, SessionStore, UnauthorizedScreen};
use shared_config::PortalConfig;
use shared_models::{Notice, NoticeKind, PortalError};
use shared_screens::{split_first_word, FormMode, Screen, ScreenEvent};

const GLOBAL_HELP: &str = "Global commands: open <path> | login | logout | help | quit\n\
                           Screen commands are listed at the bottom of each screen.";

/// What the screen factory produced for a resolved route. A malformed path
/// parameter (say `/patients/abc`) sends the operator to the parent listing
/// instead of a screen that can only 404.
enum Built {
    Screen(Box<dyn Screen>),
    Redirect(&'static str),
}

/// Hosts one screen at a time and owns everything screens may not touch:
/// the session, the navigator and the command loop. Screens communicate
/// upward through `ScreenEvent` only.
pub struct Shell {
    config: PortalConfig,
    navigator: Navigator,
    session: SessionContext,
    store: SessionStore,
    screen: Box<dyn Screen>,
    path: String,
    quit: bool,
}

impl Shell {
    pub fn new(config: PortalConfig) -> Self {
        let store = SessionStore::new(&config.session_file);
        let mut session = SessionContext::new();
        if let Some(restored) = store.load() {
            info!("Restored session for {}", restored.username);
            session.establish(restored);
        }

        // Placeholder until `run` resolves the first route.
        let screen: Box<dyn Screen> = Box::new(LoginScreen::new(AuthClient::new(&config), None));

        Self {
            config,
            navigator: Navigator::portal(),
            session,
            store,
            screen,
            path: "/auth/login".to_string(),
            quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<(), PortalError> {
        self.goto("/").await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.print_screen();
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let (verb, rest) = split_first_word(input);
            match verb {
                "quit" | "exit" => break,
                "help" => println!("{}", GLOBAL_HELP),
                "open" if rest.is_empty() => println!("Usage: open <path>"),
                "open" => self.goto(rest).await?,
                "login" => self.goto("/auth/login").await?,
                "logout" => self.logout().await?,
                _ => {
                    let event = self.screen.handle(input).await;
                    self.dispatch(event).await?;
                }
            }
            if self.quit {
                break;
            }
        }

        info!("Portal shut down");
        Ok(())
    }

    /// Resolves a path and installs the screen it lands on. Screens may ask
    /// for further navigation while entering (a missing record redirects to
    /// its listing), so this loops until an installed screen settles.
    async fn goto(&mut self, requested: &str) -> Result<(), PortalError> {
        let mut target = requested.to_string();
        loop {
            let resolution = self.navigator.resolve(&target, &self.session)?;
            let mut screen = match self.build_screen(&resolution) {
                Built::Screen(screen) => screen,
                Built::Redirect(to) => {
                    debug!("Malformed parameter in {}, showing {}", resolution.path, to);
                    target = to.to_string();
                    continue;
                }
            };

            debug!("Entering {}", screen.title());
            let entered = screen.enter().await;
            self.path = resolution.path;
            self.screen = screen;

            match self.apply(entered)? {
                Some(next) => target = next,
                None => return Ok(()),
            }
        }
    }

    async fn dispatch(&mut self, event: ScreenEvent) -> Result<(), PortalError> {
        if let Some(path) = self.apply(event)? {
            self.goto(&path).await?;
        }
        Ok(())
    }

    /// Applies one screen event to shell state. Returns the path to
    /// navigate to when the event calls for it.
    fn apply(&mut self, event: ScreenEvent) -> Result<Option<String>, PortalError> {
        match event {
            ScreenEvent::None => Ok(None),
            ScreenEvent::Notify(notice) => {
                print_notice(&notice);
                Ok(None)
            }
            ScreenEvent::NavigateTo(path) => Ok(Some(path)),
            ScreenEvent::Saved { notice, redirect_to } => {
                print_notice(&notice);
                Ok(Some(redirect_to))
            }
            ScreenEvent::SessionExpired => {
                warn!("Session rejected by the gateway while on {}", self.path);
                println!("Your session has expired. Please log in.");
                self.session.clear();
                self.store.clear()?;
                Ok(Some(login_path(&self.path)))
            }
            ScreenEvent::SessionEstablished {
                token,
                username,
                redirect_to,
            } => {
                let session = Session::from_token(token).map_err(PortalError::Config)?;
                self.store.save(&session)?;
                self.session.establish(session);
                info!("Signed in as {}", username);
                println!("Signed in as {}.", username);
                Ok(Some(redirect_to))
            }
            ScreenEvent::LoggedOut => {
                self.session.clear();
                self.store.clear()?;
                Ok(Some("/auth/login".to_string()))
            }
            ScreenEvent::Quit => {
                self.quit = true;
                Ok(None)
            }
        }
    }

    async fn logout(&mut self) -> Result<(), PortalError> {
        if let Some(username) = self.session.username() {
            info!("Signing out {}", username);
        }
        self.session.clear();
        self.store.clear()?;
        println!("Signed out.");
        self.goto("/auth/login").await
    }

    /// Maps a resolved screen id onto a concrete screen, with resource
    /// clients carrying the current session token.
    fn build_screen(&self, resolution: &Resolution) -> Built {
        let token = self.session.token().map(String::from);
        let size = self.config.default_page_size;

        match resolution.screen {
            ScreenId::Login => Built::Screen(Box::new(LoginScreen::new(
                AuthClient::new(&self.config),
                resolution.return_url().map(String::from),
            ))),
            ScreenId::Unauthorized => Built::Screen(Box::new(UnauthorizedScreen)),
            ScreenId::Dashboard => Built::Screen(Box::new(DashboardScreen::new(
                PatientClient::new(&self.config, token.clone()),
                AppointmentClient::new(&self.config, token.clone()),
                PharmacyClient::new(&self.config, token),
            ))),
            ScreenId::PatientList => Built::Screen(Box::new(PatientListScreen::new(
                PatientClient::new(&self.config, token),
                size,
            ))),
            ScreenId::PatientDetail => match resolution.id_param() {
                Some(id) => Built::Screen(Box::new(PatientDetailScreen::new(
                    PatientClient::new(&self.config, token),
                    id,
                ))),
                None => Built::Redirect("/patients"),
            },
            ScreenId::PatientForm => match form_mode(resolution) {
                Some(mode) => Built::Screen(Box::new(PatientFormScreen::new(
                    PatientClient::new(&self.config, token),
                    mode,
                ))),
                None => Built::Redirect("/patients"),
            },
            ScreenId::AppointmentList => Built::Screen(Box::new(AppointmentListScreen::new(
                AppointmentClient::new(&self.config, token),
                size,
            ))),
            ScreenId::AppointmentDetail => match resolution.id_param() {
                Some(id) => Built::Screen(Box::new(AppointmentDetailScreen::new(
                    AppointmentClient::new(&self.config, token),
                    id,
                ))),
                None => Built::Redirect("/appointments"),
            },
            ScreenId::AppointmentForm => match form_mode(resolution) {
                Some(mode) => Built::Screen(Box::new(AppointmentFormScreen::new(
                    AppointmentClient::new(&self.config, token),
                    mode,
                ))),
                None => Built::Redirect("/appointments"),
            },
            ScreenId::InvoiceList => Built::Screen(Box::new(InvoiceListScreen::new(
                BillingClient::new(&self.config, token),
                size,
                self.config.download_dir.clone(),
            ))),
            ScreenId::InvoiceDetail => match resolution.id_param() {
                Some(id) => Built::Screen(Box::new(InvoiceDetailScreen::new(
                    BillingClient::new(&self.config, token),
                    id,
                    self.config.download_dir.clone(),
                ))),
                None => Built::Redirect("/billing"),
            },
            ScreenId::InvoiceForm => Built::Screen(Box::new(InvoiceFormScreen::new(
                BillingClient::new(&self.config, token),
            ))),
            ScreenId::MedicationList => Built::Screen(Box::new(MedicationListScreen::new(
                PharmacyClient::new(&self.config, token),
                size,
            ))),
            ScreenId::PrescriptionList => Built::Screen(Box::new(PrescriptionListScreen::new(
                PharmacyClient::new(&self.config, token),
                size,
            ))),
            ScreenId::Inventory => Built::Screen(Box::new(InventoryScreen::new(
                PharmacyClient::new(&self.config, token),
                size,
            ))),
        }
    }

    fn print_screen(&self) {
        println!();
        print!("{}", self.screen.render());
        println!("-- {}", self.chrome());
        print!("> ");
        let _ = io::stdout().flush();
    }

    /// One line of navigation chrome under every screen: who is signed in
    /// and which sections their roles open.
    fn chrome(&self) -> String {
        match self.session.username() {
            Some(username) => {
                let mut sections = vec!["/dashboard", "/patients", "/appointments"];
                if self.session.has_any_role(BILLING_ROLES) {
                    sections.push("/billing");
                }
                if self.session.has_any_role(PHARMACY_ROLES) {
                    sections.push("/pharmacy");
                }
                format!("{} | open: {}", username, sections.join(" "))
            }
            None => "signed out | `login` to sign in".to_string(),
        }
    }
}

/// `new` routes carry no `:id`; `:id/edit` routes must carry a numeric one.
fn form_mode(resolution: &Resolution) -> Option<FormMode> {
    if resolution.params.contains_key("id") {
        resolution.id_param().map(FormMode::Edit)
    } else {
        Some(FormMode::Create)
    }
}

fn print_notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => println!("[ok] {}", notice.message),
        NoticeKind::Error => println!("[!] {}", notice.message),
    }
}
