use async_trait::async_trait;

use shared_screens::{split_first_word, FormController, FormMode, Screen, ScreenEvent, SubmitBlocked};

use crate::services::auth::AuthClient;

/// The sign-in form. On success the shell receives the new token together
/// with the return URL this screen was opened with, so the operator lands
/// where they were originally headed.
pub struct LoginScreen {
    auth: AuthClient,
    form: FormController,
    username: String,
    password: String,
    return_url: String,
}

impl LoginScreen {
    pub fn new(auth: AuthClient, return_url: Option<String>) -> Self {
        Self {
            auth,
            form: FormController::new(FormMode::Create),
            username: String::new(),
            password: String::new(),
            return_url: return_url.unwrap_or_else(|| "/dashboard".to_string()),
        }
    }

    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.username.trim().is_empty() {
            missing.push("username".to_string());
        }
        if self.password.is_empty() {
            missing.push("password".to_string());
        }
        missing
    }

    async fn submit(&mut self) -> ScreenEvent {
        match self.form.begin_submit(self.missing_fields()) {
            Err(SubmitBlocked::MissingFields(fields)) => {
                return ScreenEvent::notify_error(format!("Required: {}", fields.join(", ")));
            }
            Err(SubmitBlocked::InFlight) => return ScreenEvent::None,
            Ok(()) => {}
        }

        let result = self.auth.login(self.username.trim(), &self.password).await;
        self.form.finish_submit();

        match result {
            Ok(session) => ScreenEvent::SessionEstablished {
                token: session.token,
                username: session.username,
                redirect_to: self.return_url.clone(),
            },
            Err(err) => ScreenEvent::notify_error(err.notice_text()),
        }
    }
}

#[async_trait]
impl Screen for LoginScreen {
    fn title(&self) -> String {
        "Sign in".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        ScreenEvent::None
    }

    fn render(&self) -> String {
        let mut out = String::from("Sign in to IHMS\n\n");
        out.push_str(&format!("  username: {}\n", self.username));
        out.push_str(&format!("  password: {}\n", "*".repeat(self.password.len())));
        out.push_str("\nCommands: set username <value> | set password <value> | submit\n");
        out
    }

    async fn handle(&mut self, input: &str) -> ScreenEvent {
        let (verb, rest) = split_first_word(input);
        match verb {
            "set" => {
                let (field, value) = split_first_word(rest);
                match field {
                    "username" => {
                        self.username = value.to_string();
                        ScreenEvent::None
                    }
                    "password" => {
                        self.password = value.to_string();
                        ScreenEvent::None
                    }
                    _ => ScreenEvent::notify_error("Unknown field. Fields: username, password"),
                }
            }
            "submit" => self.submit().await,
            _ => ScreenEvent::notify_error("Commands: set username <value> | set password <value> | submit"),
        }
    }
}

/// Shown when a route's declared roles exclude the signed-in operator.
pub struct UnauthorizedScreen;

#[async_trait]
impl Screen for UnauthorizedScreen {
    fn title(&self) -> String {
        "Unauthorized".to_string()
    }

    async fn enter(&mut self) -> ScreenEvent {
        ScreenEvent::None
    }

    fn render(&self) -> String {
        "You do not have permission to view that section.\n\
         Use `open /dashboard` to return to the dashboard.\n"
            .to_string()
    }

    async fn handle(&mut self, _input: &str) -> ScreenEvent {
        ScreenEvent::notify_error("Use `open /dashboard` to return to the dashboard")
    }
}
