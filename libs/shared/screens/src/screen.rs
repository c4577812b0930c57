use async_trait::async_trait;

use shared_models::Notice;

/// What a screen hands back to the shell after entering or handling a
/// command. Screens never navigate or touch the session themselves; they
/// request it through an event and the shell decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    None,
    Notify(Notice),
    /// Route to another path (guards run again on the way).
    NavigateTo(String),
    /// A 401/403 surfaced mid-screen. The shell clears the session and
    /// routes to login, preserving the current path as the return URL.
    SessionExpired,
    /// A form submission landed. The shell surfaces the notice, then
    /// navigates away from the form.
    Saved {
        notice: Notice,
        redirect_to: String,
    },
    /// Login succeeded. The shell builds and persists the session from the
    /// token, then navigates to `redirect_to` (the return URL captured when
    /// the operator was sent to login, or the landing page).
    SessionEstablished {
        token: String,
        username: String,
        redirect_to: String,
    },
    LoggedOut,
    Quit,
}

impl ScreenEvent {
    pub fn notify_error(message: impl Into<String>) -> Self {
        ScreenEvent::Notify(Notice::error(message))
    }

    pub fn notify_success(message: impl Into<String>) -> Self {
        ScreenEvent::Notify(Notice::success(message))
    }

    pub fn saved(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        ScreenEvent::Saved {
            notice: Notice::success(message),
            redirect_to: redirect_to.into(),
        }
    }
}

/// One screen of the portal, hosted by the shell one at a time. `enter`
/// runs the initial load, `render` produces the plain-text view, and
/// `handle` maps one operator command onto the screen's behavior.
#[async_trait]
pub trait Screen {
    fn title(&self) -> String;

    async fn enter(&mut self) -> ScreenEvent;

    fn render(&self) -> String;

    async fn handle(&mut self, input: &str) -> ScreenEvent;
}
