use cms_console_core::auth::Navigator;
use tracing::warn;

/// There is no login page to redirect to in a terminal, so tell the user
/// how to get one.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &str) {
        warn!(route, "Session expired or rejected by the backend");
        eprintln!("Session expired. Run `cms-console login` to sign in again.");
    }
}
