use super::{PlatformError, Toast, Toaster};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// The `beforeinstallprompt` event, held until the user asks to install.
#[async_trait(?Send)]
pub trait InstallPromptEvent {
    /// Shows the browser's install dialog and resolves with the user's choice.
    async fn prompt(&self) -> Result<InstallOutcome, PlatformError>;
}

/// Read-only view of the browser's display state.
pub trait DisplayEnvironment {
    fn user_agent(&self) -> &str;
    /// Whether `(display-mode: standalone)` currently matches.
    fn matches_standalone_media(&self) -> bool;
    /// iOS Safari's non-standard `navigator.standalone`.
    fn navigator_standalone(&self) -> bool;
}

#[must_use]
pub fn is_ios(user_agent: &str) -> bool {
    ["iPad", "iPhone", "iPod"].iter().any(|device| user_agent.contains(device))
}

#[must_use]
pub fn is_standalone(env: &impl DisplayEnvironment) -> bool {
    env.matches_standalone_media() || env.navigator_standalone()
}

/// Tracks installability and runs the deferred install prompt.
#[derive(Debug)]
pub struct InstallController<E, T> {
    is_ios: bool,
    is_standalone: bool,
    deferred: Option<E>,
    toaster: T,
}

impl<E: InstallPromptEvent, T: Toaster> InstallController<E, T> {
    pub fn new(env: &impl DisplayEnvironment, toaster: T) -> Self {
        Self { is_ios: is_ios(env.user_agent()), is_standalone: is_standalone(env), deferred: None, toaster }
    }

    #[must_use]
    pub const fn is_ios(&self) -> bool {
        self.is_ios
    }

    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        self.is_standalone
    }

    #[must_use]
    pub const fn has_deferred_prompt(&self) -> bool {
        self.deferred.is_some()
    }

    /// `beforeinstallprompt`: the caller has already suppressed the browser's mini-infobar.
    pub fn on_before_install_prompt(&mut self, event: E) {
        self.deferred = Some(event);
    }

    /// `change` on the display-mode media query.
    pub fn on_display_mode_change(&mut self, env: &impl DisplayEnvironment) {
        self.is_standalone = is_standalone(env);
    }

    /// `appinstalled`.
    pub fn on_app_installed(&mut self) {
        self.is_standalone = true;
        self.deferred = None;
        self.toaster.show(Toast::Success("App installed.".into()));
    }

    /// Runs the deferred prompt once. Returns the user's choice, or `None` if there was no
    /// prompt to show or it failed.
    pub async fn prompt_install(&mut self) -> Option<InstallOutcome> {
        let Some(event) = self.deferred.take() else {
            self.toaster.show(Toast::Info("Use your browser install option.".into()));
            return None;
        };

        match event.prompt().await {
            Ok(InstallOutcome::Accepted) => {
                self.toaster.show(Toast::Success("Install prompt accepted.".into()));
                Some(InstallOutcome::Accepted)
            }
            Ok(InstallOutcome::Dismissed) => {
                self.toaster.show(Toast::Warning("Install prompt dismissed.".into()));
                Some(InstallOutcome::Dismissed)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Install prompt failed");
                self.toaster.show(Toast::Error("Could not show the install prompt.".into()));
                None
            }
        }
    }
}
