use tokio::sync::watch;

/// Router primitive used by commands, the guard and the auth flow.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);

    fn current(&self) -> String;
}

/// Location of one browser session; the BFF reports it through `GET /session`.
pub struct SessionNavigator {
    location: watch::Sender<String>,
}

impl SessionNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            location: watch::channel(initial.to_string()).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }
}

impl Navigator for SessionNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path = %path, "Navigating");
        self.location.send_replace(path.to_string());
    }

    fn current(&self) -> String {
        self.location.borrow().clone()
    }
}
