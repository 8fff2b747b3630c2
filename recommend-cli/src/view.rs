use recommend_core::View;

/// Reports progress and errors on stderr and keeps the rendered results for the caller.
#[derive(Debug, Default)]
pub struct TerminalView {
    results: Option<String>,
}

impl TerminalView {
    pub fn results(&self) -> Option<&str> {
        self.results.as_deref()
    }
}

impl View for TerminalView {
    fn set_loading(&mut self, visible: bool) {
        if visible {
            eprintln!("Fetching recommendations...");
        }
    }

    // Nothing to disable on a terminal.
    fn set_trigger_enabled(&mut self, _enabled: bool) {}

    fn show_results(&mut self, html: String) {
        self.results = Some(html);
    }

    fn hide_results(&mut self) {
        self.results = None;
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn hide_error(&mut self) {}
}
