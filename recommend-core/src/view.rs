/// View regions a form controller drives: trigger, loading indicator, results and error.
pub trait View: Send {
    fn set_loading(&mut self, visible: bool);

    fn set_trigger_enabled(&mut self, enabled: bool);

    /// Replace the results content and make it visible.
    fn show_results(&mut self, html: String);

    fn hide_results(&mut self);

    /// Replace the error message and make it visible.
    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);
}

/// A view that keeps its state in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
    pub loading: bool,
    pub trigger_enabled: bool,
    pub results_visible: bool,
    pub results: String,
    pub error_visible: bool,
    pub error: String,
    /// Every value passed to `set_loading`, in order.
    pub loading_history: Vec<bool>,
}

impl Default for MemoryView {
    fn default() -> Self {
        Self {
            loading: false,
            trigger_enabled: true,
            results_visible: false,
            results: String::new(),
            error_visible: false,
            error: String::new(),
            loading_history: Vec::new(),
        }
    }
}

impl MemoryView {
    pub fn visible_results(&self) -> Option<&str> {
        self.results_visible.then_some(self.results.as_str())
    }

    pub fn visible_error(&self) -> Option<&str> {
        self.error_visible.then_some(self.error.as_str())
    }
}

impl View for MemoryView {
    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
        self.loading_history.push(visible);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
    }

    fn show_results(&mut self, html: String) {
        self.results = html;
        self.results_visible = true;
    }

    fn hide_results(&mut self) {
        self.results_visible = false;
    }

    fn show_error(&mut self, message: &str) {
        self.error = message.to_string();
        self.error_visible = true;
    }

    fn hide_error(&mut self) {
        self.error_visible = false;
    }
}
