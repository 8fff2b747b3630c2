use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    client::RecommendClient,
    error::FormError,
    model::{FormInput, RecommendRequest, Variant},
    render::{RenderOptions, render},
    view::View,
};

pub const PROMPT_REQUIRED: &str = "Please describe what you need";
pub const LOCATION_REQUIRED: &str = "Please enter a destination";

/// How one activation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was rendered into the results view.
    Rendered,
    /// The error view shows the failure's message.
    Failed(FormError),
    /// A request was already in flight; nothing was done.
    Busy,
}

/// Drives request/response/render cycles for one form.
pub struct FormController<V: View> {
    variant: Variant,
    client: Box<dyn RecommendClient>,
    view: Mutex<V>,
    options: RenderOptions,
    in_flight: AtomicBool,
}

impl<V: View> FormController<V> {
    pub fn new(variant: Variant, client: Box<dyn RecommendClient>, view: V) -> Self {
        Self {
            variant,
            client,
            view: Mutex::new(view),
            options: RenderOptions::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Current view state. Do not hold the guard across an `activate` call.
    pub fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_view(self) -> V {
        self.view
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one cycle for `input`: validate, request, then render the result or the error.
    ///
    /// The loading indicator and the disabled trigger are reset on every exit,
    /// including when the returned future is dropped before it settles.
    pub async fn activate(&self, input: FormInput) -> Outcome {
        let Some(mut cycle) = Cycle::begin(self) else {
            tracing::debug!(variant = %self.variant, "activation ignored, request in flight");
            return Outcome::Busy;
        };

        let request = match validate(self.variant, &input) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "form input rejected");
                self.update_view(|v| v.show_error(err.message()));
                return Outcome::Failed(err);
            }
        };

        cycle.start_loading();

        match self.client.recommend(&request).await {
            Ok(recommendation) => {
                let html = render(&recommendation, &self.options);
                self.update_view(|v| v.show_results(html));
                Outcome::Rendered
            }
            Err(err) => {
                tracing::error!(
                    variant = %self.variant,
                    error = %err,
                    "recommendation request failed"
                );
                self.update_view(|v| v.show_error(err.message()));
                Outcome::Failed(err)
            }
        }
    }

    fn update_view(&self, f: impl FnOnce(&mut V)) {
        f(&mut self.view());
    }
}

/// Build the request body for `variant`, trimming required fields.
pub fn validate(variant: Variant, input: &FormInput) -> Result<RecommendRequest, FormError> {
    let user_prompt = input.prompt.trim();
    if user_prompt.is_empty() {
        return Err(FormError::Validation(PROMPT_REQUIRED.to_string()));
    }

    match variant {
        Variant::Products => Ok(RecommendRequest::Products {
            user_prompt: user_prompt.to_string(),
        }),
        Variant::Trip => {
            let location = input
                .location
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if location.is_empty() {
                return Err(FormError::Validation(LOCATION_REQUIRED.to_string()));
            }
            Ok(RecommendRequest::Trip {
                user_prompt: user_prompt.to_string(),
                location: location.to_string(),
                date: input.date,
            })
        }
    }
}

/// Holds the in-flight flag for one activation and restores the view when dropped.
struct Cycle<'a, V: View> {
    controller: &'a FormController<V>,
    loading: bool,
}

impl<'a, V: View> Cycle<'a, V> {
    fn begin(controller: &'a FormController<V>) -> Option<Self> {
        controller
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                controller,
                loading: false,
            })
    }

    fn start_loading(&mut self) {
        self.loading = true;
        self.controller.update_view(|v| {
            v.set_loading(true);
            v.hide_results();
            v.hide_error();
            v.set_trigger_enabled(false);
        });
    }
}

impl<V: View> Drop for Cycle<'_, V> {
    fn drop(&mut self) {
        if self.loading {
            self.controller.update_view(|v| {
                v.set_loading(false);
                v.set_trigger_enabled(true);
            });
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}
