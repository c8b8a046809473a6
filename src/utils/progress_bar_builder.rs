use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const COUNTER_TEMPLATE: &str = "{spinner:.green} [{pos}/{len}] {msg}";

/// Spinners and sample counters for the subcommands.
pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    length: Option<u64>,
    enable_tick: bool,
    hidden: bool,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: SPINNER_TEMPLATE,
            message: message.into(),
            length: None,
            enable_tick: false,
            hidden: false,
        }
    }

    /// Count `len` steps instead of spinning.
    pub(crate) fn with_length(mut self, len: u64) -> Self {
        self.style_template = COUNTER_TEMPLATE;
        self.length = Some(len);
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.enable_tick = true;
        self
    }

    /// Draw nothing, e.g. when debug logging already reports each step.
    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = match self.length {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if self.enable_tick {
            pb.enable_steady_tick(Duration::from_millis(200));
        }

        Ok(pb)
    }
}
