use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use peptide_pooler::engine::progress::{Progress, ProgressCallback};
use peptide_pooler::workflows::pool::PHASES;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

const SPINNER_TICK_MS: u64 = 80;

/// Renders the pooling workflow as one spinner line per phase, numbered `[k/n]`.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

#[derive(Default)]
struct PhaseState {
    active: Option<ProgressBar>,
    /// Labels of phases that have finished, in completion order.
    completed: Vec<String>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    if let Some(stale) = state.active.take() {
                        stale.finish_and_clear();
                    }
                    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                        .with_style(spinner_style())
                        .with_message(phase_label(name));
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    state.active = Some(bar);
                }
                Progress::PhaseFinish => {
                    if let Some(bar) = state.active.take() {
                        let label = bar.message();
                        bar.finish_with_message(format!("✓ {}", label));
                        state.completed.push(label);
                    }
                }
                Progress::Message(msg) => match &state.active {
                    Some(bar) => bar.println(format!("  {}", msg)),
                    None => info!("{}", msg),
                },
            }
        })
    }

    #[cfg(test)]
    fn completed(&self) -> Vec<String> {
        self.state.lock().unwrap().completed.clone()
    }

    #[cfg(test)]
    fn active_message(&self) -> Option<String> {
        self.state.lock().unwrap().active.as_ref().map(ProgressBar::message)
    }
}

fn phase_label(name: &str) -> String {
    match PHASES.iter().position(|phase| *phase == name) {
        Some(index) => format!("[{}/{}] {}", index + 1, PHASES.len(), name),
        None => name.to_string(),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
