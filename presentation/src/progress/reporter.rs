//! Progress reporting for consensus runs

use colored::Colorize;
use consensus_application::ProgressNotifier;
use consensus_domain::{Phase, ProviderId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a consensus run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::FanOut => "Phase 1: Provider Fan-Out",
            Phase::Synthesis => "Phase 2: Synthesis",
        }
    }

    fn phase_short_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::FanOut => "Phase 1",
            Phase::Synthesis => "Phase 2",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase).to_string());
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, provider: ProviderId, success: bool) {
        let Ok(slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), provider.display_name())
            } else {
                format!("{} {}", "x".red(), provider.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        let finished = self.phase_bar.lock().ok().and_then(|mut slot| slot.take());
        if let Some(pb) = finished {
            pb.finish_with_message(format!("{} complete!", Self::phase_short_name(phase).green()));
        }
    }

    fn on_judge_selected(&self, provider: ProviderId) {
        // Printed above the bars so it stays visible after they finish
        let _ = self.multi.println(format!(
            "{} {}",
            "Judge:".cyan().bold(),
            provider.display_name()
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let phase_name = ProgressReporter::phase_display_name(phase);
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase_name.bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, provider: ProviderId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), provider.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), provider.display_name());
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }

    fn on_judge_selected(&self, provider: ProviderId) {
        eprintln!("  {} {}", "judge:".dimmed(), provider.display_name());
    }
}
