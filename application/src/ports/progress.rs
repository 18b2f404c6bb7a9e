//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus run.

use consensus_domain::{Phase, ProviderId};

/// Callback for progress updates during a consensus run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console progress bars, plain text, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when a task completes within a phase
    fn on_task_complete(&self, phase: &Phase, provider: ProviderId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called once the judge has been chosen
    fn on_judge_selected(&self, _provider: ProviderId) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _provider: ProviderId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
