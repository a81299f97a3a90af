//! Expansion state machine
//!
//! ```text
//! Idle --Start--> Expanding --Pass(0)--> Settling --Pass(0) x N--> Done
//!                     ^                     |                        |
//!                     +------Pass(n>0)------+                        |
//!                     +-----------------Mutation---------------------+
//! ```
//!
//! `N` is `max_consecutive_no_progress`. `max_passes` caps the whole run;
//! once it is reached mutations no longer restart the loop.

use std::time::Duration;

/// Tunable limits and delays of an expansion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Wait before the first pass so the initial content can render
    pub initial_delay: Duration,
    /// Wait between passes
    pub poll_interval: Duration,
    /// Wait after a mutation before restarting
    pub mutation_debounce: Duration,
    /// Passes in a row without a click before the page counts as stable
    pub max_consecutive_no_progress: u32,
    /// Hard cap on passes for the whole run
    pub max_passes: u32,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(100),
            mutation_debounce: Duration::from_millis(250),
            max_consecutive_no_progress: 5,
            max_passes: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderState {
    Idle,
    /// The last pass clicked something
    Expanding,
    /// Recent passes clicked nothing, waiting for the counter to run out
    Settling,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderEvent {
    Start,
    /// A click pass finished having clicked this many controls
    Pass { clicked: usize },
    /// The page changed after the loop settled
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_consecutive_no_progress` passes in a row clicked nothing
    Stable,
    /// `max_passes` was reached
    PassLimit,
}

/// What the driver should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderAction {
    /// Wait, then run a click pass
    ScheduleClick(Duration),
    Stop(StopReason),
    /// The event does not apply in the current state
    Ignore,
}

/// Counters of a finished (or running) expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionSummary {
    pub passes: u32,
    pub total_clicked: usize,
    pub state: ExpanderState,
    pub stop_reason: Option<StopReason>,
}

/// The expansion loop as a state machine
#[derive(Debug, Clone)]
pub struct Expander {
    config: ExpanderConfig,
    state: ExpanderState,
    no_progress: u32,
    passes: u32,
    total_clicked: usize,
    stop_reason: Option<StopReason>,
}

impl Expander {
    pub fn new(config: ExpanderConfig) -> Self {
        Self {
            config,
            state: ExpanderState::Idle,
            no_progress: 0,
            passes: 0,
            total_clicked: 0,
            stop_reason: None,
        }
    }

    pub fn state(&self) -> ExpanderState {
        self.state
    }

    pub fn consecutive_no_progress(&self) -> u32 {
        self.no_progress
    }

    pub fn summary(&self) -> ExpansionSummary {
        ExpansionSummary {
            passes: self.passes,
            total_clicked: self.total_clicked,
            state: self.state,
            stop_reason: self.stop_reason,
        }
    }

    /// Feed an event and get the next action
    pub fn handle(&mut self, event: ExpanderEvent) -> ExpanderAction {
        match (self.state, event) {
            (ExpanderState::Idle, ExpanderEvent::Start) => {
                self.state = ExpanderState::Expanding;
                ExpanderAction::ScheduleClick(self.config.initial_delay)
            }
            (ExpanderState::Expanding | ExpanderState::Settling, ExpanderEvent::Pass { clicked }) => {
                self.on_pass(clicked)
            }
            (ExpanderState::Done, ExpanderEvent::Mutation)
                if self.stop_reason != Some(StopReason::PassLimit) =>
            {
                self.state = ExpanderState::Expanding;
                self.no_progress = 0;
                self.stop_reason = None;
                ExpanderAction::ScheduleClick(self.config.mutation_debounce)
            }
            _ => ExpanderAction::Ignore,
        }
    }

    fn on_pass(&mut self, clicked: usize) -> ExpanderAction {
        self.passes += 1;
        self.total_clicked += clicked;

        if clicked > 0 {
            self.no_progress = 0;
            self.state = ExpanderState::Expanding;
        } else {
            self.no_progress += 1;
            self.state = ExpanderState::Settling;
        }

        // the pass cap is checked first, a limit stop is final
        if self.passes >= self.config.max_passes {
            return self.finish(StopReason::PassLimit);
        }
        if self.no_progress >= self.config.max_consecutive_no_progress.max(1) {
            return self.finish(StopReason::Stable);
        }
        ExpanderAction::ScheduleClick(self.config.poll_interval)
    }

    fn finish(&mut self, reason: StopReason) -> ExpanderAction {
        self.state = ExpanderState::Done;
        self.stop_reason = Some(reason);
        ExpanderAction::Stop(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_no_progress: u32, max_passes: u32) -> ExpanderConfig {
        ExpanderConfig {
            max_consecutive_no_progress: max_no_progress,
            max_passes,
            ..ExpanderConfig::default()
        }
    }

    #[test]
    fn test_start_schedules_initial_delay() {
        let mut expander = Expander::new(ExpanderConfig::default());
        assert_eq!(
            expander.handle(ExpanderEvent::Start),
            ExpanderAction::ScheduleClick(Duration::from_millis(1000))
        );
        assert_eq!(expander.state(), ExpanderState::Expanding);
        // starting twice is ignored
        assert_eq!(expander.handle(ExpanderEvent::Start), ExpanderAction::Ignore);
    }

    #[test]
    fn test_events_before_start_are_ignored() {
        let mut expander = Expander::new(ExpanderConfig::default());
        assert_eq!(expander.handle(ExpanderEvent::Pass { clicked: 3 }), ExpanderAction::Ignore);
        assert_eq!(expander.handle(ExpanderEvent::Mutation), ExpanderAction::Ignore);
        assert_eq!(expander.state(), ExpanderState::Idle);
    }

    #[test]
    fn test_settles_after_consecutive_empty_passes() {
        let mut expander = Expander::new(config(3, 100));
        expander.handle(ExpanderEvent::Start);

        let interval = ExpanderAction::ScheduleClick(Duration::from_millis(100));
        assert_eq!(expander.handle(ExpanderEvent::Pass { clicked: 2 }), interval);
        assert_eq!(expander.handle(ExpanderEvent::Pass { clicked: 0 }), interval);
        assert_eq!(expander.state(), ExpanderState::Settling);
        assert_eq!(expander.handle(ExpanderEvent::Pass { clicked: 0 }), interval);
        assert_eq!(
            expander.handle(ExpanderEvent::Pass { clicked: 0 }),
            ExpanderAction::Stop(StopReason::Stable)
        );

        let summary = expander.summary();
        assert_eq!(summary.passes, 4);
        assert_eq!(summary.total_clicked, 2);
        assert_eq!(summary.state, ExpanderState::Done);
        assert_eq!(summary.stop_reason, Some(StopReason::Stable));
    }

    #[test]
    fn test_progress_resets_the_counter() {
        let mut expander = Expander::new(config(2, 100));
        expander.handle(ExpanderEvent::Start);
        expander.handle(ExpanderEvent::Pass { clicked: 0 });
        assert_eq!(expander.consecutive_no_progress(), 1);
        expander.handle(ExpanderEvent::Pass { clicked: 1 });
        assert_eq!(expander.consecutive_no_progress(), 0);
        assert_eq!(expander.state(), ExpanderState::Expanding);
    }

    #[test]
    fn test_mutation_restarts_a_stable_run() {
        let mut expander = Expander::new(config(1, 100));
        expander.handle(ExpanderEvent::Start);
        assert_eq!(
            expander.handle(ExpanderEvent::Pass { clicked: 0 }),
            ExpanderAction::Stop(StopReason::Stable)
        );
        assert_eq!(
            expander.handle(ExpanderEvent::Mutation),
            ExpanderAction::ScheduleClick(Duration::from_millis(250))
        );
        assert_eq!(expander.state(), ExpanderState::Expanding);
        assert_eq!(expander.summary().stop_reason, None);
    }

    #[test]
    fn test_pass_limit_is_final() {
        let mut expander = Expander::new(config(5, 2));
        expander.handle(ExpanderEvent::Start);
        expander.handle(ExpanderEvent::Pass { clicked: 1 });
        assert_eq!(
            expander.handle(ExpanderEvent::Pass { clicked: 1 }),
            ExpanderAction::Stop(StopReason::PassLimit)
        );
        assert_eq!(expander.handle(ExpanderEvent::Mutation), ExpanderAction::Ignore);
        assert_eq!(expander.state(), ExpanderState::Done);
    }

    #[test]
    fn test_pass_limit_wins_when_stable_on_the_last_pass() {
        let mut expander = Expander::new(config(2, 3));
        expander.handle(ExpanderEvent::Start);
        expander.handle(ExpanderEvent::Pass { clicked: 1 });
        expander.handle(ExpanderEvent::Pass { clicked: 0 });
        // second empty pass is also the last allowed one
        assert_eq!(
            expander.handle(ExpanderEvent::Pass { clicked: 0 }),
            ExpanderAction::Stop(StopReason::PassLimit)
        );
        assert_eq!(expander.handle(ExpanderEvent::Mutation), ExpanderAction::Ignore);
    }

    #[test]
    fn test_mutations_without_progress_stop_at_pass_limit() {
        let mut expander = Expander::new(config(1, 10));
        expander.handle(ExpanderEvent::Start);

        let mut restarts = 0;
        loop {
            match expander.handle(ExpanderEvent::Pass { clicked: 0 }) {
                ExpanderAction::Stop(StopReason::Stable) => {
                    restarts += 1;
                    assert!(matches!(
                        expander.handle(ExpanderEvent::Mutation),
                        ExpanderAction::ScheduleClick(_)
                    ));
                }
                ExpanderAction::Stop(StopReason::PassLimit) => break,
                ExpanderAction::ScheduleClick(_) => {}
                ExpanderAction::Ignore => panic!("pass ignored while running"),
            }
            assert!(restarts <= 10, "mutations kept the run alive past the cap");
        }

        let summary = expander.summary();
        assert_eq!(summary.passes, 10);
        assert_eq!(restarts, 9);
        assert_eq!(expander.handle(ExpanderEvent::Mutation), ExpanderAction::Ignore);
    }

    #[test]
    fn test_zero_no_progress_limit_acts_as_one() {
        let mut expander = Expander::new(config(0, 100));
        expander.handle(ExpanderEvent::Start);
        assert_eq!(
            expander.handle(ExpanderEvent::Pass { clicked: 0 }),
            ExpanderAction::Stop(StopReason::Stable)
        );
    }
}
