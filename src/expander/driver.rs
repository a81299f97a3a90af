//! Async driver for the expansion state machine

use log::{debug, info};
use tokio::time::sleep;

use super::state_machine::{
    Expander, ExpanderAction, ExpanderConfig, ExpanderEvent, ExpansionSummary,
};

/// A page whose collapsed content can be expanded
pub trait ExpandablePage {
    /// Click every expandable control currently present, returns how many were clicked
    fn click_expandable(&mut self) -> usize;

    /// Whether the page changed since the last call (the mutation observer)
    fn take_mutations(&mut self) -> bool {
        false
    }
}

/// Expand `page` until it is stable or the pass limit is hit
pub async fn run_expander<P: ExpandablePage>(
    page: &mut P,
    config: ExpanderConfig,
) -> ExpansionSummary {
    let mut expander = Expander::new(config);
    let mut action = expander.handle(ExpanderEvent::Start);

    loop {
        match action {
            ExpanderAction::ScheduleClick(delay) => {
                sleep(delay).await;
                let clicked = page.click_expandable();
                debug!("Expansion pass clicked {} controls", clicked);
                action = expander.handle(ExpanderEvent::Pass { clicked });
            }
            ExpanderAction::Stop(reason) => {
                info!("Expansion stopped: {:?}", reason);
                if !page.take_mutations() {
                    break;
                }
                action = expander.handle(ExpanderEvent::Mutation);
            }
            ExpanderAction::Ignore => break,
        }
    }

    expander.summary()
}
