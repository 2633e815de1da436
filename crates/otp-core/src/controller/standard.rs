//! Standard entry: strict left-to-right typing.
//!
//! Pasted text is written into consecutive fields starting at the target
//! field; there is no digit filtering.

use tracing::debug;

use super::{ControllerState, EntryMode, Reconciler};
use crate::effects::OtpEffect;

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReconciler;

impl Reconciler for StandardReconciler {
    fn mode(&self) -> EntryMode {
        EntryMode::Standard
    }

    fn on_character_input(
        &self,
        state: &mut ControllerState,
        index: usize,
        text: &str,
        effects: &mut Vec<OtpEffect>,
    ) {
        let pin_count = state.pin_count();
        let mut slots = state.slots();

        if text.is_empty() {
            // The field before the cursor was cleared: drop the last digit.
            slots.pop();
        } else {
            for (offset, ch) in text.chars().enumerate() {
                let slot = index + offset;
                if slot >= pin_count {
                    break;
                }
                if slot >= slots.len() {
                    slots.resize(slot + 1, None);
                }
                slots[slot] = Some(ch);
            }
        }

        let code = state.commit(slots, effects);

        if code.chars().count() >= pin_count {
            state.notify_filled(code, effects);
            state.focus_field(state.last_index() as isize, effects);
            state.blur_all(effects);
        } else if !text.is_empty() && index < state.last_index() {
            state.focus_field(index as isize + 1, effects);
        }
    }

    fn on_backspace_at_empty_field(
        &self,
        state: &mut ControllerState,
        index: usize,
        effects: &mut Vec<OtpEffect>,
    ) {
        if state.has_value(index) || index == 0 {
            debug!(index, "backspace has no previous empty-field ripple");
            return;
        }
        self.on_character_input(state, index - 1, "", effects);
        state.focus_field(index as isize - 1, effects);
    }

    fn initial_focus_index(&self, state: &ControllerState) -> usize {
        state.slots().len().saturating_sub(1)
    }
}
