//! Auto-fill entry: tolerant of single keys, pastes and injected codes.
//!
//! - empty text clears exactly the target slot, then trailing empties are pruned
//! - one character writes only the target slot
//! - several characters replace the whole code with their digits

use super::{ControllerState, EntryMode, Reconciler};
use crate::code::{self, Slots};
use crate::effects::OtpEffect;

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoFillReconciler;

impl Reconciler for AutoFillReconciler {
    fn mode(&self) -> EntryMode {
        EntryMode::AutoFill
    }

    fn on_character_input(
        &self,
        state: &mut ControllerState,
        index: usize,
        text: &str,
        effects: &mut Vec<OtpEffect>,
    ) {
        let pin_count = state.pin_count();
        let mut chars = text.chars();
        let (first, second) = (chars.next(), chars.next());

        let slots = match (first, second) {
            (None, _) => {
                let mut slots = state.slots();
                if let Some(slot) = slots.get_mut(index) {
                    *slot = None;
                }
                code::prune_trailing_empty(&mut slots);
                slots
            }
            (Some(ch), None) => {
                let mut slots = state.slots();
                if index >= slots.len() {
                    slots.resize(index + 1, None);
                }
                slots[index] = Some(ch);
                slots
            }
            (Some(_), Some(_)) => {
                let mut slots: Slots = vec![None; pin_count];
                for (slot, digit) in slots.iter_mut().zip(code::strip_non_digits(text)) {
                    *slot = Some(digit);
                }
                slots
            }
        };

        let single = first.is_some() && second.is_none();
        let multi = second.is_some();
        let filled = code::filled_count(&slots);
        let first_empty = slots.iter().position(Option::is_none);
        let code = state.commit(slots, effects);

        if filled >= pin_count {
            state.notify_filled(code, effects);
            state.blur_all(effects);
        } else if single && filled > index {
            state.focus_field(filled.min(state.last_index()) as isize, effects);
        } else if multi {
            let next = first_empty.unwrap_or_else(|| filled.min(state.last_index()));
            state.focus_field(next as isize, effects);
        }
    }

    /// Clears the current field if it has a value, moves focus back one field,
    /// then asks the host to clear that previous field as a separate step.
    fn on_backspace_at_empty_field(
        &self,
        state: &mut ControllerState,
        index: usize,
        effects: &mut Vec<OtpEffect>,
    ) {
        if state.has_value(index) {
            self.on_character_input(state, index, "", effects);
        }
        state.focus_field(index as isize - 1, effects);
        if let Some(previous) = index.checked_sub(1) {
            effects.push(OtpEffect::ClearField(previous));
        }
    }

    fn initial_focus_index(&self, state: &ControllerState) -> usize {
        code::filled_count(&state.slots()).min(state.last_index())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{filled_events, mounted};
    use super::*;
    use crate::controller::OtpController;

    /// Runs backspace and its deferred clear the way a host would.
    fn backspace_and_settle(controller: &mut OtpController, index: usize) -> Vec<OtpEffect> {
        let mut effects = controller.on_backspace_at_empty_field(index);
        let deferred: Vec<usize> = effects
            .iter()
            .filter_map(|effect| match effect {
                OtpEffect::ClearField(index) => Some(*index),
                _ => None,
            })
            .collect();
        for index in deferred {
            effects.extend(controller.clear_field(index));
        }
        effects
    }

    #[test]
    fn test_paste_strips_non_digits_and_completes() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.focus_field(3);

        let effects = controller.on_character_input(3, "12ab3456");
        assert_eq!(controller.code(), "123456");
        assert_eq!(filled_events(&effects), vec!["123456"]);
        assert_eq!(controller.selected_index(), None);
        assert!(effects.contains(&OtpEffect::BlurField(0)));
    }

    #[test]
    fn test_paste_truncates_extra_digits() {
        let mut controller = mounted(4, EntryMode::AutoFill);
        let effects = controller.on_character_input(0, "98765432");
        assert_eq!(controller.code(), "9876");
        assert_eq!(filled_events(&effects), vec!["9876"]);
    }

    #[test]
    fn test_short_paste_replaces_code_and_focuses_first_empty() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "9");
        controller.on_character_input(1, "9");
        controller.on_character_input(2, "9");

        let effects = controller.on_character_input(4, "1-2");
        assert_eq!(controller.code(), "12");
        assert_eq!(controller.digits().len(), 6);
        assert_eq!(effects.last(), Some(&OtpEffect::FocusField(2)));
    }

    #[test]
    fn test_single_char_only_touches_its_slot() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "123456");
        controller.on_character_input(2, "");
        assert_eq!(
            controller.digits(),
            vec![Some('1'), Some('2'), None, Some('4'), Some('5'), Some('6')]
        );

        let effects = controller.on_character_input(2, "9");
        assert_eq!(controller.code(), "129456");
        assert_eq!(filled_events(&effects), vec!["129456"]);
    }

    #[test]
    fn test_single_char_advances_past_filled_count() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        let effects = controller.on_character_input(0, "1");
        assert_eq!(effects.last(), Some(&OtpEffect::FocusField(1)));

        // Typing into a gap ahead of the filled count does not move focus.
        let effects = controller.on_character_input(4, "5");
        assert_eq!(effects, vec![OtpEffect::CodeChanged("15".to_string())]);
        assert_eq!(controller.selected_index(), Some(1));
    }

    #[test]
    fn test_deletion_prunes_trailing_empty_slots() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "1");
        controller.on_character_input(1, "2");
        controller.on_character_input(2, "3");
        controller.on_character_input(1, "");
        assert_eq!(controller.digits(), vec![Some('1'), None, Some('3')]);

        controller.on_character_input(2, "");
        assert_eq!(controller.digits(), vec![Some('1')]);
    }

    #[test]
    fn test_backspace_on_filled_field_clears_it_and_previous() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "123");
        controller.focus_field(2);

        let effects = backspace_and_settle(&mut controller, 2);
        let focus_pos = effects
            .iter()
            .position(|e| *e == OtpEffect::FocusField(1))
            .unwrap();
        let clear_pos = effects
            .iter()
            .position(|e| *e == OtpEffect::ClearField(1))
            .unwrap();
        assert!(focus_pos < clear_pos);
        assert_eq!(controller.code(), "1");
        assert_eq!(controller.selected_index(), Some(1));
    }

    #[test]
    fn test_backspace_on_empty_field_clears_previous() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "1");
        controller.on_character_input(1, "2");

        backspace_and_settle(&mut controller, 2);
        assert_eq!(controller.code(), "1");
        assert_eq!(controller.selected_index(), Some(1));
    }

    #[test]
    fn test_backspace_on_first_field_stays_on_first_field() {
        let mut controller = mounted(6, EntryMode::AutoFill);
        controller.on_character_input(0, "7");

        let effects = controller.on_backspace_at_empty_field(0);
        assert!(!effects.iter().any(|e| matches!(e, OtpEffect::ClearField(_))));
        assert_eq!(controller.code(), "");
        assert_eq!(controller.selected_index(), Some(0));
    }

    #[test]
    fn test_initial_focus_uses_filled_count() {
        let mut controller = mounted(4, EntryMode::AutoFill);
        assert_eq!(controller.initial_focus(), vec![OtpEffect::FocusField(0)]);
        controller.on_character_input(0, "12");
        assert_eq!(controller.initial_focus(), vec![OtpEffect::FocusField(2)]);
        controller.on_character_input(0, "1234");
        assert_eq!(controller.initial_focus(), vec![OtpEffect::FocusField(3)]);
    }
}
