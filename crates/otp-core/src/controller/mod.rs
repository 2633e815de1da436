//! Digit/focus reconciliation state machine.
//!
//! `OtpController` owns the entered digits and the selected field. The entry
//! policy (standard or auto-fill) is picked once at construction and lives
//! behind the [`Reconciler`] trait, so no method branches on a mode flag.
//!
//! Every operation returns the effects it produced, in the order the host
//! must execute them.

mod autofill;
mod standard;

use std::fmt;

pub use autofill::AutoFillReconciler;
pub use standard::StandardReconciler;
use tracing::debug;

use crate::code::{self, Slots};
use crate::config::WidgetConfig;
use crate::effects::OtpEffect;
use crate::fields::FieldRegistry;

/// Which reconciliation policy a controller uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Strict left-to-right entry.
    Standard,
    /// Paste/clipboard/SMS tolerant entry.
    AutoFill,
}

impl EntryMode {
    pub fn reconciler(self) -> Box<dyn Reconciler> {
        match self {
            EntryMode::Standard => Box::new(StandardReconciler),
            EntryMode::AutoFill => Box::new(AutoFillReconciler),
        }
    }
}

/// Policy deciding how an input event changes the digits and the focus.
pub trait Reconciler: fmt::Debug + Send {
    fn mode(&self) -> EntryMode;

    /// Applies `text` typed, pasted or injected into field `index`.
    fn on_character_input(
        &self,
        state: &mut ControllerState,
        index: usize,
        text: &str,
        effects: &mut Vec<OtpEffect>,
    );

    /// Handles a backspace key press on field `index`.
    fn on_backspace_at_empty_field(
        &self,
        state: &mut ControllerState,
        index: usize,
        effects: &mut Vec<OtpEffect>,
    );

    /// Field that receives focus when the widget is first shown.
    fn initial_focus_index(&self, state: &ControllerState) -> usize;
}

/// Mutable state shared by both reconciliation policies.
#[derive(Debug, Clone)]
pub struct ControllerState {
    pin_count: usize,
    digits: Slots,
    code_prop: Option<String>,
    selected: Option<usize>,
    fields: FieldRegistry,
    last_filled: Option<String>,
}

impl ControllerState {
    fn new(pin_count: usize, code_prop: Option<String>) -> Self {
        let pin_count = pin_count.max(1);
        let mut digits = code::code_to_slots(code_prop.as_deref());
        digits.truncate(pin_count);
        Self {
            pin_count,
            digits,
            code_prop,
            selected: None,
            fields: FieldRegistry::new(pin_count),
            last_filled: None,
        }
    }

    pub fn pin_count(&self) -> usize {
        self.pin_count
    }

    pub fn last_index(&self) -> usize {
        self.pin_count - 1
    }

    /// Current slots. The controlled code wins over the internal digits.
    pub fn slots(&self) -> Slots {
        let mut slots = match &self.code_prop {
            Some(code) => code::code_to_slots(Some(code)),
            None => self.digits.clone(),
        };
        slots.truncate(self.pin_count);
        slots
    }

    pub fn has_value(&self, index: usize) -> bool {
        self.slots().get(index).copied().flatten().is_some()
    }

    /// Stores new slots and notifies the code-changed observer.
    ///
    /// Returns the joined code.
    pub fn commit(&mut self, mut slots: Slots, effects: &mut Vec<OtpEffect>) -> String {
        slots.truncate(self.pin_count);
        self.digits = slots;
        let code = code::join_slots(&self.digits);
        if code.chars().count() < self.pin_count {
            self.last_filled = None;
        }
        debug!(len = code.len(), "digits committed");
        effects.push(OtpEffect::CodeChanged(code.clone()));
        code
    }

    /// Notifies the code-filled observer at most once per distinct filled code.
    pub fn notify_filled(&mut self, code: String, effects: &mut Vec<OtpEffect>) {
        if self.last_filled.as_deref() == Some(code.as_str()) {
            debug!("code already reported as filled");
            return;
        }
        self.last_filled = Some(code.clone());
        effects.push(OtpEffect::CodeFilled(code));
    }

    /// Focuses the clamped field if it is attached; otherwise does nothing.
    pub fn focus_field(&mut self, index: isize, effects: &mut Vec<OtpEffect>) {
        let safe = index.clamp(0, self.last_index() as isize) as usize;
        if !self.fields.is_live(safe) {
            debug!(index = safe, "focus dropped, field not attached");
            return;
        }
        effects.push(OtpEffect::FocusField(safe));
        self.selected = Some(safe);
    }

    pub fn blur_all(&mut self, effects: &mut Vec<OtpEffect>) {
        effects.extend(self.fields.live_indices().map(OtpEffect::BlurField));
        self.selected = None;
    }
}

/// Controller for one OTP widget instance.
#[derive(Debug)]
pub struct OtpController {
    state: ControllerState,
    reconciler: Box<dyn Reconciler>,
}

impl OtpController {
    /// Creates a controller from widget config and an optional controlled code.
    pub fn new(config: &WidgetConfig, code: Option<String>) -> Self {
        Self::with_reconciler(config.pin_count, code, config.entry_mode().reconciler())
    }

    pub fn with_reconciler(
        pin_count: usize,
        code: Option<String>,
        reconciler: Box<dyn Reconciler>,
    ) -> Self {
        Self {
            state: ControllerState::new(pin_count, code),
            reconciler,
        }
    }

    pub fn mode(&self) -> EntryMode {
        self.reconciler.mode()
    }

    pub fn pin_count(&self) -> usize {
        self.state.pin_count
    }

    /// Current digit slots (controlled code if one is supplied).
    pub fn digits(&self) -> Slots {
        self.state.slots()
    }

    /// Current joined code.
    pub fn code(&self) -> String {
        code::join_slots(&self.state.slots())
    }

    pub fn filled_count(&self) -> usize {
        code::filled_count(&self.state.slots())
    }

    pub fn has_value(&self, index: usize) -> bool {
        self.state.has_value(index)
    }

    /// Focused field, `None` when nothing is focused.
    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected
    }

    pub fn is_controlled(&self) -> bool {
        self.state.code_prop.is_some()
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.state.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.state.fields
    }

    /// Applies a new controlled value from the owner.
    ///
    /// The internal digits are overwritten whenever the value changes.
    pub fn set_code_prop(&mut self, code: Option<String>) {
        if self.state.code_prop == code {
            return;
        }
        let mut digits = code::code_to_slots(code.as_deref());
        digits.truncate(self.state.pin_count);
        if digits.len() < self.state.pin_count {
            self.state.last_filled = None;
        }
        self.state.digits = digits;
        self.state.code_prop = code;
    }

    /// Replaces the digits with `code`, truncated to `pin_count`. Focus is unchanged.
    pub fn set_value(&mut self, code: &str) -> Vec<OtpEffect> {
        let mut effects = Vec::new();
        let slots: Slots = code.chars().take(self.state.pin_count).map(Some).collect();
        let code = self.state.commit(slots, &mut effects);
        if code.chars().count() >= self.state.pin_count {
            self.state.notify_filled(code, &mut effects);
        }
        effects
    }

    /// Resets the digits and selects the first field.
    ///
    /// No-op while a non-empty controlled code is supplied.
    pub fn clear(&mut self) -> Vec<OtpEffect> {
        if self.state.code_prop.as_deref().is_some_and(|code| !code.is_empty()) {
            debug!("clear ignored, code is controlled");
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.state.commit(Vec::new(), &mut effects);
        self.state.selected = Some(0);
        effects
    }

    /// Focuses the field at `index`, clamped into range.
    pub fn focus_field(&mut self, index: isize) -> Vec<OtpEffect> {
        let mut effects = Vec::new();
        self.state.focus_field(index, &mut effects);
        effects
    }

    pub fn blur_all_fields(&mut self) -> Vec<OtpEffect> {
        let mut effects = Vec::new();
        self.state.blur_all(&mut effects);
        effects
    }

    /// Reconciles `text` entered into field `index`.
    pub fn on_character_input(&mut self, index: usize, text: &str) -> Vec<OtpEffect> {
        let mut effects = Vec::new();
        if index >= self.state.pin_count {
            debug!(index, "input for a field that doesn't exist");
            return effects;
        }
        self.reconciler
            .on_character_input(&mut self.state, index, text, &mut effects);
        effects
    }

    /// Reconciles a backspace key press on field `index`.
    pub fn on_backspace_at_empty_field(&mut self, index: usize) -> Vec<OtpEffect> {
        let mut effects = Vec::new();
        if index >= self.state.pin_count {
            debug!(index, "backspace for a field that doesn't exist");
            return effects;
        }
        self.reconciler
            .on_backspace_at_empty_field(&mut self.state, index, &mut effects);
        effects
    }

    /// Second step of an auto-fill backspace: clears field `index`.
    pub fn clear_field(&mut self, index: usize) -> Vec<OtpEffect> {
        self.on_character_input(index, "")
    }

    /// Focus applied once the widget has been shown.
    pub fn initial_focus(&mut self) -> Vec<OtpEffect> {
        let index = self.reconciler.initial_focus_index(&self.state);
        self.focus_field(index as isize)
    }

    /// Press on the field row: focus the next enterable field.
    ///
    /// With `clear_inputs`, the code is cleared and the first field focused.
    pub fn container_pressed(&mut self, clear_inputs: bool) -> Vec<OtpEffect> {
        if clear_inputs {
            let mut effects = self.clear();
            effects.extend(self.focus_field(0));
            return effects;
        }
        let next = self.filled_count().min(self.state.last_index());
        self.focus_field(next as isize)
    }

    /// Removes focus from every field (the keyboard was dismissed).
    pub fn keyboard_hidden(&mut self) -> Vec<OtpEffect> {
        self.blur_all_fields()
    }
}
