//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. Widget effects that only move focus or
//! report code changes are applied here; the rest become `UiEffect`s.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use otp_core::fields::FieldHandle;
use otp_core::{HandleCommand, OtpEffect, WidgetEvent};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => vec![],
        UiEvent::Frame { width, height } => {
            app.area = Rect::new(0, 0, width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Widget(widget_event) => apply_widget(app, widget_event),
        UiEvent::TaskStarted { kind, cancel } => {
            if app.widget.is_disposed() {
                // Started after teardown already ran.
                return vec![UiEffect::CancelTask {
                    kind,
                    token: Some(cancel),
                }];
            }
            app.tasks.state_mut(kind).on_started(cancel);
            vec![]
        }
        UiEvent::TaskCompleted { kind } => {
            app.tasks.state_mut(kind).clear();
            vec![]
        }
        UiEvent::SmsListenerFailed { error } => {
            app.status = Some(format!("SMS listener unavailable: {error}"));
            vec![]
        }
    }
}

/// Attaches every field and mounts the widget.
pub fn mount(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for index in 0..app.pin_count() {
        effects.extend(apply_widget(
            app,
            WidgetEvent::FieldMounted {
                index,
                handle: FieldHandle(index as u64),
            },
        ));
    }
    effects.extend(apply_widget(app, WidgetEvent::Mounted));
    effects
}

/// Tears the widget down and quits with `outcome`.
pub fn finish(app: &mut AppState, outcome: Option<String>) -> Vec<UiEffect> {
    app.outcome = outcome;
    let mut effects = apply_widget(app, WidgetEvent::Unmounted);
    app.focused = None;
    effects.push(UiEffect::Quit);
    effects
}

/// Runs one widget event and resolves its effects.
pub fn apply_widget(app: &mut AppState, event: WidgetEvent) -> Vec<UiEffect> {
    let widget_effects = app.widget.update(event);
    let mut effects = Vec::new();
    for effect in widget_effects {
        effects.extend(apply_widget_effect(app, effect));
    }
    effects
}

fn apply_widget_effect(app: &mut AppState, effect: OtpEffect) -> Vec<UiEffect> {
    match effect {
        OtpEffect::FocusField(index) => move_focus(app, Some(index)),
        OtpEffect::BlurField(index) => {
            if app.focused == Some(index) {
                move_focus(app, None)
            } else {
                vec![]
            }
        }
        OtpEffect::ClearField(index) => vec![UiEffect::Dispatch(WidgetEvent::ClearField(index))],
        OtpEffect::CodeChanged(code) => {
            debug!(len = code.len(), "code changed");
            if app.filled.as_ref().is_some_and(|filled| *filled != code) {
                app.filled = None;
                app.status = None;
            }
            if app.controlled {
                apply_widget(app, WidgetEvent::CodePropChanged(Some(code)))
            } else {
                vec![]
            }
        }
        OtpEffect::CodeFilled(code) => {
            debug!("code filled");
            app.filled = Some(code);
            app.status = Some("Code complete. Press Enter to submit.".to_string());
            vec![]
        }
        OtpEffect::FieldFocused(index) => {
            debug!(index, "field focused");
            vec![]
        }
        OtpEffect::FieldBlurred(index) => {
            debug!(index, "field blurred");
            vec![]
        }
        OtpEffect::ScheduleAutoFocus { delay } => vec![UiEffect::StartAutoFocus { delay }],
        OtpEffect::CancelAutoFocus => vec![cancel_task(app, TaskKind::AutoFocus)],
        OtpEffect::StartClipboardPoll { interval } => {
            vec![UiEffect::StartClipboardPoll { interval }]
        }
        OtpEffect::StopClipboardPoll => vec![cancel_task(app, TaskKind::ClipboardPoll)],
        OtpEffect::StartSmsListener => vec![UiEffect::StartSmsListener],
        OtpEffect::StopSmsListener => vec![
            cancel_task(app, TaskKind::SmsListener),
            UiEffect::StopSmsListener,
        ],
    }
}

/// Moves the terminal cursor and reports blur/focus back to the widget.
fn move_focus(app: &mut AppState, target: Option<usize>) -> Vec<UiEffect> {
    if app.focused == target {
        return vec![];
    }
    let previous = std::mem::replace(&mut app.focused, target);
    let mut effects = Vec::new();
    if let Some(previous) = previous {
        effects.extend(apply_widget(app, WidgetEvent::HostBlurred(previous)));
    }
    if let Some(index) = target {
        effects.extend(apply_widget(app, WidgetEvent::HostFocused(index)));
    }
    effects
}

fn cancel_task(app: &mut AppState, kind: TaskKind) -> UiEffect {
    UiEffect::CancelTask {
        kind,
        token: app.tasks.state_mut(kind).take(),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => handle_paste(app, &text),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => finish(app, None),
        KeyCode::Esc => match app.focused {
            Some(_) => apply_widget(app, WidgetEvent::KeyboardHidden),
            None => finish(app, None),
        },
        KeyCode::Enter => {
            if app.is_complete() {
                let code = app.widget.controller().code();
                finish(app, Some(code))
            } else {
                apply_widget(app, WidgetEvent::Pressed)
            }
        }
        KeyCode::Char(c) if !ctrl && c.is_ascii_digit() => {
            let mut effects = Vec::new();
            if app.focused.is_none() {
                effects.extend(apply_widget(app, WidgetEvent::Pressed));
            }
            let Some(index) = app.focused else {
                return effects;
            };
            effects.extend(apply_widget(
                app,
                WidgetEvent::Input {
                    index,
                    text: c.to_string(),
                },
            ));
            effects
        }
        KeyCode::Backspace => match app.focused {
            Some(index) => apply_widget(app, WidgetEvent::Backspace { index }),
            None => vec![],
        },
        KeyCode::Left => step_focus(app, -1),
        KeyCode::Right => step_focus(app, 1),
        _ => vec![],
    }
}

fn step_focus(app: &mut AppState, delta: isize) -> Vec<UiEffect> {
    let Some(index) = app.focused else {
        return apply_widget(app, WidgetEvent::Pressed);
    };
    let target = index as isize + delta;
    apply_widget(
        app,
        WidgetEvent::Command(HandleCommand::FocusField(Some(target))),
    )
}

fn handle_paste(app: &mut AppState, text: &str) -> Vec<UiEffect> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }
    let index = app.focused.unwrap_or(0);
    apply_widget(
        app,
        WidgetEvent::Input {
            index,
            text: text.to_string(),
        },
    )
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Vec<UiEffect> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return vec![];
    }
    let position = Position::new(mouse.column, mouse.row);
    let hit = render::field_rects(app.area, app.pin_count())
        .iter()
        .any(|rect| rect.contains(position));
    if hit {
        apply_widget(app, WidgetEvent::Pressed)
    } else {
        vec![]
    }
}
