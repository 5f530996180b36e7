// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Warning alerts.
//!
//! Alerts are queued by [`AlertService::warning`] and drawn by the app as a
//! modal window, one at a time. Pressing OK dismisses the front alert and
//! runs its completion handler.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Completion run when an alert is dismissed.
pub type DismissHandler = Box<dyn FnOnce() + Send>;

/// Presents warnings to the user. Fire-and-forget: callers do not wait for
/// the dismissal.
pub trait AlertService {
    fn warning(&self, message: &str, on_dismiss: DismissHandler);
}

struct PendingAlert {
    message: String,
    on_dismiss: DismissHandler,
}

/// FIFO of pending warnings, shared between the presenter and the app.
#[derive(Clone, Default)]
pub struct AlertQueue {
    pending: Arc<Mutex<VecDeque<PendingAlert>>>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Message of the alert currently on screen.
    pub fn current_message(&self) -> Option<String> {
        self.lock().front().map(|alert| alert.message.clone())
    }

    /// Remove the front alert and run its completion.
    pub fn dismiss_current(&self) {
        let dismissed = self.lock().pop_front();
        if let Some(alert) = dismissed {
            (alert.on_dismiss)();
        }
    }

    /// Draw the front alert as a centered modal window.
    pub fn show(&self, ctx: &egui::Context) {
        let Some(message) = self.current_message() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Warning")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0).color(egui::Color32::YELLOW));
                    ui.label(message.as_str());
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.dismiss_current();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<PendingAlert>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlertService for AlertQueue {
    fn warning(&self, message: &str, on_dismiss: DismissHandler) {
        log::warn!("{}", message);
        self.lock().push_back(PendingAlert {
            message: message.to_string(),
            on_dismiss,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_alerts_are_shown_in_order() {
        let queue = AlertQueue::new();
        queue.warning("first", Box::new(|| {}));
        queue.warning("second", Box::new(|| {}));

        assert_eq!(queue.current_message().as_deref(), Some("first"));
        queue.dismiss_current();
        assert_eq!(queue.current_message().as_deref(), Some("second"));
    }

    #[test]
    fn test_dismiss_runs_completion_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let queue = AlertQueue::new();
        let counter = Arc::clone(&calls);
        queue.warning("oops", Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        queue.dismiss_current();
        queue.dismiss_current();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_the_queue() {
        let queue = AlertQueue::new();
        let presenter_side = queue.clone();
        presenter_side.warning("shared", Box::new(|| {}));
        assert_eq!(queue.current_message().as_deref(), Some("shared"));
    }
}
