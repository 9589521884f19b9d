//! User-facing notices.
//!
//! Cart operations never return errors to their caller. Anything the user
//! should hear about goes through a [`Notifier`] as a fire-and-forget
//! notice, the way a storefront shows a toast. The message strings are part
//! of the observable behaviour and are kept in [`messages`].

use std::sync::{Mutex, PoisonError};

/// Exact notice texts shown to shoppers.
pub mod messages {
    /// Requested quantity is above the available stock.
    pub const STOCK_EXCEEDED: &str = "Quantidade solicitada fora de estoque";

    /// Adding a product failed.
    pub const ADD_FAILED: &str = "Erro na adição do produto";

    /// Removing a product failed, including when it is not in the cart.
    pub const REMOVE_FAILED: &str = "Erro na remoção do produto";

    /// Changing a product's quantity failed.
    pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";
}

/// Category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Requested quantity exceeds stock.
    StockExceeded,
    /// The product is not in the cart.
    NotFound,
    /// Network, parse, persistence or any other unexpected failure.
    Failed,
}

/// Cart operation a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartAction {
    Add,
    Remove,
    Update,
}

impl CartAction {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => messages::ADD_FAILED,
            Self::Remove => messages::REMOVE_FAILED,
            Self::Update => messages::UPDATE_FAILED,
        }
    }
}

/// Message shown for a notice of `kind` raised by `action`.
#[must_use]
pub const fn notice_message(kind: NoticeKind, action: CartAction) -> &'static str {
    match kind {
        NoticeKind::StockExceeded => messages::STOCK_EXCEEDED,
        NoticeKind::NotFound | NoticeKind::Failed => action.failure_message(),
    }
}

/// A notice as delivered to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for user-facing notices. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(NoticeKind, &str) + Send + Sync,
{
    fn notify(&self, kind: NoticeKind, message: &str) {
        self(kind, message);
    }
}

/// Emits every notice as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        tracing::warn!(kind = ?kind, "{message}");
    }
}

/// Keeps every notice in memory for the host to render or inspect.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain and return all notices received so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                kind,
                message: message.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            notice_message(NoticeKind::StockExceeded, CartAction::Add),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(
            notice_message(NoticeKind::StockExceeded, CartAction::Update),
            messages::STOCK_EXCEEDED
        );
        assert_eq!(
            notice_message(NoticeKind::NotFound, CartAction::Remove),
            "Erro na remoção do produto"
        );
        assert_eq!(
            notice_message(NoticeKind::Failed, CartAction::Add),
            "Erro na adição do produto"
        );
        assert_eq!(
            notice_message(NoticeKind::Failed, CartAction::Update),
            "Erro na alteração de quantidade do produto"
        );
    }

    #[test]
    fn test_recording_notifier_take_drains() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NoticeKind::Failed, "one");
        notifier.notify(NoticeKind::NotFound, "two");

        assert_eq!(notifier.notices().len(), 2);
        let taken = notifier.take();
        assert_eq!(taken[0].message, "one");
        assert_eq!(taken[1].kind, NoticeKind::NotFound);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_closures_are_notifiers() {
        let calls = AtomicUsize::new(0);
        let notifier = |_: NoticeKind, _: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
        };

        notifier.notify(NoticeKind::StockExceeded, messages::STOCK_EXCEEDED);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
