//! # Donation Bus
//!
//! Hands donation events from the chat side to the engine thread.
//!
//! ```text
//! ┌─────────────┐  ChatIntake   ┌──────────────┐   drain()   ┌──────────────┐
//! │ chat client │──────────────>│   bounded    │────────────>│ EffectEngine │
//! │  (thread)   │  normalised   │   channel    │  per tick   │ (one thread) │
//! └─────────────┘               └──────────────┘             └──────────────┘
//! ```
//!
//! Amounts are converted to the reference currency before they are queued.
//! A full queue drops the event; the chat side never blocks.

use crate::settings::SettingsHandle;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use donafx_economy::to_reference_amount;
use donafx_shared::{DonationEvent, DonationTier};

/// Bounded channel of donation events.
pub struct DonationBus {
    sender: Sender<DonationEvent>,
    receiver: Receiver<DonationEvent>,
}

impl DonationBus {
    /// Creates a bus holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> DonationSender {
        DonationSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> DonationReceiver {
        DonationReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a sender and receiver pair.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (DonationSender, DonationReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for queueing events.
#[derive(Clone)]
pub struct DonationSender {
    sender: Sender<DonationEvent>,
}

impl DonationSender {
    /// Queues an event without blocking.
    ///
    /// Returns `false` if the queue is full or the engine is gone; the
    /// event is dropped.
    pub fn send(&self, event: DonationEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    "bus: queue full, dropped {} of {:.2}",
                    event.tier.label(),
                    event.amount
                );
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("bus: engine disconnected, event dropped");
                false
            }
        }
    }
}

/// Handle for taking events off the queue.
#[derive(Clone)]
pub struct DonationReceiver {
    receiver: Receiver<DonationEvent>,
}

impl DonationReceiver {
    /// Takes every pending event (non-blocking).
    #[must_use]
    pub fn drain(&self) -> Vec<DonationEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes one event (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<DonationEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

// =============================================================================
// CHAT INTAKE
// =============================================================================

/// The chat side's entry point: normalises raw chat events and queues them.
#[derive(Clone)]
pub struct ChatIntake {
    sender: DonationSender,
    settings: SettingsHandle,
}

impl ChatIntake {
    /// Creates an intake feeding `sender`.
    #[must_use]
    pub const fn new(sender: DonationSender, settings: SettingsHandle) -> Self {
        Self { sender, settings }
    }

    /// Queues a paid event, converting `amount` from `currency` to the
    /// reference currency.
    pub fn paid(
        &self,
        tier: DonationTier,
        amount: f64,
        currency: &str,
        display_name: &str,
        message: &str,
    ) -> bool {
        let normalised = to_reference_amount(amount, currency);
        tracing::info!(
            "intake: {} from '{}': {:.2} {} ({:.2} reference)",
            tier.label(),
            display_name,
            amount,
            currency,
            normalised
        );
        let mut event = DonationEvent::new(tier, normalised).with_author(display_name, message);
        event.currency = currency.to_owned();
        self.sender.send(event)
    }

    /// Queues a plain chat comment as a small SuperChat, if enabled.
    /// Returns `false` when comments do not trigger anything.
    pub fn comment(&self, display_name: &str, message: &str) -> bool {
        if !self.settings.read(|s| s.trigger_on_regular_comment) {
            return false;
        }
        self.sender
            .send(DonationEvent::regular_comment(display_name, message))
    }
}
