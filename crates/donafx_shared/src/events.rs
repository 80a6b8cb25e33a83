//! Inbound donation events.
//!
//! The chat client produces these; the router consumes them. Amounts are
//! already normalised to the reference currency when an event reaches the
//! router.

use crate::constants::REGULAR_COMMENT_AMOUNT;
use serde::{Deserialize, Serialize};

/// Donation tier discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationTier {
    /// Large tier - perturbs the main source
    SuperChat = 0,
    /// Small tier - always drives recovery
    SuperSticker = 1,
}

impl DonationTier {
    /// Human-readable tier name used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SuperChat => "SuperChat",
            Self::SuperSticker => "SuperSticker",
        }
    }
}

/// A single donation, normalised to the reference currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonationEvent {
    /// Tier of the donation
    pub tier: DonationTier,
    /// Amount in reference-currency units
    pub amount: f64,
    /// Donor display name
    pub display_name: String,
    /// Attached chat message
    pub message: String,
    /// Original currency code (informational after normalisation)
    pub currency: String,
}

impl DonationEvent {
    /// Creates an anonymous event of the given tier
    #[must_use]
    pub fn new(tier: DonationTier, amount: f64) -> Self {
        Self {
            tier,
            amount,
            display_name: String::new(),
            message: String::new(),
            currency: "JPY".to_owned(),
        }
    }

    /// Anonymous super-chat of `amount`
    #[must_use]
    pub fn super_chat(amount: f64) -> Self {
        Self::new(DonationTier::SuperChat, amount)
    }

    /// Anonymous super-sticker of `amount`
    #[must_use]
    pub fn super_sticker(amount: f64) -> Self {
        Self::new(DonationTier::SuperSticker, amount)
    }

    /// A regular chat comment promoted to a minimal super-chat
    #[must_use]
    pub fn regular_comment(display_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::super_chat(REGULAR_COMMENT_AMOUNT).with_author(display_name, message)
    }

    /// Attaches donor name and message
    #[must_use]
    pub fn with_author(mut self, display_name: impl Into<String>, message: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self.message = message.into();
        self
    }

    /// Is this a recovery-tier event?
    #[inline]
    #[must_use]
    pub fn is_recovery(&self) -> bool {
        self.tier == DonationTier::SuperSticker
    }
}
