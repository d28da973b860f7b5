//! Channel flags for category filtering
//!
//! A message may carry an 8-bit channel mask. Mask `0` is the broadcast
//! channel and always passes; any other mask passes when it intersects the
//! logger's enabled channels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Arbitrary 8-bit flags for filtering logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelFlags(u8);

impl ChannelFlags {
    /// No bits: as a message channel this is the broadcast channel.
    pub const NONE: ChannelFlags = ChannelFlags(0);
    pub const BROADCAST: ChannelFlags = ChannelFlags(0);
    pub const ALL: ChannelFlags = ChannelFlags(0xff);

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    /// Flag with only bit `index` set. `index` must be below 8.
    pub const fn bit(index: u8) -> Self {
        assert!(index < 8, "channel bit index out of range");
        Self(1 << index)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: ChannelFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether a message tagged with `self` passes a logger whose enabled
    /// channels are `enabled`.
    pub const fn passes(self, enabled: ChannelFlags) -> bool {
        self.is_empty() || self.intersects(enabled)
    }

    /// `(self & !unset) | set`: unset is applied first, so a bit present in
    /// both ends up set.
    #[must_use]
    pub const fn update(self, set: ChannelFlags, unset: ChannelFlags) -> Self {
        Self((self.0 & !unset.0) | set.0)
    }
}

impl From<u8> for ChannelFlags {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<ChannelFlags> for u8 {
    fn from(flags: ChannelFlags) -> Self {
        flags.0
    }
}

impl BitOr for ChannelFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for ChannelFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010b}", self.0)
    }
}
