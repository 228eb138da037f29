//! # Value Objects
//!
//! Immutable domain primitives for the peer-help ledger.
//! These types represent concepts that are defined by their value, not identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since UNIX epoch.
///
/// Supplied by the `Clock` outbound port; the domain never reads wall time
/// itself.
pub type Timestamp = u64;

// =============================================================================
// ACCOUNT ID (32 bytes)
// =============================================================================

/// A 32-byte account address.
///
/// The unit of ownership and authorization: every mutating operation is
/// attributed to exactly one `AccountId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// The zero account (0x0000...0000). Never a valid caller.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an account id from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an account id from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns true if this is the zero account.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form: 0x + first 4 bytes + ..
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// =============================================================================
// ENTITY IDS
// =============================================================================

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw id value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Identifier of a help request. Allocated sequentially by the Registry;
    /// id 0 is never issued.
    RequestId
}

entity_id! {
    /// Identifier of a help offer.
    OfferId
}

entity_id! {
    /// Identifier of a match record. At most one per request, ever.
    MatchId
}

entity_id! {
    /// Identifier of a minted tier badge.
    BadgeId
}

// =============================================================================
// TOPIC
// =============================================================================

/// Curriculum area a help request belongs to.
///
/// Closed catalog; wire-encodes as a `u8` tag 0-13.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Topic {
    /// Shell scripting fundamentals.
    Shell = 0,
    /// The libft C library project.
    Libft = 1,
    /// get_next_line.
    GetNextLine = 2,
    /// ft_printf.
    FtPrintf = 3,
    /// Born2beroot system administration.
    Born2beroot = 4,
    /// minitalk signal-based IPC.
    Minitalk = 5,
    /// push_swap sorting.
    PushSwap = 6,
    /// minishell.
    Minishell = 7,
    /// Philosophers concurrency.
    Philosophers = 8,
    /// C++ modules.
    CppModules = 9,
    /// cub3d raycasting.
    Cub3d = 10,
    /// miniRT ray tracing.
    MiniRt = 11,
    /// webserv HTTP server.
    Webserv = 12,
    /// ft_transcendence full-stack project.
    FtTranscendence = 13,
}

impl Topic {
    /// All topics in tag order.
    pub const ALL: [Topic; 14] = [
        Topic::Shell,
        Topic::Libft,
        Topic::GetNextLine,
        Topic::FtPrintf,
        Topic::Born2beroot,
        Topic::Minitalk,
        Topic::PushSwap,
        Topic::Minishell,
        Topic::Philosophers,
        Topic::CppModules,
        Topic::Cub3d,
        Topic::MiniRt,
        Topic::Webserv,
        Topic::FtTranscendence,
    ];

    /// Decodes a wire tag. Returns None for out-of-range tags.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Returns the wire tag for this topic.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Human-readable topic name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Topic::Shell => "Shell",
            Topic::Libft => "Libft",
            Topic::GetNextLine => "get_next_line",
            Topic::FtPrintf => "ft_printf",
            Topic::Born2beroot => "Born2beroot",
            Topic::Minitalk => "minitalk",
            Topic::PushSwap => "push_swap",
            Topic::Minishell => "minishell",
            Topic::Philosophers => "Philosophers",
            Topic::CppModules => "CPP Modules",
            Topic::Cub3d => "cub3d",
            Topic::MiniRt => "miniRT",
            Topic::Webserv => "webserv",
            Topic::FtTranscendence => "ft_transcendence",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TIER
// =============================================================================

/// Reputation tier, derived purely from cumulative `helps_given`.
///
/// Ordinal 0-4. Thresholds: Bronze at 5 helps, Silver at 15, Gold at 40,
/// Diamond at 100.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Tier {
    /// Starting tier, no badge.
    #[default]
    Newcomer = 0,
    /// 5+ helps given.
    Bronze = 1,
    /// 15+ helps given.
    Silver = 2,
    /// 40+ helps given.
    Gold = 3,
    /// 100+ helps given.
    Diamond = 4,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 5] = [
        Tier::Newcomer,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Diamond,
    ];

    /// Computes the tier a mentor holds for a given `helps_given` count.
    ///
    /// Pure function: same input, same output, no stored state consulted.
    #[must_use]
    pub const fn for_helps_given(helps_given: u64) -> Self {
        match helps_given {
            0..=4 => Tier::Newcomer,
            5..=14 => Tier::Bronze,
            15..=39 => Tier::Silver,
            40..=99 => Tier::Gold,
            _ => Tier::Diamond,
        }
    }

    /// Minimum `helps_given` required for this tier.
    #[must_use]
    pub const fn threshold(self) -> u64 {
        match self {
            Tier::Newcomer => 0,
            Tier::Bronze => 5,
            Tier::Silver => 15,
            Tier::Gold => 40,
            Tier::Diamond => 100,
        }
    }

    /// Display name, minted into badges as `tier_name`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Newcomer => "Newcomer",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Diamond => "Diamond",
        }
    }

    /// Ordinal value (0-4).
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Decodes an ordinal. Returns None for values above 4.
    #[must_use]
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================
