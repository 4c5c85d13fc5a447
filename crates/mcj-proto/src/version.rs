//! Protocol version identifiers and per-field version tables.
//!
//! A connection resolves its [`ProtocolVersion`] once during the handshake.
//! Every decoder that has more than one historical layout owns a small
//! [`VersionTable`] listing `(threshold, branch)` pairs in ascending order;
//! the first threshold that matches wins and an unmatched version falls
//! through to the newest branch.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Known protocol ids
// ---------------------------------------------------------------------------

/// 1.7.2, the first release of the netty protocol.
pub const V_1_7_2: i32 = 4;
/// 1.7.10.
pub const V_1_7_10: i32 = 5;
/// Entity ids switch from `i32` to VarInt.
pub const V_14W04A: i32 = 7;
/// Byte arrays switch from a 16-bit to a VarInt length prefix.
pub const V_14W21A: i32 = 19;
/// Item-stack NBT is no longer gzip-compressed.
pub const V_14W28B: i32 = 28;
/// 1.8.
pub const V_1_8: i32 = 47;
/// Entity metadata switches to the index byte + type id loop.
pub const V_15W31A: i32 = 48;
/// Entity spawn positions switch from fixed-point to doubles.
pub const V_16W06A: i32 = 77;
/// 1.9; entity metadata type ids become VarInts.
pub const V_1_9: i32 = 107;
/// 1.9.4.
pub const V_1_9_4: i32 = 110;
/// 1.10.
pub const V_1_10: i32 = 210;
/// Collect-item packets carry the picked-up count.
pub const V_16W32A: i32 = 301;
/// 1.11.2.
pub const V_1_11_2: i32 = 316;
/// Entity metadata gains the NBT value type.
pub const V_17W06A: i32 = 318;
/// 1.12.2.
pub const V_1_12_2: i32 = 340;
/// Particle data switches to the flattened layout.
pub const V_17W45A: i32 = 343;
/// The flattening: item damage leaves the slot, entity metadata is reordered.
pub const V_17W47A: i32 = 346;
/// 1.13.
pub const V_1_13: i32 = 393;
/// Item stacks switch to the presence-boolean layout.
pub const V_1_13_2_PRE1: i32 = 402;
/// 1.13.2.
pub const V_1_13_2: i32 = 404;
/// Packed block positions move `y` into the low 12 bits.
pub const V_18W43A: i32 = 440;
/// 1.14.
pub const V_1_14: i32 = 477;
/// 1.14.4.
pub const V_1_14_4: i32 = 498;
/// Login success carries a binary UUID instead of a string.
pub const V_20W12A: i32 = 707;
/// 1.16.
pub const V_1_16: i32 = 735;
/// 1.17.
pub const V_1_17: i32 = 755;
/// 1.17.1; container slot packets carry a state revision.
pub const V_1_17_1: i32 = 756;
/// 1.18.2.
pub const V_1_18_2: i32 = 758;
/// 1.19; command parsers are addressed by numeric id.
pub const V_1_19: i32 = 759;
/// 1.19.2.
pub const V_1_19_2: i32 = 760;
/// 1.19.3.
pub const V_1_19_3: i32 = 761;
/// 1.19.4.
pub const V_1_19_4: i32 = 762;
/// 1.20 / 1.20.1.
pub const V_1_20: i32 = 763;
/// 1.20.2; login is followed by the configuration state.
pub const V_1_20_2: i32 = 764;
/// 1.20.5.
pub const V_1_20_5: i32 = 766;

// ---------------------------------------------------------------------------
// ProtocolVersion
// ---------------------------------------------------------------------------

/// The protocol id negotiated for a connection.
///
/// Totally ordered; resolved once and never changed for the lifetime of the
/// connection.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(pub i32);

impl ProtocolVersion {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> i32 {
        self.0
    }

    /// `self < id`
    pub const fn is_before(self, id: i32) -> bool {
        self.0 < id
    }

    /// `self >= id`
    pub const fn is_at_least(self, id: i32) -> bool {
        self.0 >= id
    }

    /// `self <= id`
    pub const fn is_at_most(self, id: i32) -> bool {
        self.0 <= id
    }
}

impl From<i32> for ProtocolVersion {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProtocolVersion({})", self.0)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Threshold tables
// ---------------------------------------------------------------------------

/// A single comparison against a protocol id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// `version < id`
    Below(i32),
    /// `version <= id`
    AtMost(i32),
    /// `version == id`
    Exactly(i32),
}

impl Threshold {
    pub const fn matches(self, version: ProtocolVersion) -> bool {
        match self {
            Threshold::Below(id) => version.0 < id,
            Threshold::AtMost(id) => version.0 <= id,
            Threshold::Exactly(id) => version.0 == id,
        }
    }
}

/// Ordered first-match-wins table mapping a version to a branch.
///
/// Rows must be listed in ascending version order. They are not
/// commutative: `[AtMost(47), Exactly(110), AtMost(404)]` sends 110 to the
/// second row even though the third row also matches it.
#[derive(Debug)]
pub struct VersionTable<T: 'static> {
    rows: &'static [(Threshold, T)],
    newest: T,
}

impl<T: Copy + 'static> VersionTable<T> {
    pub const fn new(rows: &'static [(Threshold, T)], newest: T) -> Self {
        Self { rows, newest }
    }

    /// Select the branch for `version`.
    pub fn select(&self, version: ProtocolVersion) -> T {
        self.rows
            .iter()
            .find(|(threshold, _)| threshold.matches(version))
            .map(|(_, branch)| *branch)
            .unwrap_or(self.newest)
    }
}
