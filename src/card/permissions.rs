//! Meaning of each access condition.
//!
//! Two fixed 8-entry tables, one for sector trailers and one for data
//! blocks, indexed by the condition value `C1 C2 C3`. Every entry carries
//! both the structured permissions and the compact text used in reports.
//!
//! ## Trailer text columns
//! ```text
//! key A   | access bits | key B
//! r   w   | r     w     | r   w
//! ```
//!
//! ## Data text columns
//! ```text
//! read | write | increment | decrement, transfer, restore
//! ```

use super::access::AccessCondition;

/// Permission text of the manufacturer block (sector 0, block 0), which is
/// read-only whatever its condition says.
pub const MANUFACTURER_TEXT: &str = "-";

/// Which key grants an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum KeyAccess {
    /// No key allows it.
    Never,
    /// Key A only.
    KeyA,
    /// Key B only.
    KeyB,
    /// Either key.
    Both,
}

impl KeyAccess {
    /// Whether authenticating with key A allows the operation.
    pub const fn key_a(self) -> bool {
        matches!(self, Self::KeyA | Self::Both)
    }

    /// Whether authenticating with key B allows the operation.
    pub const fn key_b(self) -> bool {
        matches!(self, Self::KeyB | Self::Both)
    }
}

/// How a data block is meant to be used under a given condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockMode {
    /// Factory default, everything allowed with either key.
    Transport,
    /// Value block with increment/decrement operations.
    Value,
    /// Plain read/write block.
    ReadWrite,
}

/// Permissions for the three fields of a sector trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TrailerPermissions {
    /// Reading key A (never allowed on real cards).
    pub key_a_read: KeyAccess,
    /// Writing key A.
    pub key_a_write: KeyAccess,
    /// Reading the access bits.
    pub access_read: KeyAccess,
    /// Writing the access bits.
    pub access_write: KeyAccess,
    /// Reading key B.
    pub key_b_read: KeyAccess,
    /// Writing key B.
    pub key_b_write: KeyAccess,
    /// Condition `001`, the factory transport configuration.
    pub transport: bool,
    /// Compact report text.
    pub text: &'static str,
}

/// Permissions for a data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataPermissions {
    /// Reading the block.
    pub read: KeyAccess,
    /// Writing the block.
    pub write: KeyAccess,
    /// Incrementing a value block.
    pub increment: KeyAccess,
    /// Decrement, transfer and restore share one permission.
    pub decrement: KeyAccess,
    /// Intended block usage.
    pub mode: BlockMode,
    /// Compact report text.
    pub text: &'static str,
}

use BlockMode::{ReadWrite, Transport, Value};
use KeyAccess::{Both, KeyA, KeyB, Never};

const fn trailer(
    key_a: (KeyAccess, KeyAccess),
    access: (KeyAccess, KeyAccess),
    key_b: (KeyAccess, KeyAccess),
    transport: bool,
    text: &'static str,
) -> TrailerPermissions {
    TrailerPermissions {
        key_a_read: key_a.0,
        key_a_write: key_a.1,
        access_read: access.0,
        access_write: access.1,
        key_b_read: key_b.0,
        key_b_write: key_b.1,
        transport,
        text,
    }
}

const fn data(
    read: KeyAccess,
    write: KeyAccess,
    increment: KeyAccess,
    decrement: KeyAccess,
    mode: BlockMode,
    text: &'static str,
) -> DataPermissions {
    DataPermissions {
        read,
        write,
        increment,
        decrement,
        mode,
        text,
    }
}

/// Trailer permissions indexed by condition value.
pub static TRAILER_PERMISSIONS: [TrailerPermissions; 8] = [
    trailer((Never, KeyA), (KeyA, Never), (KeyA, KeyA), false, "- A | A   - | A A"),
    trailer((Never, KeyA), (KeyA, KeyA), (KeyA, KeyA), true, "- A | A   A | A A [transport]"),
    trailer((Never, Never), (KeyA, Never), (KeyA, Never), false, "- - | A   - | A -"),
    trailer((Never, KeyB), (Both, KeyB), (Never, KeyB), false, "- B | A/B B | - B"),
    trailer((Never, KeyB), (Both, Never), (Never, KeyB), false, "- B | A/B - | - B"),
    trailer((Never, Never), (Both, KeyB), (Never, Never), false, "- - | A/B B | - -"),
    trailer((Never, Never), (Both, Never), (Never, Never), false, "- - | A/B - | - -"),
    trailer((Never, Never), (Both, Never), (Never, Never), false, "- - | A/B - | - -"),
];

/// Data block permissions indexed by condition value.
pub static DATA_PERMISSIONS: [DataPermissions; 8] = [
    data(Both, Both, Both, Both, Transport, "A/B | A/B   | A/B | A/B [transport]"),
    data(Both, Never, Never, Both, Value, "A/B |  -    |  -  | A/B [value]"),
    data(Both, Never, Never, Never, ReadWrite, "A/B |  -    |  -  |  -  [r/w]"),
    data(KeyB, KeyB, Never, Never, ReadWrite, "  B |   B   |  -  |  -  [r/w]"),
    data(Both, KeyB, Never, Never, ReadWrite, "A/B |   B   |  -  |  -  [r/w]"),
    data(KeyB, Never, Never, Never, ReadWrite, "  B |  -    |  -  |  -  [r/w]"),
    data(Both, KeyB, KeyB, Both, Value, "A/B |   B   |   B | A/B [value]"),
    data(Never, Never, Never, Never, ReadWrite, " -  |  -    |  -  |  -  [r/w]"),
];

/// Trailer permissions for a condition.
pub fn trailer_permissions(c: AccessCondition) -> &'static TrailerPermissions {
    &TRAILER_PERMISSIONS[c.value() as usize]
}

/// Data block permissions for a condition.
pub fn data_permissions(c: AccessCondition) -> &'static DataPermissions {
    &DATA_PERMISSIONS[c.value() as usize]
}

/// Permission attached to one block of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Permission {
    /// Manufacturer block: locked regardless of the decoded condition.
    Manufacturer,
    /// Sector trailer.
    Trailer(&'static TrailerPermissions),
    /// Data or value block.
    Data(&'static DataPermissions),
}

impl Permission {
    /// Compact report text.
    pub fn text(&self) -> &'static str {
        match self {
            Self::Manufacturer => MANUFACTURER_TEXT,
            Self::Trailer(p) => p.text,
            Self::Data(p) => p.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_entries() {
        let t = trailer_permissions(AccessCondition::new(1));
        assert!(t.transport);
        // Key A not readable, key A writable, key B readable.
        assert_eq!(t.key_a_read, Never);
        assert!(t.key_a_write.key_a());
        assert!(t.key_b_read.key_a());
        assert_eq!(t.text, "- A | A   A | A A [transport]");

        let d = data_permissions(AccessCondition::new(0));
        assert_eq!(d.mode, Transport);
        assert!(d.text.ends_with("[transport]"));
    }

    #[test]
    fn key_a_is_never_readable() {
        assert!(TRAILER_PERMISSIONS.iter().all(|p| p.key_a_read == Never));
    }

    #[test]
    fn exactly_one_transport_trailer() {
        let n = TRAILER_PERMISSIONS.iter().filter(|p| p.transport).count();
        assert_eq!(n, 1);
    }

    #[test]
    fn text_reflects_structure_for_data_blocks() {
        for p in &DATA_PERMISSIONS {
            match p.mode {
                Value => assert!(p.text.ends_with("[value]")),
                ReadWrite => assert!(p.text.ends_with("[r/w]")),
                Transport => assert!(p.text.ends_with("[transport]")),
            }
        }
        let locked = data_permissions(AccessCondition::new(7));
        assert_eq!(locked.read, Never);
        assert_eq!(locked.write, Never);
    }

    #[test]
    fn manufacturer_text_is_dash() {
        assert_eq!(Permission::Manufacturer.text(), "-");
    }
}
