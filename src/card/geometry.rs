//! Sector/block geometry of MIFARE Classic dumps.
//!
//! ## Dump sizes
//! | Bytes | Card            | Sectors |
//! |-------|-----------------|---------|
//! | 320   | MIFARE Mini     | 5       |
//! | 1024  | Classic 1K      | 16      |
//! | 2048  | Classic 2K      | 32      |
//! | 4096  | Classic 4K      | 40      |
//!
//! ## Layout
//! ```text
//! [0x000 + s*0x40]             sectors 0-31:  4 blocks x 16 bytes
//! [0x800 + (s-32)*0x100]       sectors 32-39: 16 blocks x 16 bytes (4K only)
//! ```
//! The last block of every sector is its trailer.

use log::debug;

use crate::{Error, Result};

/// Size of every block, in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Sectors below this index are small (4 blocks); from here on they are
/// extended (16 blocks).
pub const FIRST_EXTENDED_SECTOR: usize = 32;

const SMALL_SECTOR_BLOCKS: usize = 4;
const EXTENDED_SECTOR_BLOCKS: usize = 16;
const EXTENDED_AREA_OFFSET: usize = FIRST_EXTENDED_SECTOR * SMALL_SECTOR_BLOCKS * BLOCK_SIZE;

/// Card family, identified from the dump size alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CardType {
    /// MIFARE Mini, 320 bytes.
    Mini,
    /// MIFARE Classic 1K, 1024 bytes.
    Classic1K,
    /// MIFARE Classic 2K, 2048 bytes.
    Classic2K,
    /// MIFARE Classic 4K, 4096 bytes.
    Classic4K,
}

impl CardType {
    /// Identify the card from a dump length.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            320 => Ok(Self::Mini),
            1024 => Ok(Self::Classic1K),
            2048 => Ok(Self::Classic2K),
            4096 => Ok(Self::Classic4K),
            _ => Err(Error::InvalidSize(len)),
        }
    }

    /// Dump size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Mini => 320,
            Self::Classic1K => 1024,
            Self::Classic2K => 2048,
            Self::Classic4K => 4096,
        }
    }

    /// Number of sectors on the card.
    pub const fn sector_count(self) -> usize {
        match self {
            Self::Mini => 5,
            Self::Classic1K => 16,
            Self::Classic2K => 32,
            Self::Classic4K => 40,
        }
    }

    /// Human-readable card name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mini => "MIFARE Mini",
            Self::Classic1K => "MIFARE Classic 1K",
            Self::Classic2K => "MIFARE Classic 2K",
            Self::Classic4K => "MIFARE Classic 4K",
        }
    }
}

/// Placement of one sector inside the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectorLayout {
    /// Sector index.
    pub index: usize,
    /// Absolute offset of the first block.
    pub base_offset: usize,
    /// Number of blocks, trailer included.
    pub block_count: usize,
    /// Size of each block (always [`BLOCK_SIZE`]).
    pub block_size: usize,
}

impl SectorLayout {
    /// Compute the layout of sector `index`, without checking it against a
    /// card size.
    pub const fn of(index: usize) -> Self {
        if index < FIRST_EXTENDED_SECTOR {
            Self {
                index,
                base_offset: index * SMALL_SECTOR_BLOCKS * BLOCK_SIZE,
                block_count: SMALL_SECTOR_BLOCKS,
                block_size: BLOCK_SIZE,
            }
        } else {
            Self {
                index,
                base_offset: EXTENDED_AREA_OFFSET
                    + (index - FIRST_EXTENDED_SECTOR) * EXTENDED_SECTOR_BLOCKS * BLOCK_SIZE,
                block_count: EXTENDED_SECTOR_BLOCKS,
                block_size: BLOCK_SIZE,
            }
        }
    }

    /// Whether this is a 16-block sector with clustered access conditions.
    pub const fn is_extended(&self) -> bool {
        self.index >= FIRST_EXTENDED_SECTOR
    }

    /// Sector size in bytes.
    pub const fn size(&self) -> usize {
        self.block_count * self.block_size
    }

    /// Index of the trailer block within the sector.
    pub const fn trailer_index(&self) -> usize {
        self.block_count - 1
    }

    /// Absolute offset of block `block` of this sector.
    pub const fn block_offset(&self, block: usize) -> usize {
        self.base_offset + block * self.block_size
    }

    /// Absolute offset of the trailer block.
    pub const fn trailer_offset(&self) -> usize {
        self.block_offset(self.trailer_index())
    }
}

/// Resolved geometry of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Geometry {
    /// Card family the dump is interpreted as.
    pub card: CardType,
}

impl Geometry {
    /// Number of sectors to decode.
    pub const fn sector_count(&self) -> usize {
        self.card.sector_count()
    }

    /// Number of bytes of the dump that are interpreted.
    pub const fn interpreted_len(&self) -> usize {
        self.card.size()
    }

    /// Layout of sector `index`.
    ///
    /// Returns [`Error::SectorOutOfRange`] past the last sector of the card.
    pub fn sector_layout(&self, index: usize) -> Result<SectorLayout> {
        if index >= self.sector_count() {
            return Err(Error::SectorOutOfRange(index));
        }
        Ok(SectorLayout::of(index))
    }

    /// Layouts of all sectors in ascending order.
    pub fn sectors(&self) -> impl Iterator<Item = SectorLayout> {
        (0..self.sector_count()).map(SectorLayout::of)
    }
}

/// Resolve the geometry for a dump of `len` bytes.
///
/// With `force_1k` the dump is interpreted as a Classic 1K card and only
/// its first 1024 bytes are used; a shorter buffer is still rejected.
pub fn resolve(len: usize, force_1k: bool) -> Result<Geometry> {
    let card = if force_1k {
        if len < CardType::Classic1K.size() {
            return Err(Error::InvalidSize(len));
        }
        CardType::Classic1K
    } else {
        CardType::from_len(len)?
    };
    debug!(
        "{len} byte dump resolved as {} ({} sectors)",
        card.name(),
        card.sector_count()
    );
    Ok(Geometry { card })
}
