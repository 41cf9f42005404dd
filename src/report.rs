//! Block-by-block report of a dump.
//!
//! [`build_report`] walks sectors in ascending order and the blocks of each
//! sector in ascending order, producing one [`BlockRecord`] per block. Only
//! a dump of the wrong size fails the whole report; an inconsistent
//! access-bits slot is recorded on each block it governs and decoding
//! carries on.

use std::io::Read;

use log::{debug, trace, warn};

use crate::card::access::AccessCondition;
use crate::card::geometry::{self, BLOCK_SIZE, CardType, Geometry, SectorLayout};
use crate::card::manufacturer::Manufacturer;
use crate::card::permissions::{Permission, data_permissions, trailer_permissions};
use crate::card::trailer::Trailer;
#[cfg(feature = "serde")]
use crate::utils::serialize_hex;
use crate::utils::{bytesa, read_up_to};
use crate::{Error, Result};

/// Largest dump size accepted; reading one more byte detects oversize input.
const MAX_DUMP_LEN: usize = 4096;

/// An owned dump buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump(Vec<u8>);

impl Dump {
    /// Read a dump from `r`.
    ///
    /// At most one byte more than the largest valid dump is consumed, so an
    /// oversized input still shows up as a wrong size when resolved.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self> {
        let bytes = read_up_to(&mut r, MAX_DUMP_LEN + 1)?;
        debug!("read {} bytes of dump", bytes.len());
        Ok(Self(bytes))
    }

    /// Bytes as read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Dump {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl AsRef<[u8]> for Dump {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Report configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Interpret the dump as a Classic 1K card, ignoring bytes past 1024.
    pub force_1k: bool,
}

/// What a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BlockContents {
    /// Raw bytes of a data block.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_hex"))]
    Data([u8; BLOCK_SIZE]),
    /// Trailer split into its fields.
    Trailer(Trailer),
}

/// One row of a report.
///
/// Serialized with two derived fields besides its own: `error` (see
/// [`BlockRecord::has_error`]) and `permission_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Sector index.
    pub sector: usize,
    /// Block index within the sector.
    pub block: usize,
    /// Absolute offset in the dump.
    pub offset: usize,
    /// Block bytes, or trailer fields.
    pub contents: BlockContents,
    /// `None` when the governing slot has inconsistent bits.
    pub condition: Option<AccessCondition>,
    /// `None` exactly when `condition` is `None`.
    pub permission: Option<Permission>,
}

impl BlockRecord {
    /// Sector number to print on this row; only the first block of a
    /// sector carries it.
    pub fn sector_label(&self) -> Option<usize> {
        (self.block == 0).then_some(self.sector)
    }

    /// Whether this is the last block of its sector.
    pub fn is_trailer(&self) -> bool {
        matches!(self.contents, BlockContents::Trailer(_))
    }

    /// Whether the access bits for this block failed the complement check.
    pub fn has_error(&self) -> bool {
        self.condition.is_none()
    }

    /// Raw 16 bytes of the block, trailer fields reassembled.
    pub fn raw(&self) -> [u8; BLOCK_SIZE] {
        match &self.contents {
            BlockContents::Data(d) => *d,
            BlockContents::Trailer(t) => {
                let mut out = [0u8; BLOCK_SIZE];
                out[..6].copy_from_slice(t.key_a.as_bytes());
                out[6..10].copy_from_slice(&t.access_bits.0);
                out[10..].copy_from_slice(t.key_b.as_bytes());
                out
            }
        }
    }

    /// Permission text, empty when the condition is invalid.
    pub fn permission_text(&self) -> &'static str {
        self.permission.map(|p| p.text()).unwrap_or("")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BlockRecord {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut st = s.serialize_struct("BlockRecord", 8)?;
        st.serialize_field("sector", &self.sector)?;
        st.serialize_field("block", &self.block)?;
        st.serialize_field("offset", &self.offset)?;
        st.serialize_field("contents", &self.contents)?;
        st.serialize_field("condition", &self.condition)?;
        st.serialize_field("error", &self.has_error())?;
        st.serialize_field("permission", &self.permission)?;
        st.serialize_field("permission_text", self.permission_text())?;
        st.end()
    }
}

/// Decoded dump.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    /// Length of the input buffer.
    pub dump_len: usize,
    /// Card family the dump was interpreted as.
    pub card: CardType,
    /// Number of decoded sectors.
    pub sector_count: usize,
    /// Decoded block 0.
    pub manufacturer: Manufacturer,
    /// One record per block, in dump order.
    pub blocks: Vec<BlockRecord>,
}

impl Report {
    /// Number of blocks whose access bits are inconsistent.
    pub fn error_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.has_error()).count()
    }

    /// Whether any block has inconsistent access bits.
    pub fn has_errors(&self) -> bool {
        self.blocks.iter().any(BlockRecord::has_error)
    }

    /// Records of one sector.
    pub fn sector(&self, sector: usize) -> impl Iterator<Item = &BlockRecord> {
        self.blocks.iter().filter(move |b| b.sector == sector)
    }
}

/// Decode `dump` into a report.
///
/// Fails only with [`Error::InvalidSize`] (and never partially): every
/// block-local problem is recorded on its [`BlockRecord`].
pub fn build_report(dump: &[u8], options: ReportOptions) -> Result<Report> {
    let dump_len = dump.len();
    let geometry = geometry::resolve(dump_len, options.force_1k)?;
    let dump = dump
        .get(..geometry.interpreted_len())
        .ok_or(Error::InvalidSize(dump_len))?;

    let manufacturer = Manufacturer::parse(dump)?;
    let mut blocks = Vec::with_capacity(dump.len() / BLOCK_SIZE);
    for layout in geometry.sectors() {
        decode_sector(dump, &geometry, layout, &mut blocks)?;
    }

    Ok(Report {
        dump_len,
        card: geometry.card,
        sector_count: geometry.sector_count(),
        manufacturer,
        blocks,
    })
}

fn decode_sector(
    dump: &[u8],
    geometry: &Geometry,
    layout: SectorLayout,
    out: &mut Vec<BlockRecord>,
) -> Result<()> {
    let trailer = Trailer::read_at(dump, layout.trailer_offset())?;
    trace!(
        "sector {} of {}: access bits {}",
        layout.index,
        geometry.sector_count(),
        trailer.access_bits
    );

    for block in 0..layout.block_count {
        let offset = layout.block_offset(block);
        let is_trailer = block == layout.trailer_index();
        let condition = match trailer.access_bits.condition(block, layout.is_extended()) {
            Ok(c) => Some(c),
            Err(Error::InconsistentBits { slot }) => {
                warn!(
                    "sector {} block {block}: inconsistent access bits in slot {slot}",
                    layout.index
                );
                None
            }
            Err(e) => return Err(e),
        };

        let permission = condition.map(|c| {
            if layout.index == 0 && block == 0 {
                Permission::Manufacturer
            } else if is_trailer {
                Permission::Trailer(trailer_permissions(c))
            } else {
                Permission::Data(data_permissions(c))
            }
        });

        let contents = if is_trailer {
            BlockContents::Trailer(trailer)
        } else {
            BlockContents::Data(bytesa::<BLOCK_SIZE>(dump, offset)?)
        };

        out.push(BlockRecord {
            sector: layout.index,
            block,
            offset,
            contents,
            condition,
            permission,
        });
    }
    Ok(())
}
