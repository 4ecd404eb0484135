use bitflags::bitflags;
use std::cmp::min;

/// Longest path length the flags can record; longer paths store this value
pub const MAX_NAME_LENGTH: usize = 0x0FFF;

bitflags! {
    /// 16-bit flags field of an index entry
    ///
    /// Low 12 bits hold the path length, bits 12-13 the merge stage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0FFF;
    }
}

impl EntryFlags {
    pub fn for_path(path: &str, stage: u8) -> Self {
        let name_length = min(path.len(), MAX_NAME_LENGTH) as u16;
        let stage = (u16::from(stage) & 0x3) << 12;
        Self::from_bits_retain(name_length | stage)
    }

    pub fn name_length(&self) -> usize {
        usize::from(self.bits() & Self::NAME_LENGTH.bits())
    }

    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }
}
