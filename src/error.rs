// Error types for ROM ingestion, mapper dispatch, and snapshot I/O.
//
// Follows the manual enum + hand-written Display/Error style already used
// by the save-state code rather than pulling in an error-derive crate.

use std::fmt;
use std::io;

/// Failure parsing or validating an incoming ROM image.
#[derive(Debug)]
pub enum RomError {
    /// The file is too short to contain an iNES header.
    Truncated,
    /// The first four bytes are not the `NES\x1A` magic.
    BadMagic([u8; 4]),
    /// PRG-ROM bank count is zero.
    EmptyPrgRom,
    /// The declared file size does not match header bank counts (plus trainer).
    SizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::Truncated => write!(f, "ROM image shorter than an iNES header"),
            RomError::BadMagic(bytes) => write!(f, "bad iNES magic: {:02x?}", bytes),
            RomError::EmptyPrgRom => write!(f, "ROM declares zero PRG-ROM banks"),
            RomError::SizeMismatch { expected, found } => write!(
                f,
                "ROM size mismatch: header implies {} bytes, file has {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for RomError {}

/// A mapper number with no implementation in this core.
#[derive(Debug)]
pub struct UnsupportedMapperError(pub u8);

impl fmt::Display for UnsupportedMapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mapper {} is not supported", self.0)
    }
}

impl std::error::Error for UnsupportedMapperError {}

/// Failure saving or restoring a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    Io(io::Error),
    Serialization(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    MapperMismatch { expected: u8, found: u8 },
    NoRomLoaded,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "snapshot I/O error: {}", e),
            SnapshotError::Serialization(e) => write!(f, "snapshot serialization error: {}", e),
            SnapshotError::VersionMismatch { expected, found } => write!(
                f,
                "snapshot version mismatch: expected {}, found {}",
                expected, found
            ),
            SnapshotError::MapperMismatch { expected, found } => write!(
                f,
                "snapshot mapper block mismatch: cartridge is mapper {}, snapshot has mapper {}",
                expected, found
            ),
            SnapshotError::NoRomLoaded => write!(f, "no ROM loaded"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Serialization(e)
    }
}
