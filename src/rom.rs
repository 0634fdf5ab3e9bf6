// iNES ROM ingestion.
//
// This is the external loader the core's design notes describe: it turns a
// raw file buffer into the `RomInfo` the cartridge reads once at insertion.
// Full iNES 2.0 semantics (submapper, PRG/CHR-RAM sizing beyond the legacy
// byte) are not attempted; this reads enough of flags 6/7 to route to mapper
// 0, 4, or 5 and to recover mirroring/battery/four-screen bits.

use crate::cartridge::Mirroring;
use crate::error::RomError;

const HEADER_SIZE: usize = 16;
const TRAINER_SIZE: usize = 512;
const PRG_BANK_SIZE: usize = 16 * 1024;
const CHR_BANK_SIZE: usize = 8 * 1024;
const CHR_RAM_SIZE: usize = 8 * 1024;

/// Parsed cartridge contents, handed to the core exactly once at insertion.
#[derive(Debug, Clone)]
pub struct RomInfo {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub chr_is_ram: bool,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub prg_ram: Vec<u8>,
}

impl RomInfo {
    /// Parse an iNES 1.0-style image. Trainers are skipped, not preserved.
    pub fn from_ines_bytes(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::Truncated);
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != *b"NES\x1A" {
            return Err(RomError::BadMagic(magic));
        }

        let prg_banks = data[4] as usize;
        let chr_banks = data[5] as usize;
        if prg_banks == 0 {
            return Err(RomError::EmptyPrgRom);
        }

        let flags6 = data[6];
        let flags7 = data[7];
        let has_trainer = flags6 & 0x04 != 0;
        let four_screen = flags6 & 0x08 != 0;
        let vertical = flags6 & 0x01 != 0;
        let has_battery = flags6 & 0x02 != 0;
        let mapper = (flags6 >> 4) | (flags7 & 0xF0);

        let mirroring = if four_screen {
            Mirroring::FourScreen
        } else if vertical {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mut offset = HEADER_SIZE;
        if has_trainer {
            offset += TRAINER_SIZE;
        }

        let prg_size = prg_banks * PRG_BANK_SIZE;
        let chr_size = chr_banks * CHR_BANK_SIZE;
        let expected = offset + prg_size + chr_size;
        if data.len() < expected {
            return Err(RomError::SizeMismatch {
                expected,
                found: data.len(),
            });
        }

        let prg_rom = data[offset..offset + prg_size].to_vec();
        offset += prg_size;

        let (chr_rom, chr_is_ram) = if chr_banks == 0 {
            (vec![0u8; CHR_RAM_SIZE], true)
        } else {
            (data[offset..offset + chr_size].to_vec(), false)
        };

        log::debug!(
            "parsed iNES: mapper={} prg={}KiB chr={}KiB chr_ram={} mirroring={:?}",
            mapper,
            prg_size / 1024,
            chr_size / 1024,
            chr_is_ram,
            mirroring
        );

        Ok(RomInfo {
            prg_rom,
            chr_rom,
            chr_is_ram,
            mapper,
            mirroring,
            has_battery,
            prg_ram: vec![0u8; 8 * 1024],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_ines(mapper: u8, prg_banks: u8, chr_banks: u8, vertical: bool) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_SIZE];
        data[0..4].copy_from_slice(b"NES\x1A");
        data[4] = prg_banks;
        data[5] = chr_banks;
        data[6] = ((mapper & 0x0F) << 4) | if vertical { 0x01 } else { 0x00 };
        data[7] = mapper & 0xF0;
        data.extend(vec![0xAAu8; prg_banks as usize * PRG_BANK_SIZE]);
        data.extend(vec![0xBBu8; chr_banks as usize * CHR_BANK_SIZE]);
        data
    }

    #[test]
    fn rejects_short_files() {
        assert!(matches!(
            RomInfo::from_ines_bytes(&[0u8; 4]),
            Err(RomError::Truncated)
        ));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = build_ines(0, 1, 1, false);
        data[0] = b'X';
        assert!(matches!(
            RomInfo::from_ines_bytes(&data),
            Err(RomError::BadMagic(_))
        ));
    }

    #[test]
    fn parses_nrom_header() {
        let data = build_ines(0, 2, 1, false);
        let rom = RomInfo::from_ines_bytes(&data).unwrap();
        assert_eq!(rom.mapper, 0);
        assert_eq!(rom.prg_rom.len(), 2 * PRG_BANK_SIZE);
        assert_eq!(rom.chr_rom.len(), CHR_BANK_SIZE);
        assert!(!rom.chr_is_ram);
        assert_eq!(rom.mirroring, Mirroring::Horizontal);
    }

    #[test]
    fn allocates_chr_ram_when_absent() {
        let data = build_ines(4, 1, 0, true);
        let rom = RomInfo::from_ines_bytes(&data).unwrap();
        assert!(rom.chr_is_ram);
        assert_eq!(rom.chr_rom.len(), CHR_RAM_SIZE);
        assert_eq!(rom.mirroring, Mirroring::Vertical);
    }

    #[test]
    fn detects_mapper_number_high_nibble() {
        let data = build_ines(5, 1, 1, false);
        let rom = RomInfo::from_ines_bytes(&data).unwrap();
        assert_eq!(rom.mapper, 5);
    }
}
