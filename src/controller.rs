// Standard NES controller ($4016/$4017), §4.6.
//
// The shift register continuously reloads from the live button state while
// strobe is high; only the falling edge of strobe latches a snapshot that
// then shifts out one bit per read while strobe is low.

const BUTTON_COUNT: u8 = 8;

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
struct Pad {
    /// bit0=A bit1=B bit2=Select bit3=Start bit4=Up bit5=Down bit6=Left bit7=Right
    live: u8,
    shift: u8,
    index: u8,
}

impl Pad {
    fn set_state(&mut self, bits: u8, strobe_high: bool) {
        self.live = bits;
        if strobe_high {
            self.shift = bits;
            self.index = 0;
        }
    }

    fn read(&mut self, strobe_high: bool) -> u8 {
        if strobe_high {
            // While strobe is high the register is continuously reloaded;
            // every read observes the current A button state.
            self.live & 0x01
        } else if self.index >= BUTTON_COUNT {
            // Past the eighth bit, real hardware's open bus returns 1.
            1
        } else {
            let bit = (self.shift >> self.index) & 0x01;
            self.index += 1;
            bit
        }
    }
}

/// Two-port standard controller I/O, mapped at $4016 (port 1) / $4017 (port 2).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Controller {
    strobe: bool,
    pads: [Pad; 2],
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host input hands the core a single byte per port: bit0=A .. bit7=Right.
    pub fn set_joy_state(&mut self, port: usize, bits: u8) {
        if let Some(pad) = self.pads.get_mut(port) {
            pad.set_state(bits, self.strobe);
        }
    }

    /// $4016 write: bit0 is the strobe line.
    pub fn write_strobe(&mut self, value: u8) {
        let strobe_high = value & 0x01 != 0;
        let was_high = self.strobe;
        self.strobe = strobe_high;
        if was_high && !strobe_high {
            for pad in &mut self.pads {
                pad.shift = pad.live;
                pad.index = 0;
            }
        } else if strobe_high {
            for pad in &mut self.pads {
                pad.shift = pad.live;
                pad.index = 0;
            }
        }
    }

    /// $4016 read (port 1). The upper bits carry open-bus noise on real
    /// hardware; this core leaves them clear since there is no host open-bus
    /// model to approximate (Non-goal: host input plumbing).
    pub fn read_port1(&mut self) -> u8 {
        self.pads[0].read(self.strobe)
    }

    /// $4017 read (port 2).
    pub fn read_port2(&mut self) -> u8 {
        self.pads[1].read(self.strobe)
    }
}
