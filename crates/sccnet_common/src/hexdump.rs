use std::fmt;

/// Lazily formatted hex + ASCII dump of a byte slice, 16 bytes per line.
///
/// Formatting only happens when the value is displayed, so it can be handed
/// to `log::trace!` without paying for it when tracing is off.
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.0.chunks(16).enumerate() {
            if line != 0 {
                writeln!(f)?;
            }
            write!(f, "{:04X}:", line * 16)?;
            for col in 0..16 {
                match chunk.get(col) {
                    Some(byte) => write!(f, " {byte:02X}")?,
                    None => f.write_str("   ")?,
                }
            }
            f.write_str("  ")?;
            for &byte in chunk {
                let c = if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
