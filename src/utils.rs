pub fn nibble_split(opcode: u16) -> (u8, u8, u8, u8) {
    (
        ((opcode & 0xF000) >> 12) as u8,
        ((opcode & 0x0F00) >> 8) as u8,
        ((opcode & 0x00F0) >> 4) as u8,
        (opcode & 0x000F) as u8,
    )
}

/// Hundreds, tens and ones of a byte, most significant first.
pub fn bcd(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_split() {
        assert_eq!(nibble_split(0xABCD), (0xA, 0xB, 0xC, 0xD));
        assert_eq!(nibble_split(0x00E0), (0x0, 0x0, 0xE, 0x0));
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd(157), [1, 5, 7]);
        assert_eq!(bcd(0), [0, 0, 0]);
        assert_eq!(bcd(255), [2, 5, 5]);
        assert_eq!(bcd(40), [0, 4, 0]);
    }
}
