//! MSB-first bit cursors over byte buffers.

/// Reads fixed-width chunks of bits from a byte slice, MSB first.
///
/// A chunk that runs past the end of the data is padded with zero bits on the
/// right, so the last chunk keeps its bits in the high positions.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute bit position of the next bit to read.
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total number of bits in the underlying data.
    pub fn len(&self) -> usize {
        self.data.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bits not yet consumed.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos)
    }

    /// Read `count` bits (1 to 32) right-aligned in the result.
    /// Returns `None` once every bit has been consumed.
    pub fn read_bits(&mut self, count: u32) -> Option<u32> {
        debug_assert!((1..=32).contains(&count));
        if self.remaining() == 0 {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.next_bit().unwrap_or(false));
        }
        Some(value)
    }

    fn next_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.pos / 8)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }
}

/// Packs fixed-width chunks of bits into bytes, MSB first.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Number of bits written so far.
    len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Number of bits written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!((1..=32).contains(&count));
        for shift in (0..count).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    pub fn push_bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    /// Read back bit `index`.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// The written bytes. A trailing partial byte is zero-filled on the right.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
