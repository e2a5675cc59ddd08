//! Rail fence (zig-zag) transposition.

use crate::error::{Error, Result};

/// Yields the rail of each successive position along the zig-zag path:
/// start on rail 0 moving down, bounce at the top and bottom rails.
#[derive(Debug, Clone)]
struct ZigZag {
    rails: usize,
    rail: usize,
    down: bool,
}

impl ZigZag {
    fn new(rails: usize) -> Self {
        Self {
            rails,
            rail: 0,
            down: false,
        }
    }
}

impl Iterator for ZigZag {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.rails == 1 {
            return Some(0);
        }
        if self.rail == 0 || self.rail == self.rails - 1 {
            self.down = !self.down;
        }
        let current = self.rail;
        if self.down {
            self.rail += 1;
        } else {
            self.rail -= 1;
        }
        Some(current)
    }
}

/// Rail fence cipher keyed by its number of rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RailFenceCipher {
    rails: usize,
}

impl RailFenceCipher {
    /// At least one rail is required. One rail, or more rails than
    /// characters, leaves the text unchanged.
    pub fn new(rails: usize) -> Result<Self> {
        if rails == 0 {
            return Err(Error::InvalidKey("rail count must be at least 1".into()));
        }
        Ok(Self { rails })
    }

    pub fn rails(&self) -> usize {
        self.rails
    }

    pub fn encrypt(&self, text: &str) -> String {
        let mut rails = vec![String::new(); self.rails];
        for (ch, rail) in text.chars().zip(ZigZag::new(self.rails)) {
            rails[rail].push(ch);
        }
        rails.concat()
    }

    pub fn decrypt(&self, cipher: &str) -> String {
        let chars: Vec<char> = cipher.chars().collect();

        // Skeleton: which rail every position lands on.
        let path: Vec<usize> = ZigZag::new(self.rails).take(chars.len()).collect();
        let mut lengths = vec![0usize; self.rails];
        for &rail in &path {
            lengths[rail] += 1;
        }

        // Fill rail by rail with the cipher characters in order.
        let mut rails: Vec<std::slice::Iter<'_, char>> = Vec::with_capacity(self.rails);
        let mut start = 0;
        for len in lengths {
            rails.push(chars[start..start + len].iter());
            start += len;
        }

        // Read back along the zig-zag.
        path.into_iter()
            .filter_map(|rail| rails[rail].next())
            .collect()
    }
}
