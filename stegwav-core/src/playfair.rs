//! Playfair digraph substitution over a keyed 5×5 letter grid.

use crate::error::{Error, Result};

/// Grid alphabet: the 26 letters with J folded into I.
const ALPHABET: &[u8; 25] = b"ABCDEFGHIKLMNOPQRSTUVWXYZ";
/// Letter used to split doubled letters and pad a trailing singleton.
pub const FILLER: u8 = b'X';

const SIZE: usize = 5;

/// Uppercase ASCII letters of `text` with J folded into I. Everything else is dropped.
pub fn normalize(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| match b.to_ascii_uppercase() {
            b'J' => b'I',
            upper => upper,
        })
        .collect()
}

/// A 5×5 grid of 25 distinct letters derived from a passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherMatrix {
    cells: [[u8; SIZE]; SIZE],
    /// Position of each letter, indexed by `letter - b'A'`.
    positions: [Option<(usize, usize)>; 26],
}

impl CipherMatrix {
    /// Key letters first (deduplicated, in order), then the rest of the alphabet.
    pub fn from_key(key: &str) -> Self {
        let mut seen = [false; 26];
        let mut order = Vec::with_capacity(ALPHABET.len());
        for letter in normalize(key).into_iter().chain(ALPHABET.iter().copied()) {
            let slot = &mut seen[(letter - b'A') as usize];
            if !*slot {
                *slot = true;
                order.push(letter);
            }
        }
        debug_assert_eq!(order.len(), SIZE * SIZE);

        let mut cells = [[0u8; SIZE]; SIZE];
        let mut positions = [None; 26];
        for (i, &letter) in order.iter().enumerate() {
            let (row, col) = (i / SIZE, i % SIZE);
            cells[row][col] = letter;
            positions[(letter - b'A') as usize] = Some((row, col));
        }
        Self { cells, positions }
    }

    pub fn at(&self, row: usize, col: usize) -> u8 {
        self.cells[row % SIZE][col % SIZE]
    }

    /// Row and column of an uppercase letter, `None` for J or non-letters.
    pub fn position(&self, letter: u8) -> Option<(usize, usize)> {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        self.positions[(letter - b'A') as usize]
    }

    /// The grid rows as strings, top to bottom.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&b| b as char).collect())
            .collect()
    }
}

/// Split normalized text into digraphs, inserting [`FILLER`] between doubled
/// letters and after a trailing singleton.
pub fn digraphs(letters: &[u8]) -> Vec<(u8, u8)> {
    let mut pairs = Vec::with_capacity(letters.len() / 2 + 1);
    let mut i = 0;
    while i < letters.len() {
        let a = letters[i];
        match letters.get(i + 1) {
            Some(&b) if b != a => {
                pairs.push((a, b));
                i += 2;
            }
            _ => {
                pairs.push((a, FILLER));
                i += 1;
            }
        }
    }
    pairs
}

/// Playfair cipher keyed by a passphrase.
#[derive(Debug, Clone)]
pub struct PlayfairCipher {
    matrix: CipherMatrix,
}

impl PlayfairCipher {
    /// Build the cipher grid. A passphrase without any letters is rejected.
    pub fn new(key: &str) -> Result<Self> {
        if normalize(key).is_empty() {
            return Err(Error::InvalidKey(
                "substitution passphrase must contain at least one letter".into(),
            ));
        }
        Ok(Self {
            matrix: CipherMatrix::from_key(key),
        })
    }

    pub fn matrix(&self) -> &CipherMatrix {
        &self.matrix
    }

    /// Encrypt `plaintext`. Non-letters are dropped before pairing.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let letters = normalize(plaintext);
        let mut out = String::with_capacity(letters.len() + 2);
        for (a, b) in digraphs(&letters) {
            let (x, y) = self.substitute(a, b, 1);
            out.push(x as char);
            out.push(y as char);
        }
        out
    }

    /// Decrypt `ciphertext`. Filler letters inserted during encryption remain.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let letters: Vec<u8> = ciphertext.bytes().map(|b| b.to_ascii_uppercase()).collect();
        if letters.len() % 2 != 0 {
            return Err(Error::InvalidCiphertext(format!(
                "expected an even number of letters, got {}",
                letters.len()
            )));
        }
        if let Some(&bad) = letters.iter().find(|&&b| self.matrix.position(b).is_none()) {
            return Err(Error::InvalidCiphertext(format!(
                "character {:?} is not in the cipher grid",
                bad as char
            )));
        }

        let mut out = String::with_capacity(letters.len());
        for pair in letters.chunks_exact(2) {
            let (x, y) = self.substitute(pair[0], pair[1], SIZE - 1);
            out.push(x as char);
            out.push(y as char);
        }
        Ok(out)
    }

    /// Apply the row/column/rectangle rule. `shift` is 1 to encrypt and 4
    /// (one step back, modulo 5) to decrypt.
    fn substitute(&self, a: u8, b: u8, shift: usize) -> (u8, u8) {
        let (Some((r1, c1)), Some((r2, c2))) = (self.matrix.position(a), self.matrix.position(b))
        else {
            unreachable!("digraph letters come from the grid alphabet");
        };
        let m = &self.matrix;
        if r1 == r2 {
            (m.at(r1, c1 + shift), m.at(r2, c2 + shift))
        } else if c1 == c2 {
            (m.at(r1 + shift, c1), m.at(r2 + shift, c2))
        } else {
            (m.at(r1, c2), m.at(r2, c1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_from_monarchy() {
        let matrix = CipherMatrix::from_key("MONARCHY");
        assert_eq!(
            matrix.rows(),
            vec!["MONAR", "CHYBD", "EFGIK", "LPQST", "UVWXZ"]
        );
    }

    #[test]
    fn matrix_has_25_distinct_letters() {
        let matrix = CipherMatrix::from_key("the quick brown fox jumps over the lazy dog");
        let mut letters: Vec<char> = matrix.rows().concat().chars().collect();
        letters.sort_unstable();
        letters.dedup();
        assert_eq!(letters.len(), 25);
        assert!(!letters.contains(&'J'));
    }

    #[test]
    fn key_normalization_ignores_case_spaces_and_j() {
        assert_eq!(
            CipherMatrix::from_key("jam 42 session"),
            CipherMatrix::from_key("IAMSESSION")
        );
    }

    #[test]
    fn digraph_rules() {
        assert_eq!(
            digraphs(b"BALLOON"),
            vec![(b'B', b'A'), (b'L', b'X'), (b'L', b'O'), (b'O', b'N')]
        );
        assert_eq!(digraphs(b"ABC"), vec![(b'A', b'B'), (b'C', b'X')]);
        assert!(digraphs(b"").is_empty());
    }

    #[test]
    fn textbook_instruments() {
        let cipher = PlayfairCipher::new("MONARCHY").unwrap();
        let ct = cipher.encrypt("INSTRUMENTS");
        assert_eq!(ct, "GATLMZCLRQXA");
        assert_eq!(cipher.decrypt(&ct).unwrap(), "INSTRUMENTSX");
    }

    #[test]
    fn round_trip_keeps_fillers_visible() {
        let cipher = PlayfairCipher::new("playfair example").unwrap();
        let ct = cipher.encrypt("Hide the gold in the tree stump");
        assert_eq!(ct.len() % 2, 0);
        assert_eq!(cipher.decrypt(&ct).unwrap(), "HIDETHEGOLDINTHETREXESTUMP");
    }

    #[test]
    fn j_is_folded_into_i() {
        let cipher = PlayfairCipher::new("KEY").unwrap();
        let ct = cipher.encrypt("jest");
        assert_eq!(cipher.decrypt(&ct).unwrap(), "IEST");
    }

    #[test]
    fn empty_passphrase_rejected() {
        assert!(matches!(PlayfairCipher::new(""), Err(Error::InvalidKey(_))));
        assert!(matches!(PlayfairCipher::new("123 !"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn odd_ciphertext_rejected() {
        let cipher = PlayfairCipher::new("MONARCHY").unwrap();
        assert!(matches!(cipher.decrypt("GAT"), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn foreign_characters_rejected() {
        let cipher = PlayfairCipher::new("MONARCHY").unwrap();
        assert!(matches!(cipher.decrypt("GA1B"), Err(Error::InvalidCiphertext(_))));
        assert!(matches!(cipher.decrypt("JA"), Err(Error::InvalidCiphertext(_))));
    }

    #[test]
    fn lowercase_ciphertext_accepted() {
        let cipher = PlayfairCipher::new("MONARCHY").unwrap();
        assert_eq!(cipher.decrypt("gatlmzclrqxa").unwrap(), "INSTRUMENTSX");
    }

    #[test]
    fn empty_plaintext() {
        let cipher = PlayfairCipher::new("MONARCHY").unwrap();
        assert_eq!(cipher.encrypt(" 123 "), "");
        assert_eq!(cipher.decrypt("").unwrap(), "");
    }
}
