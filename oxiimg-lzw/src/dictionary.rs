//! LZW dictionary (code table) management.
//!
//! Strings are stored as `(predecessor code, appended byte)` pairs in a fixed
//! arena of [`MAX_CODES`] slots, so expanding a code walks integer links
//! backwards. Lookups for the encoder go through a closed hash table with
//! linear probing.

/// Capacity of the code table.
pub const MAX_CODES: usize = 4096;

/// Number of codes reserved after the literals (CLEAR and END).
const RESERVED_CODES: usize = 2;

/// Hash table size; prime and larger than twice [`MAX_CODES`].
const HASH_SIZE: usize = 9973;

/// Probe step, coprime with [`HASH_SIZE`].
const HASH_STEP: usize = 2039;

const HASH_FREE: u16 = u16::MAX;

/// Outcome of [`LzwDictionary::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The string was stored under this code.
    Assigned(u16),
    /// All [`MAX_CODES`] slots are in use.
    TableFull,
}

/// Outcome of [`LzwDictionary::expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// The whole requested part of the string was written.
    Complete(usize),
    /// The output filled up; this many bytes were written and the caller
    /// resumes with `skip_head` advanced by the same amount.
    Partial(usize),
}

impl Expansion {
    /// Bytes written.
    pub fn written(self) -> usize {
        match self {
            Expansion::Complete(n) | Expansion::Partial(n) => n,
        }
    }

    /// Whether the string was expanded to its end.
    pub fn is_complete(self) -> bool {
        matches!(self, Expansion::Complete(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    prefix: Option<u16>,
    byte: u8,
    len: u16,
}

/// Hashed LZW string table shared by the encoder and the streaming decoder.
#[derive(Debug, Clone)]
pub struct LzwDictionary {
    entries: Box<[Entry]>,
    hash: Box<[u16]>,
    len: usize,
}

impl LzwDictionary {
    /// Create a dictionary seeded for `code_size`-bit symbols.
    pub fn new(code_size: u8) -> Self {
        let mut dict = Self {
            entries: vec![Entry::default(); MAX_CODES].into_boxed_slice(),
            hash: vec![HASH_FREE; HASH_SIZE].into_boxed_slice(),
            len: 0,
        };
        dict.reset(code_size);
        dict
    }

    /// Clear the table and reseed the literal codes.
    ///
    /// Codes `0..1 << code_size` become single-byte strings; the two codes
    /// after them are reserved and never hold a string.
    pub fn reset(&mut self, code_size: u8) {
        self.len = 0;
        self.hash.fill(HASH_FREE);
        let literals = 1usize << code_size;
        for symbol in 0..literals {
            self.add(None, symbol as u8);
        }
        for _ in 0..RESERVED_CODES {
            self.entries[self.len] = Entry::default();
            self.len += 1;
        }
    }

    /// Number of codes in use, reserved ones included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no code is in use (never true after a reset).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every slot is taken.
    pub fn is_full(&self) -> bool {
        self.len >= MAX_CODES
    }

    /// Length of the string behind `code` (0 for reserved or unused codes).
    pub fn code_len(&self, code: u16) -> usize {
        if (code as usize) < self.len {
            self.entries[code as usize].len as usize
        } else {
            0
        }
    }

    #[inline]
    fn hash(prefix: Option<u16>, byte: u8) -> usize {
        let prefix = prefix.unwrap_or(HASH_FREE) as usize;
        (((byte as usize) << 8) ^ prefix) % HASH_SIZE
    }

    /// Find the code for `prefix` extended by `byte`.
    ///
    /// Without a prefix the byte is its own code.
    pub fn find(&self, prefix: Option<u16>, byte: u8) -> Option<u16> {
        let Some(code) = prefix else {
            return Some(byte as u16);
        };
        let mut slot = Self::hash(prefix, byte);
        loop {
            let candidate = self.hash[slot];
            if candidate == HASH_FREE {
                return None;
            }
            let entry = &self.entries[candidate as usize];
            if entry.prefix == Some(code) && entry.byte == byte {
                return Some(candidate);
            }
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }
    }

    /// Store `prefix` extended by `byte` under the next free code.
    pub fn add(&mut self, prefix: Option<u16>, byte: u8) -> Insertion {
        if self.is_full() {
            return Insertion::TableFull;
        }
        let code = self.len as u16;

        let mut slot = Self::hash(prefix, byte);
        while self.hash[slot] != HASH_FREE {
            slot = (slot + HASH_STEP) % HASH_SIZE;
        }
        self.hash[slot] = code;

        let len = match prefix {
            Some(p) => self.entries[p as usize % MAX_CODES].len.saturating_add(1),
            None => 1,
        };
        self.entries[self.len] = Entry { prefix, byte, len };
        self.len += 1;
        Insertion::Assigned(code)
    }

    /// Write the string behind `code`, minus its first `skip_head` bytes,
    /// into `out`.
    ///
    /// When `out` is too short, the leading part that fits is written and
    /// [`Expansion::Partial`] is returned.
    pub fn expand(&self, code: u16, out: &mut [u8], skip_head: usize) -> Expansion {
        let total = self.code_len(code);
        if skip_head >= total {
            return Expansion::Complete(0);
        }
        let wanted = total - skip_head;
        let written = wanted.min(out.len());
        let mut skip_tail = wanted - written;

        let mut idx = written;
        let mut cursor = Some(code);
        while idx > 0 {
            let Some(c) = cursor else { break };
            let entry = &self.entries[c as usize];
            if skip_tail > 0 {
                skip_tail -= 1;
            } else {
                idx -= 1;
                out[idx] = entry.byte;
            }
            cursor = entry.prefix;
        }

        if wanted > written {
            Expansion::Partial(written)
        } else {
            Expansion::Complete(written)
        }
    }

    /// First byte of the string behind `code`.
    pub fn first_byte(&self, code: u16) -> Option<u8> {
        let mut first = [0u8; 1];
        match self.expand(code, &mut first, 0).written() {
            0 => None,
            _ => Some(first[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_of(dict: &LzwDictionary, code: u16) -> Vec<u8> {
        let mut out = vec![0u8; dict.code_len(code)];
        assert!(dict.expand(code, &mut out, 0).is_complete());
        out
    }

    #[test]
    fn test_dictionary_init() {
        let dict = LzwDictionary::new(8);
        for i in 0..256u16 {
            assert_eq!(string_of(&dict, i), vec![i as u8]);
        }
        assert_eq!(dict.len(), 258);
        assert_eq!(dict.code_len(256), 0);
        assert_eq!(dict.code_len(257), 0);
    }

    #[test]
    fn test_find_without_prefix_is_literal() {
        let dict = LzwDictionary::new(8);
        assert_eq!(dict.find(None, 65), Some(65));
        assert_eq!(dict.find(Some(65), 66), None);
    }

    #[test]
    fn test_add_and_find() {
        let mut dict = LzwDictionary::new(8);
        assert_eq!(dict.add(Some(b'A' as u16), b'B'), Insertion::Assigned(258));
        assert_eq!(dict.add(Some(258), b'C'), Insertion::Assigned(259));
        assert_eq!(dict.find(Some(b'A' as u16), b'B'), Some(258));
        assert_eq!(dict.find(Some(258), b'C'), Some(259));
        assert_eq!(string_of(&dict, 259), b"ABC".to_vec());
    }

    #[test]
    fn test_table_full() {
        let mut dict = LzwDictionary::new(8);
        let mut prefix = 0u16;
        while let Insertion::Assigned(code) = dict.add(Some(prefix), 7) {
            prefix = code;
        }
        assert_eq!(dict.len(), MAX_CODES);
        assert_eq!(prefix, 4095);
        assert_eq!(dict.add(Some(1), 1), Insertion::TableFull);
        // Every stored entry is still reachable.
        assert_eq!(dict.find(Some(4094), 7), Some(4095));
    }

    #[test]
    fn test_reset_forgets_strings() {
        let mut dict = LzwDictionary::new(8);
        dict.add(Some(1), 2);
        dict.reset(8);
        assert_eq!(dict.find(Some(1), 2), None);
        assert_eq!(dict.len(), 258);
    }

    #[test]
    fn test_expand_in_windows() {
        let mut dict = LzwDictionary::new(8);
        let mut code = b'a' as u16;
        for &b in b"bcdefg" {
            let Insertion::Assigned(next) = dict.add(Some(code), b) else {
                panic!("table full");
            };
            code = next;
        }

        let mut window = [0u8; 3];
        assert_eq!(dict.expand(code, &mut window, 0), Expansion::Partial(3));
        assert_eq!(&window, b"abc");
        assert_eq!(dict.expand(code, &mut window, 3), Expansion::Partial(3));
        assert_eq!(&window, b"def");
        assert_eq!(dict.expand(code, &mut window, 6), Expansion::Complete(1));
        assert_eq!(window[0], b'g');
        assert_eq!(dict.expand(code, &mut window, 7), Expansion::Complete(0));
        assert_eq!(dict.first_byte(code), Some(b'a'));
    }

    #[test]
    fn test_identical_call_sequences_assign_identical_codes() {
        let ops: Vec<(u16, u8)> = (0..3000u32)
            .map(|i| ((i * 7919 % 258) as u16, (i * 31 % 256) as u8))
            .collect();

        let mut a = LzwDictionary::new(8);
        let mut b = LzwDictionary::new(8);
        for &(prefix, byte) in &ops {
            let found_a = a.find(Some(prefix), byte);
            let found_b = b.find(Some(prefix), byte);
            assert_eq!(found_a, found_b);
            if found_a.is_none() {
                assert_eq!(a.add(Some(prefix), byte), b.add(Some(prefix), byte));
            }
        }
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_small_code_size() {
        let dict = LzwDictionary::new(2);
        assert_eq!(dict.len(), 6);
        assert_eq!(string_of(&dict, 3), vec![3]);
        assert_eq!(dict.code_len(4), 0);
    }
}
