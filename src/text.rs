// Sat Oct 17 2026 - Alex

//! UTF-16 input encoded once to UTF-8, with offset maps in both directions.
//!
//! Editors count positions in UTF-16 code units while the engines work on
//! UTF-8 bytes. The offset table only starts at the first character that
//! encodes differently in the two forms; before it both offsets coincide.

use std::char::REPLACEMENT_CHARACTER;

#[derive(Debug, Clone)]
pub struct Utf16Text {
    units: Vec<u16>,
    utf8: Vec<u8>,
    /// UTF-16 offset where `table` starts.
    table_start: usize,
    /// For each code unit from `table_start`, its UTF-8 offset minus `table_start`.
    table: Option<Vec<u32>>,
}

impl Utf16Text {
    /// Unpaired surrogates are encoded as U+FFFD.
    pub fn from_utf16(units: &[u16]) -> Self {
        let mut utf8 = Vec::with_capacity(units.len());
        let mut table_start = 0;
        let mut table: Option<Vec<u32>> = None;
        let mut position = 0;
        let mut buf = [0u8; 4];

        for decoded in char::decode_utf16(units.iter().copied()) {
            let (ch, width) = match decoded {
                Ok(ch) => (ch, ch.len_utf16()),
                Err(_) => (REPLACEMENT_CHARACTER, 1),
            };
            let encoded = ch.encode_utf8(&mut buf);

            if table.is_none() && (encoded.len() > 1 || width > 1) {
                // Everything before is ASCII, so `position == utf8.len()` here.
                table_start = position;
                table = Some(Vec::with_capacity(units.len() - position));
            }
            if let Some(table) = table.as_mut() {
                let mapped = (utf8.len() - table_start) as u32;
                table.extend(std::iter::repeat(mapped).take(width));
            }

            utf8.extend_from_slice(encoded.as_bytes());
            position += width;
        }

        Self {
            units: units.to_vec(),
            utf8,
            table_start,
            table,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.utf8
    }

    pub fn as_utf16(&self) -> &[u16] {
        &self.units
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_multi_byte_characters(&self) -> bool {
        self.table.is_some()
    }

    /// Slice in UTF-16 code units, clamped to the text like `String.prototype.substring`.
    pub fn substring(&self, start: usize, end: usize) -> String {
        let (start, end) = (start.min(self.len()), end.min(self.len()));
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        String::from_utf16_lossy(&self.units[start..end])
    }

    /// O(1). Offsets at or past the end map to the encoded length.
    pub fn utf16_to_utf8(&self, offset: usize) -> usize {
        if offset >= self.units.len() {
            return self.utf8.len();
        }
        match &self.table {
            Some(table) if offset >= self.table_start => {
                table[offset - self.table_start] as usize + self.table_start
            }
            _ => offset,
        }
    }

    /// O(log n). An offset inside a character maps to that character's first code unit.
    pub fn utf8_to_utf16(&self, offset: usize) -> usize {
        if offset >= self.utf8.len() {
            return self.units.len();
        }
        match &self.table {
            Some(table) if offset >= self.table_start => {
                first_unit_at(table, offset - self.table_start) + self.table_start
            }
            _ => offset,
        }
    }
}

impl From<&str> for Utf16Text {
    fn from(text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        Self::from_utf16(&units)
    }
}

impl std::fmt::Display for Utf16Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.units))
    }
}

fn first_unit_at(table: &[u32], utf8_offset: usize) -> usize {
    let mut low = table.partition_point(|&mapped| (mapped as usize) < utf8_offset);

    while low > 0 && (low >= table.len() || table[low] as usize > utf8_offset) {
        low -= 1;
    }
    // second unit of a surrogate pair
    if low > 0 && table[low] == table[low - 1] {
        low -= 1;
    }

    low
}
