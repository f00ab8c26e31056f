//! Decoder for the typedstream `attributedBody` column in Messages.db.
//!
//! Newer macOS releases leave `message.text` NULL and store the body as an
//! archived `NSAttributedString` in Apple's typedstream format:
//!
//! ```text
//! 04 0B "streamtyped" 81 E8 03          header (version 4, system 1000)
//! 84 01 40                              type "@" (object)
//! 84 84 84 12 "NSAttributedString" 00   new object, new class, version 0
//!    84 84 08 "NSObject" 00 85          superclass chain, nil-terminated
//! 92                                    type "@" again (shared string #0)
//! 84 84 84 08 "NSString" 01 94          NSString, superclass ref #2
//! 84 01 2B 05 "Hello" 86                type "+", 5 raw bytes, end of object
//! ```
//!
//! The message text is the first raw byte string (`+`) in the stream.
//!
//! CHANGELOG:
//! - 10/18/2026 - Structural typedstream reader replaces bplist/regex heuristics
//! - 01/10/2026 - Implemented full blob parsing

// ============================================================================
// TAGS
// ============================================================================

const TAG_INTEGER_2: u8 = 0x81;
const TAG_INTEGER_4: u8 = 0x82;
const TAG_FLOATING_POINT: u8 = 0x83;
const TAG_NEW: u8 = 0x84;
const TAG_NIL: u8 = 0x85;
const TAG_END_OF_OBJECT: u8 = 0x86;

/// References are encoded as integers offset from this (0x92 as i8).
const FIRST_REFERENCE: i64 = 0x92u8 as i8 as i64;

const SIGNATURE_LITTLE_ENDIAN: &[u8] = b"streamtyped";
const SIGNATURE_BIG_ENDIAN: &[u8] = b"typedstream";

/// Objects nested deeper than this are treated as malformed.
const MAX_DEPTH: usize = 64;

/// Decode the text of an `attributedBody` blob.
///
/// Returns the first raw byte-string segment decoded as UTF-8 (invalid
/// sequences replaced), or an empty string when the blob holds none.
/// Never fails.
pub fn decode_legacy_body(blob: &[u8]) -> String {
    if blob.is_empty() {
        return String::new();
    }

    let bytes = TypedStreamReader::new(blob)
        .and_then(|mut reader| reader.first_byte_string())
        .or_else(|| scan_nsstring(blob));

    match bytes {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => String::new(),
    }
}

// ============================================================================
// STRUCTURAL READER
// ============================================================================

struct TypedStreamReader<'a> {
    data: &'a [u8],
    pos: usize,
    little_endian: bool,
    /// Shared strings (type encodings, class names) in order of appearance.
    strings: Vec<&'a [u8]>,
    /// Only the count matters; references are never dereferenced.
    objects: usize,
}

/// Outcome of reading a value: either keep going, or the text was found.
enum Step<'a> {
    Continue,
    Found(&'a [u8]),
}

impl<'a> TypedStreamReader<'a> {
    /// Validate the header and position the reader at the first value.
    fn new(data: &'a [u8]) -> Option<Self> {
        let mut reader = Self {
            data,
            pos: 0,
            little_endian: true,
            strings: Vec::new(),
            objects: 0,
        };

        let _version = reader.read_byte()?;
        let signature_len = reader.read_length()?;
        let signature = reader.take(signature_len)?;
        reader.little_endian = match signature {
            SIGNATURE_LITTLE_ENDIAN => true,
            SIGNATURE_BIG_ENDIAN => false,
            _ => return None,
        };
        let _system_version = reader.read_integer()?;

        Some(reader)
    }

    /// Walk top-level values until the first `+` segment.
    fn first_byte_string(&mut self) -> Option<&'a [u8]> {
        while self.pos < self.data.len() {
            let encoding = self.read_shared_string()?;
            if let Step::Found(bytes) = self.read_values(encoding?, 0)? {
                return Some(bytes);
            }
        }
        None
    }

    /// Read one value for every type character in `encoding`.
    fn read_values(&mut self, encoding: &'a [u8], depth: usize) -> Option<Step<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }

        for &type_char in encoding {
            let step = match type_char {
                b'+' => {
                    let len = self.read_length()?;
                    Step::Found(self.take(len)?)
                }
                b'@' => self.read_object(depth + 1)?,
                b'#' => {
                    self.read_class()?;
                    Step::Continue
                }
                b'*' | b':' => {
                    self.read_shared_string()?;
                    Step::Continue
                }
                b'c' | b'C' | b's' | b'S' | b'i' | b'I' | b'l' | b'L' | b'q' | b'Q' => {
                    self.read_integer()?;
                    Step::Continue
                }
                b'f' => {
                    self.read_float(4)?;
                    Step::Continue
                }
                b'd' => {
                    self.read_float(8)?;
                    Step::Continue
                }
                // Arrays, structs, and anything exotic never precede the text
                _ => return None,
            };
            if let Step::Found(_) = step {
                return Some(step);
            }
        }

        Some(Step::Continue)
    }

    fn read_object(&mut self, depth: usize) -> Option<Step<'a>> {
        let tag = self.read_byte()?;
        match tag {
            TAG_NIL => return Some(Step::Continue),
            TAG_NEW => {}
            _ => {
                self.reference(tag)?;
                return Some(Step::Continue);
            }
        }

        self.objects += 1;
        self.read_class()?;

        loop {
            match self.peek_byte()? {
                TAG_END_OF_OBJECT => {
                    self.pos += 1;
                    return Some(Step::Continue);
                }
                _ => {
                    let encoding = self.read_shared_string()??;
                    if let Step::Found(bytes) = self.read_values(encoding, depth)? {
                        return Some(Step::Found(bytes));
                    }
                }
            }
        }
    }

    /// Read a class and its superclass chain.
    fn read_class(&mut self) -> Option<()> {
        loop {
            let tag = self.read_byte()?;
            match tag {
                TAG_NIL => return Some(()),
                TAG_NEW => {
                    self.read_shared_string()??;
                    self.read_integer()?;
                    self.objects += 1;
                }
                _ => {
                    self.reference(tag)?;
                    return Some(());
                }
            }
        }
    }

    /// `Some(None)` is an explicit nil string.
    fn read_shared_string(&mut self) -> Option<Option<&'a [u8]>> {
        let tag = self.read_byte()?;
        match tag {
            TAG_NIL => Some(None),
            TAG_NEW => {
                let len = self.read_length()?;
                let string = self.take(len)?;
                self.strings.push(string);
                Some(Some(string))
            }
            _ => {
                let index = self.reference(tag)?;
                self.strings.get(index).copied().map(Some)
            }
        }
    }

    /// Decode a reference whose first byte is `tag`.
    fn reference(&mut self, tag: u8) -> Option<usize> {
        let value = self.integer_after_tag(tag)?;
        usize::try_from(value - FIRST_REFERENCE).ok()
    }

    fn read_integer(&mut self) -> Option<i64> {
        let tag = self.read_byte()?;
        self.integer_after_tag(tag)
    }

    fn integer_after_tag(&mut self, tag: u8) -> Option<i64> {
        match tag {
            TAG_INTEGER_2 => {
                let bytes: [u8; 2] = self.take(2)?.try_into().ok()?;
                Some(if self.little_endian {
                    i16::from_le_bytes(bytes)
                } else {
                    i16::from_be_bytes(bytes)
                } as i64)
            }
            TAG_INTEGER_4 => {
                let bytes: [u8; 4] = self.take(4)?.try_into().ok()?;
                Some(if self.little_endian {
                    i32::from_le_bytes(bytes)
                } else {
                    i32::from_be_bytes(bytes)
                } as i64)
            }
            TAG_FLOATING_POINT | TAG_NEW | TAG_NIL | TAG_END_OF_OBJECT => None,
            literal => Some(literal as i8 as i64),
        }
    }

    /// Lengths are unsigned; single-byte lengths are never tags.
    fn read_length(&mut self) -> Option<usize> {
        let tag = self.read_byte()?;
        match tag {
            TAG_INTEGER_2 | TAG_INTEGER_4 => usize::try_from(self.integer_after_tag(tag)?).ok(),
            TAG_FLOATING_POINT | TAG_NEW | TAG_NIL | TAG_END_OF_OBJECT => None,
            literal => Some(literal as usize),
        }
    }

    fn read_float(&mut self, width: usize) -> Option<()> {
        if self.peek_byte()? == TAG_FLOATING_POINT {
            self.pos += 1;
            self.take(width)?;
        } else {
            self.read_integer()?;
        }
        Some(())
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Some(byte)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }
}

// ============================================================================
// FALLBACK
// ============================================================================

/// Locate the NSString payload directly when the structural walk fails
/// (truncated blobs, unexpected value types before the text).
fn scan_nsstring(blob: &[u8]) -> Option<&[u8]> {
    let class_idx = find_subsequence(blob, b"NSString")?;
    let after_class = class_idx + b"NSString".len();
    let window_end = (after_class + 20).min(blob.len());
    let plus_offset = blob[after_class..window_end].iter().position(|&b| b == b'+')?;

    let mut pos = after_class + plus_offset + 1;
    let len = match *blob.get(pos)? {
        TAG_INTEGER_2 => {
            let bytes: [u8; 2] = blob.get(pos + 1..pos + 3)?.try_into().ok()?;
            pos += 3;
            u16::from_le_bytes(bytes) as usize
        }
        TAG_INTEGER_4 => {
            let bytes: [u8; 4] = blob.get(pos + 1..pos + 5)?.try_into().ok()?;
            pos += 5;
            u32::from_le_bytes(bytes) as usize
        }
        literal => {
            pos += 1;
            literal as usize
        }
    };

    // Truncated blobs keep whatever text is present
    let end = (pos + len).min(blob.len());
    blob.get(pos..end)
}

/// Find a subsequence in a byte slice.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
