//! Text payload decoding.

/// Byte-order mark that flags a UTF-16LE payload.
pub const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Decodes a STRING/FILENAME payload into owned UTF-8.
///
/// Payloads starting with `FF FE` are UTF-16LE and end at the first NUL code
/// unit; a dangling odd byte is ignored. Anything else is narrow text ending at
/// the first NUL byte. Invalid sequences become U+FFFD. An empty payload has no
/// text at all.
pub fn decode_text(raw: &[u8]) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    match raw.strip_prefix(&UTF16LE_BOM) {
        Some(wide) => Some(decode_utf16le(wide)),
        None => Some(decode_narrow(raw)),
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0);
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn decode_narrow(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
