use std::fmt::Write;

/// Render raw bytes as space separated hex, the way report descriptors are dumped
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3);
    for byte in data {
        let _ = write!(out, " {byte:02x}");
    }
    out
}

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod tests;
