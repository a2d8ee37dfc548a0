/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    use humansize::{FormatSize, BINARY};
    bytes.format_size(BINARY)
}

/// Parse octal permission bits, with or without a leading `0o`.
pub fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        Ok(_) => Err(format!("mode {} is out of range", s)),
        Err(_) => Err(format!("{} is not an octal mode", s)),
    }
}
