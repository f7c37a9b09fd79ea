pub mod config;
pub mod errors;

pub use config::{AppConfig, CheckpointConfig};
pub use errors::{ChunkTailError, Result};

/// Strips a trailing `\n` or `\r\n` from a line read with `read_line`.
pub fn trim_line_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_line_terminator() {
        let mut unix = "a,b\n".to_string();
        trim_line_terminator(&mut unix);
        assert_eq!(unix, "a,b");

        let mut dos = "a,b\r\n".to_string();
        trim_line_terminator(&mut dos);
        assert_eq!(dos, "a,b");

        let mut bare = "a,b".to_string();
        trim_line_terminator(&mut bare);
        assert_eq!(bare, "a,b");
    }
}
