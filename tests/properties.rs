use chunk_tail::{CheckpointPolicy, EngineConfig, LineReader, TransformEngine};
use proptest::prelude::*;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

const TRAILER_PREFIX: &str = "\nTotal lines in input: ";

fn engine(interval: usize) -> TransformEngine {
    TransformEngine::new(EngineConfig {
        checkpoint: CheckpointPolicy::new(interval).expect("valid interval"),
        ..EngineConfig::default()
    })
}

fn source(lines: &[String]) -> LineReader<Cursor<String>> {
    let mut data = String::from("header\n");
    for line in lines {
        data.push_str(line);
        data.push('\n');
    }
    LineReader::new(Cursor::new(data))
}

/// Output lines without the header and without the summary trailer.
fn body(content: &str) -> Vec<String> {
    let content = match content.find(TRAILER_PREFIX) {
        Some(pos) => &content[..pos],
        None => content,
    };
    content
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

fn data_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,6}", 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tail_keeps_last_lines_in_order(lines in data_lines(), n in 0usize..50, interval in 1usize..8) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = dir.path().join("out.txt");
        engine(interval).tail(source(&lines), &output, n).expect("tail");

        let content = fs::read_to_string(&output).expect("Failed to read output");
        prop_assert!(content.starts_with("header\n"));
        let kept = n.min(lines.len());
        prop_assert_eq!(body(&content), lines[lines.len() - kept..].to_vec());
        let expected_trailer = format!("{}{}\n", TRAILER_PREFIX, lines.len() + 1);
        prop_assert!(content.ends_with(&expected_trailer));
    }

    #[test]
    fn drop_last_keeps_leading_lines(lines in data_lines(), n in 0usize..50, interval in 1usize..8) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = dir.path().join("out.txt");
        engine(interval).drop_last(source(&lines), &output, n).expect("drop-last");

        let content = fs::read_to_string(&output).expect("Failed to read output");
        let kept = lines.len().saturating_sub(n);
        prop_assert_eq!(body(&content), lines[..kept].to_vec());
    }

    #[test]
    fn interval_and_delete_interval_partition_the_data(
        lines in data_lines(),
        start in 0usize..45,
        len in 0usize..45,
    ) {
        let end = start + len;
        let dir = TempDir::new().expect("Failed to create temp dir");
        let kept_path = dir.path().join("kept.txt");
        let deleted_path = dir.path().join("deleted.txt");

        let engine = engine(3);
        engine.interval(source(&lines), &kept_path, start, end).expect("interval");
        engine.delete_interval(source(&lines), &deleted_path, start, end).expect("delete-interval");

        let kept = body(&fs::read_to_string(&kept_path).expect("Failed to read output"));
        let deleted = body(&fs::read_to_string(&deleted_path).expect("Failed to read output"));
        prop_assert_eq!(kept.len() + deleted.len(), lines.len());

        // Data line i (0-based) sits on file line i + 2.
        let mut kept_iter = kept.iter();
        let mut deleted_iter = deleted.iter();
        for (i, line) in lines.iter().enumerate() {
            let expected = if (start..=end).contains(&(i + 2)) {
                kept_iter.next()
            } else {
                deleted_iter.next()
            };
            prop_assert_eq!(expected, Some(line));
        }
    }
}
