use jpeg_batch::batch::{partition, RunTotals};
use jpeg_batch::config::BatchConfig;
use jpeg_batch::scanner::is_jpeg_file;
use jpeg_batch::worker::{CompressionResult, FailureKind};
use proptest::prelude::*;
use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["jpg", "JPG", "jpeg", "JPEG", "Jpg", "png", "gif", "txt", "jpe"];

proptest! {
    #[test]
    fn partition_yields_ceil_batches(len in 0usize..500, batch_size in 1usize..64) {
        let items: Vec<usize> = (0..len).collect();
        let chunks: Vec<&[usize]> = partition(&items, batch_size).collect();

        prop_assert_eq!(chunks.len(), len.div_ceil(batch_size));
        prop_assert!(chunks.iter().all(|chunk| !chunk.is_empty() && chunk.len() <= batch_size));
        // Every chunk but the last is full.
        if let Some((_, full)) = chunks.split_last() {
            prop_assert!(full.iter().all(|chunk| chunk.len() == batch_size));
        }
    }

    #[test]
    fn partition_reproduces_input_exactly_once(len in 0usize..500, batch_size in 1usize..64) {
        let items: Vec<usize> = (0..len).collect();
        let rejoined: Vec<usize> = partition(&items, batch_size).flatten().copied().collect();
        prop_assert_eq!(rejoined, items);
    }

    #[test]
    fn batch_config_count_matches_partition(len in 0usize..500, batch_size in 1usize..64) {
        let config = BatchConfig::new(Some(batch_size), Some(1), None).unwrap();
        let items = vec![(); len];
        prop_assert_eq!(config.batch_count(len), partition(&items, batch_size).count());
    }

    #[test]
    fn batch_config_quality_range(quality in 0u8..=255u8) {
        let result = BatchConfig::new(None, None, Some(quality));
        prop_assert_eq!(result.is_ok(), (1..=100).contains(&quality));
    }

    #[test]
    fn batch_config_rejects_only_zero(batch_size in 0usize..1000, workers in 0usize..64) {
        let result = BatchConfig::new(Some(batch_size), Some(workers), None);
        prop_assert_eq!(result.is_ok(), batch_size > 0 && workers > 0);
    }

    #[test]
    fn totals_are_order_independent(
        entries in prop::collection::vec((0u64..1_000_000, 0u64..1_000_000, any::<bool>()), 0..100)
    ) {
        let results: Vec<CompressionResult> = entries
            .iter()
            .enumerate()
            .map(|(i, &(before, after, ok))| {
                let path = PathBuf::from(format!("{}.jpg", i));
                if ok {
                    CompressionResult::success(path, before, after)
                } else {
                    CompressionResult::failure(path, before, FailureKind::Decode, "bad".to_string())
                }
            })
            .collect();

        let mut forward = RunTotals::default();
        results.iter().for_each(|r| { forward.record(r); });
        let mut backward = RunTotals::default();
        results.iter().rev().for_each(|r| { backward.record(r); });

        let expected_before: u64 = entries.iter().filter(|e| e.2).map(|e| e.0).sum();
        let expected_after: u64 = entries.iter().filter(|e| e.2).map(|e| e.1).sum();
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(forward.total_before_bytes, expected_before);
        prop_assert_eq!(forward.total_after_bytes, expected_after);
    }

    #[test]
    fn is_jpeg_file_is_case_insensitive(
        stem in "[a-zA-Z0-9_-]{1,12}",
        extension in prop::sample::select(EXTENSIONS)
    ) {
        let filename = format!("{}.{}", stem, extension);
        let expected = matches!(extension.to_lowercase().as_str(), "jpg" | "jpeg");
        prop_assert_eq!(is_jpeg_file(Path::new(&filename)), expected);
    }
}
