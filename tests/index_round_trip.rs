use static_hash_index::{lookup_indexed, Config, DuplicateKeys, HashAlgorithm, Index};
use test_log::test;

fn distinct_words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("word-{i:05}")).collect()
}

#[test]
fn index_round_trip_distinct() -> static_hash_index::Result<()> {
    let words = distinct_words(1_000);

    for algorithm in HashAlgorithm::ALL {
        let index = Config::new(algorithm)
            .page_size(25)
            .bucket_capacity(150)
            .build(words.clone())?;

        assert_eq!(8, index.buckets().len());
        assert_eq!(40, index.pages().len());

        // NOTE: No key is dropped
        let stored = index
            .buckets()
            .iter()
            .flat_map(|bucket| bucket.nodes())
            .map(|node| node.len())
            .sum::<usize>();
        assert_eq!(1_000, stored);

        for (idx, word) in words.iter().enumerate() {
            assert_eq!(Some((idx / 25) as u64), index.lookup(word));
        }
    }

    Ok(())
}

#[test]
fn index_round_trip_random() -> static_hash_index::Result<()> {
    let words = (0..5_000).map(|_| nanoid::nanoid!()).collect::<Vec<_>>();

    for algorithm in HashAlgorithm::ALL {
        let index = Config::new(algorithm)
            .page_size(50)
            .bucket_capacity(10)
            .build(words.clone())?;

        for (word, page) in index.pages().entries() {
            assert_eq!(Some(page), index.lookup(word));
            assert_eq!(
                Some(page),
                lookup_indexed(word, index.buckets(), index.algorithm())
            );
        }

        for _ in 0..1_000 {
            // NOTE: nanoid uses 21 characters, so a shorter key can never be indexed
            let missing = nanoid::nanoid!(10);
            assert_eq!(None, index.lookup(&missing));
        }
    }

    Ok(())
}

#[test]
fn index_round_trip_last_write_wins() -> static_hash_index::Result<()> {
    // A tiny capacity forces every word into an overflow chain before it repeats
    let mut words = distinct_words(200);
    words.extend(distinct_words(200));

    for algorithm in HashAlgorithm::ALL {
        let index = Config::new(algorithm)
            .page_size(10)
            .bucket_capacity(1)
            .build(words.clone())?;

        for (idx, word) in distinct_words(200).iter().enumerate() {
            assert_eq!(Some(((idx + 200) / 10) as u64), index.lookup(word));
        }

        assert_eq!(200, index.metrics().resident_keys);
        assert_eq!(200, index.metrics().overwritten_keys());
    }

    Ok(())
}

#[test]
fn index_collect_keeps_all_pages() -> static_hash_index::Result<()> {
    let words = ["apple", "pear", "apple", "plum", "apple", "pear"]
        .into_iter()
        .map(String::from)
        .collect();

    let index = Config::new(HashAlgorithm::Fnv1a)
        .page_size(2)
        .bucket_capacity(1)
        .duplicate_keys(DuplicateKeys::Collect)
        .build(words)?;

    assert_eq!(Some(&[0, 1, 2][..]), index.lookup_all("apple"));
    assert_eq!(Some(&[0, 2][..]), index.lookup_all("pear"));
    assert_eq!(Some(&[1][..]), index.lookup_all("plum"));
    assert_eq!(Some(2), index.lookup("apple"));

    Ok(())
}

#[test]
fn index_mismatched_algorithm_is_not_detected() -> static_hash_index::Result<()> {
    let index: Index = Config::new(HashAlgorithm::Fnv1a)
        .bucket_capacity(1)
        .build(distinct_words(100))?;

    // Querying with another algorithm is a caller error and simply yields wrong
    // or missing results, it never panics
    let hits = distinct_words(100)
        .iter()
        .filter(|word| lookup_indexed(word, index.buckets(), HashAlgorithm::Djb2).is_some())
        .count();

    assert!(hits < 100);

    Ok(())
}
