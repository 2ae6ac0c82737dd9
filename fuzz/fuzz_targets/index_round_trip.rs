#![no_main]
use libfuzzer_sys::{
    arbitrary::{Arbitrary, Unstructured},
    fuzz_target,
};
use static_hash_index::{Config, HashAlgorithm};
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(words) = <Vec<String> as Arbitrary>::arbitrary(&mut unstructured) else {
        return;
    };
    let page_size = <u8 as Arbitrary>::arbitrary(&mut unstructured).unwrap_or(1).max(1);
    let capacity = <u8 as Arbitrary>::arbitrary(&mut unstructured).unwrap_or(1).max(1);
    let algorithm = *unstructured
        .choose(&HashAlgorithm::ALL)
        .unwrap_or(&HashAlgorithm::Fnv1a);

    let index = Config::new(algorithm)
        .page_size(page_size.into())
        .bucket_capacity(capacity.into())
        .build(words)
        .unwrap();

    let mut expected = HashMap::new();
    for (word, page) in index.pages().entries() {
        expected.insert(word.to_string(), page);
    }

    for (word, page) in &expected {
        assert_eq!(Some(*page), index.lookup(word));
        assert!(index.scan(word).is_found());
    }

    assert_eq!(expected.len(), index.metrics().resident_keys);
    assert_eq!(
        index.buckets().collisions(),
        index.metrics().total_collisions
    );
});
