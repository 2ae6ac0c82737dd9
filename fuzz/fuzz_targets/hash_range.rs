#![no_main]
use libfuzzer_sys::{
    arbitrary::{Arbitrary, Unstructured},
    fuzz_target,
};
use static_hash_index::HashAlgorithm;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    if let Ok(key) = <String as Arbitrary>::arbitrary(&mut unstructured) {
        let modulus = <usize as Arbitrary>::arbitrary(&mut unstructured).unwrap_or(1);

        for algorithm in HashAlgorithm::ALL {
            match algorithm.hash(&key, modulus) {
                Ok(h) => assert!(h < modulus),
                Err(_) => assert_eq!(0, modulus),
            }
        }
    }
});
