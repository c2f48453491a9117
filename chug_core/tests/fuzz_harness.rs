use chug_core::{map, morph};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

#[test]
fn randomized_roundtrip() {
    let mut rng = deterministic_rng(b"chug-fuzz-roundtrip");
    for _ in 0..256 {
        let cipher_len = rng.gen_range(1..512usize);
        let plain_len = rng.gen_range(0..=cipher_len);
        let ciphertext: Vec<u8> = (0..cipher_len).map(|_| rng.gen()).collect();
        let plaintext: Vec<u8> = (0..plain_len).map(|_| rng.gen()).collect();
        // Even a header-only key must point inside the ciphertext.
        let max_start = (cipher_len - plain_len).min(cipher_len - 1);
        let start_index = rng.gen_range(0..=max_start);
        let key = map(&plaintext, &ciphertext, start_index).expect("map");
        assert_eq!(key.as_bytes().len(), plain_len + 4);
        let recovered = morph(&ciphertext, &key).expect("morph");
        assert_eq!(recovered, plaintext, "start_index={start_index}");
    }
}

#[test]
fn randomized_corrupted_start_index_rejected() {
    let mut rng = deterministic_rng(b"chug-fuzz-corrupt");
    for _ in 0..256 {
        let cipher_len = rng.gen_range(1..128usize);
        let ciphertext: Vec<u8> = (0..cipher_len).map(|_| rng.gen()).collect();
        let plaintext: Vec<u8> = (0..rng.gen_range(0..=cipher_len)).map(|_| rng.gen()).collect();
        let key = map(&plaintext, &ciphertext, 0).expect("map");
        let mut raw = key.into_bytes();
        // Force the embedded start index past the ciphertext end.
        raw[..4].copy_from_slice(&(cipher_len as i32).to_le_bytes());
        let key = chug_core::Key::from_bytes(raw).expect("header intact");
        assert!(morph(&ciphertext, &key).is_err());
    }
}

#[test]
#[ignore]
fn fuzz_smoke_os_rng() {
    // Smoke harness over non-deterministic input, run on demand.
    for _ in 0..1024 {
        let ciphertext: Vec<u8> = (0..64).map(|_| rand::random::<u8>()).collect();
        let plaintext: Vec<u8> = (0..32).map(|_| rand::random::<u8>()).collect();
        let key = map(&plaintext, &ciphertext, 16).expect("map");
        let recovered = morph(&ciphertext, &key).expect("morph");
        assert_eq!(recovered, plaintext);
    }
}

fn deterministic_rng(label: &[u8]) -> ChaCha20Rng {
    let hash = blake3::hash(label);
    ChaCha20Rng::from_seed(*hash.as_bytes())
}
