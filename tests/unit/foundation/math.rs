use super::*;

#[test]
fn fnv_is_stable_across_split_writes() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"strata");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"str");
    b.write_bytes(b"ata");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(255, 0), 0);
    assert_eq!(mul_div255(128, 255), 128);
    assert_eq!(mul_div255(255, 128), 128);
}

#[test]
fn negative_zero_shares_key_bits_with_zero() {
    assert_eq!(f64_key_bits(-0.0), f64_key_bits(0.0));
    assert_ne!(f64_key_bits(1.0), f64_key_bits(0.0));
}
