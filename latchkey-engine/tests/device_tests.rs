use latchkey_engine::fingerprint;

#[test]
fn fingerprint_is_stable() {
    let a = fingerprint();
    let b = fingerprint();
    assert_eq!(a, b);
}

#[test]
fn fingerprint_is_nonempty() {
    assert!(!fingerprint().as_str().is_empty());
}
