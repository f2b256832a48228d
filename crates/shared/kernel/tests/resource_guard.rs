use encore_kernel::safe_nanoid;
use encore_kernel::security::resource::{ResourceGuard, ResourceGuardError};

#[test]
fn resource_guard_validates_and_strips_prefix() {
    assert_eq!(ResourceGuard::verify("accessory:123", "accessory").unwrap(), "123");
    assert_eq!(ResourceGuard::verify("123", "accessory").unwrap(), "123");
    assert!(matches!(
        ResourceGuard::verify("insurance_option:123", "accessory"),
        Err(ResourceGuardError::Validation { .. })
    ));
}

#[test]
fn generated_ids_always_pass_the_guard() {
    for _ in 0..100 {
        let id = safe_nanoid!();
        assert_eq!(ResourceGuard::verify(&id, "product").unwrap(), id);
    }
}
