use encore::features;

#[test]
fn catalog_is_always_enabled() {
    assert!(features::is_enabled("catalog"));
    assert!(!features::is_enabled("payments"));
}

#[cfg(feature = "server")]
#[test]
fn init_registers_the_catalog_slice() {
    let slices = encore::init().expect("slices initialize");
    assert_eq!(slices.iter().map(|s| s.name).collect::<Vec<_>>(), ["catalog"]);
    assert!(slices[0].downcast_ref::<features::catalog::Catalog>().is_some());
    assert_eq!(encore::migrations().len(), 1);
}
