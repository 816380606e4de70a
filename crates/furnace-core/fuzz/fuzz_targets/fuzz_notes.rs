#![no_main]
use furnace_core::catalog::{RecipeCatalog, parse_recipe_tags};
use furnace_core::id::ItemCategory;
use furnace_core::registry::{RegistryBuilder, extract_meta};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|note: &str| {
    let _ = extract_meta(note);
    let _ = parse_recipe_tags(note);

    let mut b = RegistryBuilder::new();
    b.register(ItemCategory::Item, 1, "Fuzzed", note);
    b.register(ItemCategory::Item, 5, "Target", "");
    if let Ok(registry) = b.build() {
        let _ = RecipeCatalog::build(&registry);
    }
});
