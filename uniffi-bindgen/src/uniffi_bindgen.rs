//! Generates the Swift and Kotlin bindings for the `cutie` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
