//! Generate `include/tumblr_ffi.h` from the `extern "C"` surface.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let include_dir = Path::new(&crate_dir).join("include");
    let header = include_dir.join("tumblr_ffi.h");

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TUMBLR_FFI_H")
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("cargo:warning=cbindgen skipped header generation: {e}");
            return;
        }
    };

    let mut contents = Vec::new();
    bindings.write(&mut contents);
    if let Err(e) = fs::create_dir_all(&include_dir).and_then(|()| fs::write(&header, contents)) {
        println!("cargo:warning=could not write {}: {e}", header.display());
    }
}
