use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Only bare-metal targets link against memory.x
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::copy("memory.x", out_dir.join("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out_dir.display());
    }
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
