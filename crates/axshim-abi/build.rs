fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let map = if std::env::var_os("CARGO_FEATURE_EXTERNAL_RUNTIME").is_some() {
        "libc_shim_only.map"
    } else {
        "libc.map"
    };
    let version_script = format!("{manifest_dir}/version_scripts/{map}");
    if std::path::Path::new(&version_script).exists() {
        println!("cargo:rustc-cdylib-link-arg=-Wl,--version-script={version_script}");
        // Debug builds leave the exports mangled (cfg_attr(not(debug_assertions))),
        // so the script names symbols that are not defined there.
        println!("cargo:rustc-cdylib-link-arg=-Wl,--undefined-version");
    }
    println!("cargo:rerun-if-changed=version_scripts/libc.map");
    println!("cargo:rerun-if-changed=version_scripts/libc_shim_only.map");
}
