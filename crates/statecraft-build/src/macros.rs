//! Build-script helper that regenerates the Move sources of a package.
//!
//! `build!("statecraft.toml")` writes into the crate directory;
//! `build!("statecraft.toml", "../contracts/arena")` names the package root.
#[macro_export]
macro_rules! build {
    ($config:expr) => {
        $crate::build!($config, ".")
    };
    ($config:expr, $root:expr) => {{
        let config_path = ::std::path::Path::new($config);

        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", config_path.display());

        //
        // MOVE SOURCES
        //

        if let Err(err) = ::statecraft::build::build(config_path, $root) {
            panic!("statecraft codegen failed: {err}");
        }
    }};
}
