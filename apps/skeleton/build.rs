//! Build script for the skeleton CLI.
//!
//! `rust-embed` compiles `template/` into the binary but only tracks the files
//! that existed at the last build; watching the directory also picks up
//! added and removed entries.

fn main() {
    println!("cargo:rerun-if-changed=template");
}
