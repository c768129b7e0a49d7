use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs only needs clap + clap_complete, both listed as
// build-dependencies, so it can be compiled into the build script
// without the rest of the crate.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    // Walk the command tree breadth-first, emitting one page per visible
    // command, named `drguard.1`, `drguard-activate.1`, and so on.
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone())
            .render(&mut page)
            .unwrap_or_else(|e| panic!("failed to render man page for `{name}`: {e}"));
        let path = man_dir.join(format!("{name}.1"));
        fs::write(&path, page)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));

        for sub in cmd.get_subcommands() {
            if !sub.is_hide_set() {
                pending.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
            }
        }
    }
}
