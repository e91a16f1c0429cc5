//! Build script rendering the `dapbridge` man page from the CLI definition.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = manifest_dir.join("target").join("generated-man");
    fs::create_dir_all(&out_dir)?;

    let cmd = cli::Cli::command();
    let page = format!("{}.1", cmd.get_name());
    let mut buf = Vec::new();
    Man::new(cmd).render(&mut buf)?;
    fs::write(out_dir.join(page), buf)?;

    Ok(())
}
