use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate_to, Shell};
use std::env;
use std::io::Error;

include!("src/cli.rs");

// Shell completions end up in OUT_DIR, packagers pick them up from there.
fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let Some(out_dir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    let mut command = Cli::command();
    let name = command.get_name().to_string();
    for shell in Shell::value_variants() {
        generate_to(*shell, &mut command, &name, &out_dir)?;
    }

    Ok(())
}
