use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Skeleton of the CLI from src/main.rs, enough for completion scripts.
// Build scripts can't access src/ modules, so the commands are mirrored
// here by hand.
fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("kbx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting kbx binary documents")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("from").long("from").value_hint(ValueHint::Other))
                .arg(Arg::new("to").long("to").value_hint(ValueHint::Other))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("encoding")
                        .long("encoding")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("compress")
                        .long("compress")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("info").arg(
            Arg::new("input")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        ));

    generate_to(Bash, &mut cmd, "kbx", &outdir)?;
    generate_to(Zsh, &mut cmd, "kbx", &outdir)?;
    generate_to(Fish, &mut cmd, "kbx", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
