use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ormlet_codegen::Generator;

#[derive(Parser, Debug)]
#[command(name = "ormlet")]
#[command(about = "Ormlet CLI - mapping code generation from schema modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate mapping source files from a schema module
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Path to the schema module
    #[arg(long)]
    schema: PathBuf,

    /// Output directory for the generated source units
    #[arg(long)]
    out: PathBuf,

    /// Print cargo rerun-if-changed directives for build-script use
    #[arg(long)]
    rerun_directives: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => generate(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    // Generation errors carry spans, which are not Send; report them as text.
    let set = Generator::new()
        .generate_file(&args.schema)
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    for (entity, err) in &set.failures {
        eprintln!("error: {entity}: {err}");
    }

    let written = set.write_to(&args.out)?;
    for path in &written {
        println!("generated {}", path.display());
    }

    if args.rerun_directives {
        set.emit_rerun_directives();
    }

    if set.failures.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} entity(ies) failed to resolve", set.failures.len())
    }
}
