use std::{fs, path::PathBuf, process::exit};

use anyhow::{anyhow, Context};
use clap::Parser;
use logo_lang::Error;

/// Runs a Logo program and writes its drawing as SVG.
#[derive(Parser)]
#[command(name = "logo2svg")]
struct Args {
    /// Logo source file.
    input: PathBuf,
    /// Where to write the SVG document.
    output: PathBuf,
    /// Print the parsed program in canonical form before running it.
    #[arg(long)]
    dump_ast: bool,
}

fn build_errors(errs: Vec<Error>) -> anyhow::Error {
    let lines: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
    anyhow!("{} build error(s):\n{}", errs.len(), lines.join("\n"))
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let program = logo_lang::compile(&source)
        .map_err(build_errors)
        .with_context(|| format!("failed to compile {}", args.input.display()))?;
    if args.dump_ast {
        println!("{program}");
    }

    let ctx = logo_lang::execute(&program)
        .with_context(|| format!("failed to run {}", args.input.display()))?;
    for line in ctx.transcript() {
        println!("{line}");
    }

    let svg = logo_renderer::render(ctx.into_canvas());
    fs::write(&args.output, svg)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

pub fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
