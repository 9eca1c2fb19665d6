use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lc3_assembler::assemble::assemble;

#[derive(Parser)]
#[clap(version, author, about = "Two-pass assembler for the LC-3 architecture")]
struct Opts {
    /// Input .asm source file
    input: PathBuf,
    /// Output object file (defaults to the input path with a .obj extension)
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("Failed to read input file: {}", opts.input.display()))?;

    let result = assemble(&source);

    if !result.errors.is_empty() {
        let file = opts.input.display().to_string();
        let lines: Vec<&str> = source.lines().collect();
        for err in &result.errors {
            let source_line = lines.get(err.span.line.saturating_sub(1)).copied().unwrap_or("");
            eprintln!("{}", err.render(&file, source_line));
        }
        std::process::exit(1);
    }

    let output_path = opts
        .output
        .unwrap_or_else(|| opts.input.with_extension("obj"));
    let file = fs::File::create(&output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    result
        .image
        .write_to(file)
        .with_context(|| format!("Failed to write object image: {}", output_path.display()))?;

    println!("Assembly successful.");
    Ok(())
}
