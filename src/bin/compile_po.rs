// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `msgfmt` for a single PO file
//!
//! This program compiles a GNU Gettext `xx.po` file into the binary
//! `xx.mo` file read by `gettext` at runtime. Fuzzy and untranslated
//! messages are left out of the output.
//!
//! The output file defaults to the input file with its `.po` suffix
//! replaced by `.mo`. Use `-o` to write somewhere else.

use anyhow::{bail, Context};
use clap::Parser;
use po_compiler::{encode, parse, Catalog, MoFile, ParseStats};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Parser)]
#[command(name = "compile_po", version, about = "Compile a PO file into a binary MO file.")]
struct Args {
    /// The PO file to compile.
    #[arg(value_name = "INFILE")]
    input: PathBuf,
    /// Where to write the MO file [default: INFILE with a .mo suffix].
    #[arg(short = 'o', long = "output", value_name = "OUTFILE")]
    output: Option<PathBuf>,
    /// Print counts of compiled and skipped messages on stderr.
    #[arg(long)]
    statistics: bool,
    /// Read the MO file back and verify that it holds the compiled messages.
    #[arg(long)]
    check: bool,
    /// Log more details. Repeat for even more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Returns the output path used when none is given: a trailing `.po`
/// is replaced by `.mo`, otherwise `.mo` is appended.
fn default_output(input: &Path) -> PathBuf {
    match input.to_str().and_then(|path| path.strip_suffix(".po")) {
        Some(stem) => PathBuf::from(format!("{stem}.mo")),
        None => {
            let mut output = input.as_os_str().to_owned();
            output.push(".mo");
            PathBuf::from(output)
        }
    }
}

/// Compile the PO file at `input` and write the MO file to `output`.
///
/// Nothing is written if `input` cannot be read.
fn compile_file(input: &Path, output: &Path, check: bool) -> anyhow::Result<ParseStats> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Could not read {}", input.display()))?;
    let (catalog, stats) = parse(&source);
    let mo = encode(&catalog).with_context(|| format!("Could not compile {}", input.display()))?;
    fs::write(output, &mo).with_context(|| format!("Could not write {}", output.display()))?;
    tracing::info!(
        "Wrote {} messages ({} bytes) to {}",
        catalog.len(),
        mo.len(),
        output.display()
    );

    if check {
        check_output(output, &catalog)?;
    }
    Ok(stats)
}

/// Verify that the MO file at `path` holds exactly the messages of
/// `catalog`.
fn check_output(path: &Path, catalog: &Catalog) -> anyhow::Result<()> {
    let data = fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
    let mo = MoFile::parse(&data).with_context(|| format!("Could not parse {}", path.display()))?;
    let expected = catalog
        .iter()
        .map(|(msgid, msgstr)| (msgid.to_vec(), msgstr.to_vec()))
        .collect::<Vec<_>>();
    if mo.messages != expected {
        bail!(
            "{} holds {} messages, expected {}",
            path.display(),
            mo.messages.len(),
            expected.len()
        );
    }
    tracing::debug!("Checked {}", path.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Usage errors exit with 1 rather than clap's default of 2.
            // `--help` and `--version` also end up here and exit with 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            process::exit(code);
        }
    };
    init_tracing(args.verbose);

    let output = match &args.output {
        Some(output) => output.clone(),
        None => default_output(&args.input),
    };
    let stats = compile_file(&args.input, &output, args.check)?;
    if args.statistics {
        eprintln!("{stats}");
    }
    println!("Compiled {} to {}", args.input.display(), output.display());

    Ok(())
}
