//! Entrypoint for CLI
use std::{
    env, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    thread,
};

use anyhow::{bail, Context};
use jack::{
    constants::{IMPL_VERSION, OUTPUT_FILE_EXTENSION, SOURCE_FILE_EXTENSION},
    prelude::*,
};
use log::{error, info};

static USAGE: &str = r#"
usage: jackc [OPTIONS] PATH

PATH is a single .jack file, or a directory whose .jack files
are compiled together as one program.

options:
    --out DIR   Write .vm files into DIR instead of next to the sources
    --jobs N    Compile at most N files at a time

examples:
    jackc Main.jack
    jackc --jobs 4 --out build/ Pong/
"#;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    let args = match parse_args(env::args().skip(1)) {
        Some(args) => args,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    let sources = collect_sources(&args.path)?;
    if let Some(dir) = &args.out {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let jobs = args
        .jobs
        .or_else(|| thread::available_parallelism().ok())
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let compiler = Compiler::new(CompilerConf::default());

    let failures = compile_all(&sources, jobs, &compiler, args.out.as_deref());
    if !failures.is_empty() {
        report(&failures);
        std::process::exit(1)
    }

    info!("compiled {} file(s)", sources.len());
    Ok(())
}

struct Args {
    path: PathBuf,
    out: Option<PathBuf>,
    jobs: Option<NonZeroUsize>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let mut path = None;
    let mut out = None;
    let mut jobs = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(args.next()?)),
            "--jobs" => jobs = Some(args.next()?.parse().ok()?),
            flag if flag.starts_with("--") => return None,
            _ if path.is_some() => return None,
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    Some(Args {
        path: path?,
        out,
        jobs,
    })
}

fn print_usage() {
    println!("Jack compiler v{IMPL_VERSION}");
    println!("{USAGE}");
}

fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_FILE_EXTENSION)
}

/// Source files named by the path argument, sorted by name.
fn collect_sources(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        if !is_source_file(path) {
            bail!("{} is not a .{SOURCE_FILE_EXTENSION} file", path.display());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = vec![];
    for entry in fs::read_dir(path).with_context(|| format!("reading {}", path.display()))? {
        let entry_path = entry?.path();
        if entry_path.is_file() && is_source_file(&entry_path) {
            sources.push(entry_path);
        }
    }
    sources.sort();

    if sources.is_empty() {
        bail!("no .{SOURCE_FILE_EXTENSION} files in {}", path.display());
    }
    Ok(sources)
}

fn output_path(source: &Path, out: Option<&Path>) -> PathBuf {
    let file = source.with_extension(OUTPUT_FILE_EXTENSION);
    match (out, file.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => file,
    }
}

/// Compile every source on a pool of worker threads.
///
/// Returns the failures, in source order.
fn compile_all(
    sources: &[PathBuf],
    jobs: usize,
    compiler: &Compiler,
    out: Option<&Path>,
) -> Vec<(PathBuf, anyhow::Error)> {
    let next = AtomicUsize::new(0);
    let failures = Mutex::new(vec![]);

    thread::scope(|scope| {
        for _ in 0..jobs.min(sources.len()) {
            let compiler = compiler.clone();
            scope.spawn(|| {
                let compiler = compiler;
                while let Some(source) = sources.get(next.fetch_add(1, Ordering::Relaxed)) {
                    if let Err(err) = compile_file(source, &compiler, out) {
                        let mut failures = failures.lock().unwrap_or_else(|poison| poison.into_inner());
                        failures.push((source.clone(), err));
                    }
                }
            });
        }
    });

    let mut failures = failures.into_inner().unwrap_or_else(|poison| poison.into_inner());
    failures.sort_by(|a, b| a.0.cmp(&b.0));
    failures
}

fn compile_file(source: &Path, compiler: &Compiler, out: Option<&Path>) -> anyhow::Result<()> {
    let source_code =
        fs::read_to_string(source).with_context(|| format!("reading {}", source.display()))?;

    let code = compiler.compile(&source_code)?;

    let target = output_path(source, out);
    fs::write(&target, render(&code)).with_context(|| format!("writing {}", target.display()))?;

    info!("{} -> {}", source.display(), target.display());
    Ok(())
}

fn report(failures: &[(PathBuf, anyhow::Error)]) {
    error!("compilation failed");
    eprintln!("{} error(s) reported:", failures.len());
    for (path, err) in failures {
        eprintln!("\t[{}]: {:#}", path.display(), err);
    }
}
