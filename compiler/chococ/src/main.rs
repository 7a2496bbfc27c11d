//! Choco Compiler CLI

use std::path::{Path, PathBuf};

use chococ::{build_file, builtin_signatures, init_tracing, run_file, DriverError};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "build" => build(&args[2..]),
        "run" => run(&args[2..]),
        "builtins" => {
            for line in builtin_signatures() {
                println!("{line}");
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(DriverError::Usage(format!("unknown command `{other}`"))),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        if matches!(err, DriverError::Usage(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}

fn build(args: &[String]) -> Result<(), DriverError> {
    let mut input = None;
    let mut output: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-o" {
            let path = args
                .get(i + 1)
                .ok_or_else(|| DriverError::Usage("`-o` needs a path".to_owned()))?;
            output = Some(PathBuf::from(path));
            i += 2;
        } else if input.is_none() && !args[i].starts_with('-') {
            input = Some(PathBuf::from(&args[i]));
            i += 1;
        } else {
            return Err(DriverError::Usage(format!("unexpected argument `{}`", args[i])));
        }
    }
    let input = input.ok_or_else(|| DriverError::Usage("missing program path".to_owned()))?;

    let wat = build_file(&input)?;
    match output {
        Some(path) => write_output(&path, &wat),
        None => {
            print!("{wat}");
            Ok(())
        }
    }
}

fn write_output(path: &Path, text: &str) -> Result<(), DriverError> {
    std::fs::write(path, text).map_err(|source| DriverError::Io {
        path: path.to_owned(),
        source,
    })
}

fn run(args: &[String]) -> Result<(), DriverError> {
    let [path] = args else {
        return Err(DriverError::Usage("expected exactly one program path".to_owned()));
    };
    let report = run_file(Path::new(path))?;
    for line in &report.output {
        println!("{line}");
    }
    println!("=> {}", report.value);
    Ok(())
}

fn print_usage() {
    println!("Choco Compiler");
    println!();
    println!("Usage: chococ <command> [options]");
    println!();
    println!("Commands:");
    println!("  build <program.json> [-o out.wat]  Compile an IR program to WAT");
    println!("  run <program.json>                 Compile and execute an IR program");
    println!("  builtins                           List builtin signatures");
    println!("  help                               Show this message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=choco_wasm=debug) for compiler tracing.");
}
