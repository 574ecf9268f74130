//! CLI entry point for the Picostack-16 assembler binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use assembler::assemble;
use assembler::errors::AssembleError;
use processor_core::{
    describe_update, Fault, MemoryKind, MemoryUpdate, Processor, StepOutcome, REG_PC,
};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: picostack-asm <command> [options]

Commands:
  build <input> [-o <output>]  Assemble source to a binary image
  list  <input>                Disassemble a binary image to stdout
  run   <input> [-s <steps>]   Load a binary image and run it

Options:
  -o, --output <file>  Output file path (default: input stem + .bin)
  -s, --steps <count>  Step limit for run (default: 1000000)
  -h, --help           Show this help message

Examples:
  picostack-asm build program.asm
  picostack-asm build program.asm -o program.bin
  picostack-asm list program.bin
  picostack-asm run program.bin
";

const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Build(BuildArgs),
    List(ListArgs),
    Run(RunArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct BuildArgs {
    input: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
struct ListArgs {
    input: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    steps: u64,
}

#[derive(Debug)]
enum ParsedArgs {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParsedArgs, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParsedArgs::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "build" => parse_build_args(args)
            .map(Command::Build)
            .map(ParsedArgs::Command),
        "list" => parse_input_only(args)
            .map(|input| Command::List(ListArgs { input }))
            .map(ParsedArgs::Command),
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParsedArgs::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_build_args(mut args: impl Iterator<Item = OsString>) -> Result<BuildArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(BuildArgs { input, output })
}

fn parse_input_only(args: impl Iterator<Item = OsString>) -> Result<PathBuf, String> {
    let mut input: Option<PathBuf> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    input.ok_or_else(|| "missing input path".to_string())
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut steps = DEFAULT_STEP_LIMIT;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "-s" || arg == "--steps" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -s".to_string())?;
            steps = value
                .to_string_lossy()
                .parse()
                .map_err(|_| format!("invalid step count: {}", value.to_string_lossy()))?;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(RunArgs { input, steps })
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{stem}.bin"))
}

fn report_assemble_error(input: &Path, e: &AssembleError) {
    eprintln!("{}:{}: error: {}", input.display(), e.line, e.kind);
}

fn run_build(args: BuildArgs) -> Result<(), i32> {
    let source = match fs::read_to_string(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", args.input.display());
            return Err(1);
        }
    };

    let words = match assemble(&source) {
        Ok(w) => w,
        Err(e) => {
            report_assemble_error(&args.input, &e);
            return Err(1);
        }
    };

    let binary: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    if let Err(e) = fs::write(&output_path, &binary) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    println!(
        "Assembled {} ({} words) -> {}",
        args.input.display(),
        words.len(),
        output_path.display()
    );

    Ok(())
}

fn read_image(input: &Path) -> Result<Vec<u16>, i32> {
    let bytes = match fs::read(input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", input.display());
            return Err(1);
        }
    };

    if bytes.len() % 2 != 0 {
        eprintln!("error: {} is not a word image (odd length)", input.display());
        return Err(1);
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

#[allow(clippy::cast_possible_truncation)]
fn run_list(args: &ListArgs) -> Result<(), i32> {
    let words = read_image(&args.input)?;

    for (address, word) in words.iter().enumerate() {
        println!(
            "{}",
            describe_update(&MemoryUpdate {
                kind: MemoryKind::Mem,
                address: address as u16,
                value: *word,
            })
        );
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn run_program(args: &RunArgs) -> Result<(), i32> {
    let words = read_image(&args.input)?;

    let mut cpu = Processor::new();
    for (address, word) in words.iter().enumerate() {
        cpu.write_word(address as u16, *word);
    }

    for _ in 0..args.steps {
        match cpu.step() {
            Ok(StepOutcome::Executed) => {}
            Ok(StepOutcome::DebugBreak) => {
                println!(
                    "{}",
                    describe_update(&MemoryUpdate {
                        kind: MemoryKind::Reg,
                        address: REG_PC,
                        value: cpu.pc(),
                    })
                );
            }
            Ok(StepOutcome::Halted) => {
                print_final_state(&cpu);
                return Ok(());
            }
            Err(fault) => {
                return report_fault(&cpu, &fault);
            }
        }
    }

    eprintln!("error: step limit reached ({})", args.steps);
    Err(1)
}

fn print_final_state(cpu: &Processor) {
    println!("Halted at PC {:03X}", cpu.pc());
    for (slot, value) in cpu.stack().slots()[..cpu.stack().depth()]
        .iter()
        .enumerate()
    {
        println!("  R{slot:02} = {value:04X}");
    }
}

fn report_fault(cpu: &Processor, fault: &Fault) -> Result<(), i32> {
    eprintln!("fault at PC {:03X}: {fault}", cpu.pc());
    Err(1)
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParsedArgs::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParsedArgs::Command(Command::Build(args))) => match run_build(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParsedArgs::Command(Command::List(args))) => match run_list(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParsedArgs::Command(Command::Run(args))) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
                1
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
                1
            }
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    #[test]
    fn parses_build_command() {
        let result = parse_build_args(
            [
                OsString::from("program.asm"),
                OsString::from("-o"),
                OsString::from("out.bin"),
            ]
            .into_iter(),
        )
        .expect("valid build args should parse");

        assert_eq!(
            result,
            BuildArgs {
                input: PathBuf::from("program.asm"),
                output: Some(PathBuf::from("out.bin")),
            }
        );
    }

    #[test]
    fn parses_list_command() {
        let result = parse_args([OsString::from("list"), OsString::from("image.bin")].into_iter())
            .expect("valid list args should parse");
        assert!(matches!(
            result,
            ParsedArgs::Command(Command::List(ListArgs { .. }))
        ));
    }

    #[test]
    fn parses_run_command_with_step_limit() {
        let result = parse_run_args(
            [
                OsString::from("image.bin"),
                OsString::from("-s"),
                OsString::from("500"),
            ]
            .into_iter(),
        )
        .expect("valid run args should parse");

        assert_eq!(
            result,
            RunArgs {
                input: PathBuf::from("image.bin"),
                steps: 500,
            }
        );
    }

    #[test]
    fn run_defaults_step_limit() {
        let result = parse_run_args([OsString::from("image.bin")].into_iter())
            .expect("run without -s should parse");
        assert_eq!(result.steps, DEFAULT_STEP_LIMIT);
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args([OsString::from("--help")].into_iter())
            .expect("help should parse without error");
        assert!(matches!(result, ParsedArgs::Help));
    }

    #[test]
    fn rejects_unknown_command() {
        let error = parse_args([OsString::from("unknown")].into_iter())
            .expect_err("unknown command should fail parse");
        assert!(error.contains("unknown command"));
    }

    #[test]
    fn rejects_invalid_step_count() {
        let error = parse_run_args(
            [
                OsString::from("image.bin"),
                OsString::from("-s"),
                OsString::from("many"),
            ]
            .into_iter(),
        )
        .expect_err("non-numeric step count should fail");
        assert!(error.contains("invalid step count"));
    }

    #[test]
    fn default_output_path_simple() {
        let input = PathBuf::from("program.asm");
        assert_eq!(default_output_path(&input), PathBuf::from("program.bin"));
    }

    #[test]
    fn default_output_path_with_dir() {
        let input = PathBuf::from("src/program.asm");
        assert_eq!(
            default_output_path(&input),
            PathBuf::from("src/program.bin")
        );
    }

    #[test]
    fn build_missing_input_fails() {
        let error = parse_build_args(std::iter::empty()).expect_err("missing input should fail");
        assert!(error.contains("missing input"));
    }

    #[test]
    fn list_rejects_options() {
        let error = parse_input_only([OsString::from("--verbose")].into_iter())
            .expect_err("list should reject options");
        assert!(error.contains("unknown option"));
    }
}
