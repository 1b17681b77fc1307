use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use ttm_compiler::config::runtime::RuntimeConfig;
use ttm_compiler::{logging, pipeline};

/// Command-line options; the first positional argument is the source file
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: Option<String>,
    lex_output: Option<PathBuf>,
    id_output: Option<PathBuf>,
    json_output: Option<PathBuf>,
    log_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("ttmc");

    let options = match parse_options(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <input.ttm> [options]", program);
            eprintln!("       {} --help", program);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program);
        return Ok(());
    }

    let Some(input) = options.input.as_deref() else {
        eprintln!("Usage: {} <input.ttm> [options]", program);
        eprintln!("       {} --help", program);
        std::process::exit(1);
    };

    let config = match options.config_file.as_deref() {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    logging::config::init_runtime_preferences(config.logging.clone())?;

    // Initialize global logging system
    logging::init_global_logging_with_log_file(options.log_file.as_deref())?;

    // Validate pipeline configuration
    pipeline::validate_pipeline()?;

    compile(input, &config, &options)
}

fn print_help(program_name: &str) {
    println!("TTM Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", pipeline::get_pipeline_info().summary());
    println!();
    println!("USAGE:");
    println!("    {} <input.ttm> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --lex <path>       Write the lexeme table, one row per source line");
    println!("    --id <path>        Write the symbol table");
    println!("    --json <path>      Write both tables as JSON");
    println!("    --log <path>       Mirror every log event into a file");
    println!("    --config <path>    Load runtime preferences from a TOML file");
    println!("    --help             Show this help message");
    println!();
    println!("EXIT STATUS:");
    println!("    0 on success, 1 on the first diagnosed error");
    println!();
    println!("{}", pipeline::get_pipeline_info().report());
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let target = match arg.as_str() {
            "--help" => {
                options.help = true;
                continue;
            }
            "--lex" => &mut options.lex_output,
            "--id" => &mut options.id_output,
            "--json" => &mut options.json_output,
            "--log" => &mut options.log_file,
            "--config" => &mut options.config_file,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{}'", flag));
            }
            positional => {
                if options.input.is_some() {
                    return Err(format!("Unexpected argument '{}'", positional));
                }
                options.input = Some(positional.to_string());
                continue;
            }
        };

        let value = iter
            .next()
            .ok_or_else(|| format!("{} requires a path", arg))?;
        *target = Some(PathBuf::from(value));
    }

    Ok(options)
}

fn compile(
    input: &str,
    config: &RuntimeConfig,
    options: &CliOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Compiling: {}", input);

    match pipeline::compile_file_with_config(input, config) {
        Ok(result) => {
            write_outputs(&result, options)?;

            println!(
                "\nSUCCESS: {} lexemes, {} symbols, {} statements converted",
                result.lexemes.len(),
                result.symbols.len(),
                result.conversion_metrics.statements
            );
            logging::print_cargo_style_summary();
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            eprintln!("  {}", error.diagnostic());

            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn write_outputs(
    result: &pipeline::PipelineResult,
    options: &CliOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &options.lex_output {
        write_file(path, &result.lexemes.render_by_line())?;
    }
    if let Some(path) = &options.id_output {
        write_file(path, &result.symbols.render())?;
    }
    if let Some(path) = &options.json_output {
        write_file(path, &result.output().to_json()?)?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, content)
        .map_err(|e| format!("Cannot write '{}': {}", path.display(), e))?;
    println!("  wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options =
            parse_options(&args(&["prog.ttm", "--lex", "out.lex", "--json", "out.json"])).unwrap();

        assert_eq!(options.input.as_deref(), Some("prog.ttm"));
        assert_eq!(options.lex_output, Some(PathBuf::from("out.lex")));
        assert_eq!(options.json_output, Some(PathBuf::from("out.json")));
        assert_eq!(options.id_output, None);
        assert!(!options.help);
    }

    #[test]
    fn test_help_flag() {
        assert!(parse_options(&args(&["--help"])).unwrap().help);
    }

    #[test]
    fn test_missing_path_value() {
        assert!(parse_options(&args(&["prog.ttm", "--id"])).is_err());
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_options(&args(&["prog.ttm", "--fast"])).is_err());
    }

    #[test]
    fn test_second_positional_rejected() {
        assert!(parse_options(&args(&["a.ttm", "b.ttm"])).is_err());
    }
}
