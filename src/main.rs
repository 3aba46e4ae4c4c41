#![allow(non_snake_case)]
use EqTaskGen::Examples::generator_examples::generator_examples;
use EqTaskGen::Utils::logger::init_logger;
use EqTaskGen::generator::config::TaskConfig;
use EqTaskGen::generator::errors::TaskGenError;
use EqTaskGen::generator::pipeline::run_task;
use std::env;
use std::fs;
use std::process::ExitCode;

const USAGE: &str = "usage: EqTaskGen <task-file> | EqTaskGen --example <n>";

fn run_file(path: &str) -> Result<(), TaskGenError> {
    let config = TaskConfig::from_file(path)?;
    init_logger(&config.logging.level, config.logging.log_file.as_deref()).map_err(TaskGenError::Config)?;
    let done = run_task(&config)?;
    println!("{}", done.table());
    if let Some(template_file) = &config.output.template_file {
        let template = fs::read_to_string(template_file)?;
        println!("{}", done.render(&template));
    }
    done.save(&config.output)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [flag, n] if flag == "--example" => match n.parse::<usize>() {
            Ok(example) => {
                if let Err(e) = init_logger("info", None) {
                    eprintln!("{}", e);
                }
                generator_examples(example);
                ExitCode::SUCCESS
            }
            Err(_) => {
                eprintln!("{}", USAGE);
                ExitCode::FAILURE
            }
        },
        [path] if !path.starts_with("--") => match run_file(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}
