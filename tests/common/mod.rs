#![allow(dead_code)]
use cinebrew::mach::{Builtins, Event, Runtime};

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    let mut prev_running = false;
    loop {
        let event = runtime.execute(cycles);
        match &event {
            Event::Stopped => {
                break;
            }
            Event::Error(error) => {
                s.push_str(&format!("{}\n", error));
            }
            Event::Running => {
                if prev_running {
                    s.push_str(&format!("\n{} Execution cycles exceeded.\n", cycles));
                    break;
                }
            }
            Event::Print(ps) => {
                s.push_str(ps);
            }
        }
        prev_running = event == Event::Running;
    }
    s
}

/// Compile with seeded built-ins and run. Compile errors come back one
/// per line in place of program output.
pub fn run_source(source: &str) -> String {
    run_with(source, Builtins::new().with_seed(1))
}

pub fn run_with(source: &str, builtins: Builtins) -> String {
    let bytecode = match cinebrew::compile(source, &builtins) {
        Ok(bytecode) => bytecode,
        Err(errors) => return errors.iter().map(|e| format!("{}\n", e)).collect(),
    };
    let mut runtime = Runtime::new(builtins);
    runtime.load(&bytecode);
    exec(&mut runtime)
}

pub fn run_bytecode(program: &[&str]) -> String {
    let mut runtime = Runtime::default();
    runtime.load(program);
    exec(&mut runtime)
}

pub fn bytecode(source: &str) -> Vec<String> {
    let builtins = Builtins::new();
    match cinebrew::compile(source, &builtins) {
        Ok(bytecode) => bytecode,
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}
