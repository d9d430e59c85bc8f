use std::env;
use std::error::Error;
use std::path::PathBuf;

use analyzer_lib::run_wrapper;
use analyzer_lib::run_wrapper::AnalyzerPolicy;

fn main() -> Result<(), Box<dyn Error>> {
    let mut policy = AnalyzerPolicy::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--trace" => {
                let path = args
                    .next()
                    .ok_or("You should specify a path after --trace")?;
                policy.trace = PathBuf::from(path);
            }
            "--hex" => {
                let path = args
                    .next()
                    .ok_or("You should specify a path after --hex")?;
                policy.hex = PathBuf::from(path);
            }
            "--out" => {
                let path = args
                    .next()
                    .ok_or("You should specify a path after --out")?;
                policy.out = Some(PathBuf::from(path));
            }
            "--show" => policy.show = true,
            _ => return Err(format!("Unknown parameter: {}", arg).into()),
        }
    }

    let report = run_wrapper::run(&policy)?;

    if policy.show {
        print!("{}", report);
    }

    if let Some(out) = &policy.out {
        run_wrapper::write_report(&report, out)?;
        println!("Report written to {}", out.display());
    }

    Ok(())
}
