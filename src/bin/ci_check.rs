use clap::Parser;
use nws_forecast_summarizer::ci::{self, DEFAULT_WORKFLOW_PATH};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ci-check")]
#[command(about = "Checks the pull-request workflow against the pipeline rules")]
struct Args {
    /// Workflow file to check
    #[arg(long, default_value = DEFAULT_WORKFLOW_PATH)]
    workflow: PathBuf,

    /// Print violations as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let violations = match ci::check_workflow_file(&args.workflow) {
        Ok(violations) => violations,
        Err(e) => {
            eprintln!("❌ {}: {}", args.workflow.display(), e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&violations) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(2);
            }
        }
    } else if violations.is_empty() {
        println!("✅ {} passes all checks", args.workflow.display());
    } else {
        for v in &violations {
            match &v.job {
                Some(job) => println!("❌ [{}] {} ({})", v.code, v.message, job),
                None => println!("❌ [{}] {}", v.code, v.message),
            }
            println!("   💡 {}", v.hint);
        }
    }

    if !violations.is_empty() {
        std::process::exit(1);
    }
}
