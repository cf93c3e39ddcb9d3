//! Command-line front end for the glassbox pipeline.
//!
//! Reads untrusted HTML from a file argument (or stdin), runs it through
//! audit → sanitize → mount → detect, and prints the violation report, the
//! sanitized markup, and the editable-element catalog. Insecure input still
//! exits 0 — the sanitizer already defanged it; only a failed mount or a
//! read error is a hard failure.

use engine::{DetectionOutcome, Engine};
use sanitize::Severity;
use std::io::Read;
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const ORIGIN: &str = "glassbox-cli";

fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn main() -> ExitCode {
    let raw = match read_input() {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("glassbox: failed to read input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (mut engine, _from_engine) = Engine::new(ORIGIN);
    let session_id = match engine.push_content(&raw) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("glassbox: {e}");
            return ExitCode::FAILURE;
        }
    };
    let detection = engine.complete_detection(session_id);

    let session = engine.session().expect("session exists after push");
    if session.is_secure {
        println!("audit: clean");
    } else {
        println!("audit: {} violation(s)", session.violations.len());
        for v in &session.violations {
            let tag = match v.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("  [{tag}] {}", v.message);
        }
    }

    println!("\nsanitized:\n{}", session.sanitized_content);

    match detection {
        DetectionOutcome::Ready(count) => {
            println!("\neditable elements: {count}");
            for d in session.catalog().entries() {
                println!("  {:>3}. {:?} {} {:?}", d.order, d.role, d.id, d.current_text);
            }
        }
        DetectionOutcome::NotReady => println!("\neditable elements: none detected"),
        DetectionOutcome::Superseded(_) => unreachable!("single push"),
    }

    for fault in engine.take_faults() {
        eprintln!("glassbox: note: {fault}");
    }
    ExitCode::SUCCESS
}
