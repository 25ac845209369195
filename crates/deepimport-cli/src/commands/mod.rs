pub mod convert;
pub mod discover;
pub mod scan;
pub mod version;

use deepimport_core::version::SCHEMA_VERSION;
use deepimport_core::Error;
use serde::Serialize;

/// Error object of every `--json` result.
#[derive(Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

impl From<&Error> for ErrorJson {
    fn from(e: &Error) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Serialize)]
struct FailureJson {
    ok: bool,
    schema_version: u32,
    error: ErrorJson,
}

/// Print one JSON document to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("error: failed to encode output: {e}"),
    }
}

/// Report a command-level error and exit with status 1.
pub fn fail(e: &Error, json: bool) -> ! {
    if json {
        print_json(&FailureJson {
            ok: false,
            schema_version: SCHEMA_VERSION,
            error: e.into(),
        });
    } else {
        eprintln!("error: {}: {e}", e.code());
    }
    std::process::exit(1);
}
