use deepimport_core::version::{version_string, SCHEMA_VERSION, VERSION};
use miette::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionJson {
    ok: bool,
    schema_version: u32,
    version: &'static str,
}

pub fn run(json: bool) -> Result<()> {
    if json {
        super::print_json(&VersionJson {
            ok: true,
            schema_version: SCHEMA_VERSION,
            version: VERSION,
        });
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
