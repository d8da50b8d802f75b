use std::path::Path;

use crate::{load_dump, OutputFormat};

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let dump = load_dump(file, output, quiet);

    if quiet {
        return;
    }
    let header = dump.header();
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": true,
                "version": header.version.to_string(),
                "type_name": header.type_name,
                "trees": dump.trees().len(),
                "written": dump.valid_count(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!("valid");
            println!("  Version: {}", header.version);
            println!("  Type: {}", header.type_name);
            println!(
                "  Classes: {} ({} written, {} failed)",
                dump.trees().len(),
                dump.valid_count(),
                dump.trees().len() - dump.valid_count()
            );
        }
    }
}
