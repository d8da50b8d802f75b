use std::path::Path;
use std::process;

use treedump_core::{Dump, TreeRecord};

use crate::{load_dump, report_error, OutputFormat};

/// Look a class up by numeric ID first, then by name.
fn find_class<'a>(dump: &'a Dump, class: &str) -> Option<&'a TreeRecord> {
    class
        .parse::<u32>()
        .ok()
        .and_then(|id| dump.find_by_id(id))
        .or_else(|| dump.find_by_name(class))
}

pub(crate) fn cmd_tree(file: &Path, class: &str, output: OutputFormat, quiet: bool) {
    let dump = load_dump(file, output, quiet);

    let record = match find_class(&dump, class) {
        Some(r) => r,
        None => {
            report_error(
                &format!("class '{}' not found in {}", class, file.display()),
                output,
                quiet,
            );
            process::exit(1);
        }
    };
    let root = match &record.root {
        Some(root) => root,
        None => {
            report_error(
                &format!(
                    "class '{}' has no type tree (export failed)",
                    record.class_name
                ),
                output,
                quiet,
            );
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => match serde_json::to_value(record) {
            Ok(json) => println!("{:#}", json),
            Err(e) => {
                report_error(&format!("serialization: {}", e), output, quiet);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            println!("{} (classID {})", record.class_name, record.class_id);
            for (depth, node) in root.walk() {
                let size = if node.byte_size < 0 {
                    "var".to_owned()
                } else {
                    node.byte_size.to_string()
                };
                println!(
                    "{}{} {} [{}{}]",
                    "  ".repeat(depth + 1),
                    node.type_name,
                    node.name,
                    size,
                    if node.is_array { ", array" } else { "" }
                );
            }
        }
    }
}
