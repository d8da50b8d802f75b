use std::path::Path;

use crate::{load_dump, OutputFormat};

pub(crate) fn cmd_list(file: &Path, output: OutputFormat, quiet: bool) {
    let dump = load_dump(file, output, quiet);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let classes: Vec<serde_json::Value> = dump
                .trees()
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "class_id": t.class_id,
                        "class_name": t.class_name,
                        "valid": t.is_valid(),
                        "base_classes": t.base_classes,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&classes).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            for tree in dump.trees() {
                let status = if tree.is_valid() { "" } else { " (invalid)" };
                if tree.base_classes.is_empty() {
                    println!("{:>6}  {}{}", tree.class_id, tree.class_name, status);
                } else {
                    println!(
                        "{:>6}  {} <- {}{}",
                        tree.class_id,
                        tree.class_name,
                        tree.base_classes.join(" <- "),
                        status
                    );
                }
            }
        }
    }
}
