//! `xrconf show-running` — dump device state per YANG model.
//!
//! Scans `.yang` files for their module name, namespace, and top-level
//! containers, then fetches the device's data for each container. Useful
//! for capturing a device's full declarative state as apply-able documents.

use std::path::{Path, PathBuf};
use std::time::Instant;

use xrconf_core::Node;

use crate::cli::{GlobalOpts, ShowRunningArgs};
use crate::error::CliError;

/// One top-level container found in a YANG model file.
#[derive(Debug, PartialEq, Eq)]
pub struct Container {
    pub module: String,
    pub namespace: String,
    pub container: String,
    /// `true` when the container holds operational data (`config false`).
    pub oper: bool,
}

pub async fn handle(
    node: &mut Node,
    args: ShowRunningArgs,
    environment: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let files = yang_files(&args.path)?;
    if args.oper {
        println!("Searching for operational data...");
    } else {
        println!("Searching for configuration data...");
    }

    let started = Instant::now();
    let mut containers = 0usize;
    let mut errors = 0usize;

    for file in &files {
        if global.verbose > 0 {
            println!("[ Processing file {} ]", file.display());
        }
        let text = std::fs::read_to_string(file)?;
        for container in scan_yang_model(&text) {
            if container.oper != args.oper {
                continue;
            }
            containers += 1;
            let target =
                node.yang_target(&container.module, &container.namespace, &container.container);

            let result = if container.oper {
                node.get_yang_oper(&target).await
            } else {
                node.get_yang(&target).await
            };
            match result {
                Ok(Some(data)) if !data.trim().is_empty() => {
                    if global.verbose > 0 {
                        println!("[   Processing container {} ]", container.container);
                    }
                    println!("{data}\n");
                }
                Ok(_) => {
                    if global.verbose > 0 {
                        println!(
                            "[   Processing container {}: no data returned ]",
                            container.container
                        );
                    }
                }
                Err(e) => {
                    errors += 1;
                    let err = CliError::from_core(e, environment);
                    // Keep scanning: one unsupported model should not end
                    // the survey, but a dead session should.
                    if matches!(err, CliError::ConnectionFailed { .. }) {
                        return Err(err);
                    }
                    eprintln!("!!Error on '{target}': {err}\n");
                }
            }
        }
    }

    println!("---------------------------------------------");
    println!("Files Processed: {}", files.len());
    println!("Containers Processed: {containers}");
    println!("Errors: {errors}");
    println!("Time: {:.2} seconds", started.elapsed().as_secs_f64());
    Ok(())
}

fn yang_files(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(CliError::Validation {
            field: "path".into(),
            reason: format!("directory or file not found: {}", path.display()),
        });
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "yang"))
        .collect();
    files.sort();
    Ok(files)
}

/// Extract the module header and top-level containers from YANG source.
///
/// This is a line-oriented scan, not a YANG parser: module files as shipped
/// on the device keep `module`, `namespace`, and top-level `container`
/// statements at fixed indentation, and a `config false;` in the statements
/// directly under a container marks it operational.
pub fn scan_yang_model(text: &str) -> Vec<Container> {
    let mut module: Option<&str> = None;
    let mut namespace: Option<&str> = None;
    let mut containers: Vec<Container> = Vec::new();

    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if module.is_none() {
            module = capture(line, "module ", " {");
            continue;
        }
        if namespace.is_none() {
            namespace = capture(line, "  namespace \"", "\"");
            continue;
        }
        let Some(name) = capture(line, "  container ", " {") else {
            continue;
        };
        // Scan the statements directly under the container, up to the
        // first blank line.
        let mut oper = false;
        while let Some(&body) = lines.peek() {
            if body.trim().is_empty() {
                break;
            }
            if body.starts_with("    config false;") {
                oper = true;
                break;
            }
            lines.next();
        }
        let (Some(module), Some(namespace)) = (module, namespace) else {
            continue;
        };
        if containers.iter().any(|c| c.container == name) {
            continue;
        }
        containers.push(Container {
            module: module.to_owned(),
            namespace: namespace.to_owned(),
            container: name.to_owned(),
            oper,
        });
    }
    containers
}

/// The text between `prefix` (at line start) and the first `suffix` after it.
fn capture<'a>(line: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    let end = rest.find(suffix)?;
    Some(&rest[..end])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MODEL: &str = "\
module Cisco-IOS-XR-infra-rsi-cfg {
  namespace \"http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg\";
  prefix infra-rsi-cfg;

  container vrfs {
    description \"VRF configuration\";
    list vrf {
      key \"vrf-name\";
    }
  }

  container global-af {
    config false;
    description \"Operational state\";
  }
}
";

    #[test]
    fn scans_module_namespace_and_containers() {
        let containers = scan_yang_model(MODEL);
        assert_eq!(containers.len(), 2);
        assert_eq!(
            containers[0],
            Container {
                module: "Cisco-IOS-XR-infra-rsi-cfg".into(),
                namespace: "http://cisco.com/ns/yang/Cisco-IOS-XR-infra-rsi-cfg".into(),
                container: "vrfs".into(),
                oper: false,
            }
        );
        assert!(containers[1].oper);
        assert_eq!(containers[1].container, "global-af");
    }

    #[test]
    fn duplicate_containers_are_skipped() {
        let model = "module m {\n  namespace \"ns\";\n  container a {\n  }\n\n  container a {\n  }\n}\n";
        let containers = scan_yang_model(model);
        assert_eq!(containers.len(), 1);
    }

    #[test]
    fn nested_containers_are_not_top_level() {
        let model = "module m {\n  namespace \"ns\";\n  container outer {\n    container inner {\n    }\n  }\n}\n";
        let containers = scan_yang_model(model);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].container, "outer");
    }

    #[test]
    fn file_without_namespace_yields_nothing() {
        let containers = scan_yang_model("module m {\n  container a {\n  }\n}\n");
        assert!(containers.is_empty());
    }
}
