//! Main copy command

use crate::copier::{CopyEvent, CopyStats, TreeCopier};
use crate::resolver::{platform_resolver, AliasResolver};
use crate::types::{DealiasError, TargetKind};
use crate::ui::Reporter;
use crate::Config;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Run the copy with the platform's alias resolver
pub fn run(config: Config) -> Result<CopyStats, DealiasError> {
    let resolver = platform_resolver();
    run_with_resolver(&config, resolver.as_ref())
}

/// Run the copy with a caller-supplied resolver
///
/// Setup checks run first and fail before anything is written. Per-entry
/// failures are warned about as they happen, summarized at the end, and
/// turned into [`DealiasError::Incomplete`]; whatever was copied stays.
pub fn run_with_resolver(
    config: &Config,
    resolver: &dyn AliasResolver,
) -> Result<CopyStats, DealiasError> {
    config.validate()?;

    let reporter = Reporter::new(config.verbose);
    let on_event = |event: &CopyEvent<'_>| report_event(&reporter, config.verbose, event);

    let result = TreeCopier::new(resolver)
        .on_event(&on_event)
        .copy_tree(&config.source, &config.destination);

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            reporter.abandon();
            return Err(e);
        }
    };

    reporter.finish(&report.stats);
    if !report.is_complete() {
        reporter.report_errors(&format_error_summary(&report.failures));
        return Err(DealiasError::Incomplete {
            failed: report.failures.len(),
        });
    }

    Ok(report.stats)
}

fn report_event(reporter: &Reporter, verbose: bool, event: &CopyEvent<'_>) {
    if let Some(message) = warning_for(event) {
        reporter.warn(&message);
    }
    if let CopyEvent::DirectoryCreated { dest, .. } | CopyEvent::FileCopied { dest, .. } = event {
        reporter.set_current(dest);
    }

    if verbose {
        if let Some(line) = describe_event(event) {
            reporter.info(&line);
        }
    }
}

/// Stderr warning for an event, without the `warning:` prefix
fn warning_for(event: &CopyEvent<'_>) -> Option<String> {
    match event {
        CopyEvent::AliasUnresolved { alias } => {
            Some(format!("failed to resolve alias: {}", alias.display()))
        }
        CopyEvent::NameCollision { src, dest } => Some(format!(
            "{} was already written in this run and is replaced by {}",
            dest.display(),
            src.display()
        )),
        CopyEvent::EntryFailed { path, error } => {
            Some(format!("could not copy {}: {}", path.display(), error))
        }
        CopyEvent::AliasResolved { .. }
        | CopyEvent::DirectoryCreated { .. }
        | CopyEvent::FileCopied { .. } => None,
    }
}

/// Verbose stdout line for an event, if it has one
fn describe_event(event: &CopyEvent<'_>) -> Option<String> {
    match event {
        CopyEvent::AliasResolved { alias, target } => {
            let kind = match target.kind {
                TargetKind::File => "file",
                TargetKind::Directory => "folder",
            };
            Some(format!(
                "alias: {} -> {} ({kind})",
                alias.display(),
                target.path.display()
            ))
        }
        CopyEvent::DirectoryCreated { src, dest } => Some(format!(
            "mkdir: {} -> {}",
            src.display(),
            dest.display()
        )),
        CopyEvent::FileCopied {
            action, src, dest, ..
        } => Some(format!(
            "copy [{action}]: {} -> {}",
            src.display(),
            dest.display()
        )),
        CopyEvent::AliasUnresolved { .. }
        | CopyEvent::NameCollision { .. }
        | CopyEvent::EntryFailed { .. } => None,
    }
}

fn format_error_summary(failures: &[(PathBuf, DealiasError)]) -> String {
    let mut groups: BTreeMap<&'static str, Vec<&(PathBuf, DealiasError)>> = BTreeMap::new();
    for failure in failures {
        groups.entry(failure.1.kind_label()).or_default().push(failure);
    }

    let mut lines = Vec::new();
    lines.push("Error summary:".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for (path, error) in items.iter().take(3) {
            lines.push(format!("    - {}", error));
            lines.push(format!("      Path: {}", path.display()));
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}
