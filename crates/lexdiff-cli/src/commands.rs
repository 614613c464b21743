use std::io::Read;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use lexdiff_diff::{
    aggregate, apply_name_status, parse_name_status, parse_unified_diff, AggregateReport, Entry,
    EntryStatus,
};
use lexdiff_store::{
    collect_entries, read_optional_text, CachedSource, DirectorySource, TextCache,
};

use crate::cli::*;
use crate::config::RenderConfig;
use crate::render::render_report;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = RenderConfig::load(cli.config.as_deref())?.with_overrides(&cli.render);

    let report = match cli.command {
        Command::Diff(args) => cmd_diff(args, &config)?,
        Command::Compare(args) => cmd_compare(args, &config)?,
        Command::Patch(args) => cmd_patch(args, &config)?,
    };

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text if report.is_empty() => {
            println!("{}", "No changes.".dimmed())
        }
        OutputFormat::Text => print!("{}", render_report(&report, &config)),
    }
    Ok(())
}

fn cmd_diff(args: DiffArgs, config: &RenderConfig) -> anyhow::Result<AggregateReport> {
    let old = read_optional_text(&args.old)?;
    let new = read_optional_text(&args.new)?;
    if old.is_none() && new.is_none() {
        anyhow::bail!(
            "neither {} nor {} exists",
            args.old.display(),
            args.new.display()
        );
    }

    let identifier = args.new.display().to_string();
    Ok(aggregate([Entry::inferred(identifier, old, new)], config.entry_cap()))
}

fn cmd_compare(args: CompareArgs, config: &RenderConfig) -> anyhow::Result<AggregateReport> {
    let old = DirectorySource::open(&args.old_dir)
        .with_context(|| format!("opening {}", args.old_dir.display()))?;
    let new = DirectorySource::open(&args.new_dir)
        .with_context(|| format!("opening {}", args.new_dir.display()))?;

    let cache = TextCache::new();
    let entries = collect_entries(
        &CachedSource::new(&old, &cache),
        &CachedSource::new(&new, &cache),
    )?;
    let entries = entries
        .into_iter()
        .filter(|entry| args.include_unchanged || entry.status != EntryStatus::Unchanged);

    Ok(aggregate(entries, config.entry_cap()))
}

fn cmd_patch(args: PatchArgs, config: &RenderConfig) -> anyhow::Result<AggregateReport> {
    let text = match &args.file {
        Some(path) => read_text(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading patch from stdin")?;
            buf
        }
    };

    let mut entries = parse_unified_diff(&text)?;
    if let Some(path) = &args.name_status {
        let statuses = parse_name_status(&read_text(path)?);
        apply_name_status(&mut entries, &statuses);
    }

    Ok(aggregate(entries, config.entry_cap()))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    read_optional_text(path)?.with_context(|| format!("{} does not exist", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn diff_of_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.md");
        let new = dir.path().join("new.md");
        fs::write(&old, "a\nb").unwrap();
        fs::write(&new, "a\nc").unwrap();

        let report = cmd_diff(DiffArgs { old, new }, &RenderConfig::default()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.entries()[0].status, EntryStatus::Modified);
        assert_eq!((report.total_additions(), report.total_deletions()), (1, 1));
    }

    #[test]
    fn diff_against_missing_file_is_a_full_insertion() {
        let dir = tempfile::tempdir().unwrap();
        let new = dir.path().join("new.md");
        fs::write(&new, "x\ny").unwrap();

        let args = DiffArgs { old: dir.path().join("absent.md"), new };
        let report = cmd_diff(args, &RenderConfig::default()).unwrap();
        assert_eq!(report.entries()[0].status, EntryStatus::Added);
        assert_eq!(report.total_additions(), 2);
    }

    #[test]
    fn diff_with_both_files_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = DiffArgs { old: dir.path().join("a"), new: dir.path().join("b") };
        assert!(cmd_diff(args, &RenderConfig::default()).is_err());
    }

    #[test]
    fn compare_skips_unchanged_and_applies_the_cap() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        fs::write(old.path().join("same.md"), "s").unwrap();
        fs::write(new.path().join("same.md"), "s").unwrap();
        for i in 0..4 {
            fs::write(new.path().join(format!("n{i}.md")), "new").unwrap();
        }

        let config = RenderConfig { max_entries: Some(3), ..RenderConfig::default() };
        let args = CompareArgs {
            old_dir: old.path().to_path_buf(),
            new_dir: new.path().to_path_buf(),
            include_unchanged: false,
        };
        let report = cmd_compare(args, &config).unwrap();

        assert_eq!(report.len(), 4);
        assert_eq!(report.shown().len(), 3);
        assert_eq!(report.omitted(), 1);
        assert_eq!(report.total_additions(), 4);
        assert!(report.entries().iter().all(|e| e.status == EntryStatus::Added));
    }

    #[test]
    fn compare_can_include_unchanged() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        fs::write(old.path().join("same.md"), "s").unwrap();
        fs::write(new.path().join("same.md"), "s").unwrap();

        let args = CompareArgs {
            old_dir: old.path().to_path_buf(),
            new_dir: new.path().to_path_buf(),
            include_unchanged: true,
        };
        let report = cmd_compare(args, &RenderConfig::default()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.entries()[0].status, EntryStatus::Unchanged);
        assert_eq!(report.stats().files_changed, 0);
    }

    #[test]
    fn patch_file_with_name_status_override() {
        let dir = tempfile::tempdir().unwrap();
        let patch = dir.path().join("c.diff");
        let listing = dir.path().join("c.txt");
        fs::write(&patch, "diff --git a/f.md b/f.md\n@@ -1 +1 @@\n-a\n+b\n").unwrap();
        fs::write(&listing, "D\tf.md\n").unwrap();

        let args = PatchArgs { file: Some(patch), name_status: Some(listing) };
        let report = cmd_patch(args, &RenderConfig::default()).unwrap();
        assert_eq!(report.entries()[0].status, EntryStatus::Deleted);
        assert_eq!((report.total_additions(), report.total_deletions()), (1, 1));
    }

    #[test]
    fn missing_patch_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = PatchArgs { file: Some(dir.path().join("none.diff")), name_status: None };
        assert!(cmd_patch(args, &RenderConfig::default()).is_err());
    }
}
