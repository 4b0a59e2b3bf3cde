use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, trace};

use intake_ingest::{CsvIntake, FileIntake, FileRef};
use intake_map::{
    FuzzySuggestionProvider, SuggestionProvider, SuggestionRequest, TemplateRepository,
};
use intake_model::Confidence;
use intake_wizard::{SuggestOutcome, WizardError, WizardProfile, WizardSession, auto_suggest};

use crate::cli::{ProfileArgs, RunArgs, SuggestArgs, TemplatesCommand};
use crate::logging::redact_value;
use crate::profiles::{parse_mapping_arg, resolve_profile};
use crate::submitter::JsonFileSubmitter;
use crate::summary::{
    align_column, apply_table_style, confidence_cell, header_cell, print_blockers, print_review,
};

/// How a wizard run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Submitted { reference: String },
    DryRun,
    Blocked,
}

pub fn run_profiles() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Profile"),
        header_cell("Title"),
        header_cell("Schema"),
        header_cell("Required fields"),
        header_cell("Documents"),
    ]);
    apply_table_style(&mut table);
    for profile in WizardProfile::builtin() {
        let required: Vec<&str> = profile
            .schema
            .required_fields()
            .map(|f| f.name.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(&profile.key),
            Cell::new(&profile.title),
            Cell::new(profile.schema.name()),
            Cell::new(required.join(", ")),
            Cell::new(format!("{:?}", profile.documents)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_suggest(args: &SuggestArgs) -> Result<()> {
    let profile = resolve_profile(args.profile.profile.key(), args.profile.schema_file.as_deref())?;
    let file = FileRef::from_path(&args.file).context("read source file")?;
    let preview = intake(&args.profile, &file)?;
    for column in preview.column_names() {
        for value in preview.samples(column) {
            trace!(column, value = redact_value(value), "sample value");
        }
    }

    let min_confidence = Confidence::new(u32::from(args.min_confidence))
        .map_err(|error| anyhow!("--min-confidence: {error}"))?;
    let provider = FuzzySuggestionProvider::new(min_confidence);
    let request = SuggestionRequest::new(
        profile.schema.clone(),
        preview.column_names().map(ToString::to_string).collect(),
    )
    .with_hints(preview.hints.clone());
    let mappings = provider.suggest_now(&request);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Tier"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for mapping in &mappings {
        let confidence = mapping.reported_confidence();
        table.add_row(vec![
            Cell::new(&mapping.source_column),
            Cell::new(mapping.target.as_str()),
            confidence_cell(confidence),
            Cell::new(confidence.tier().label()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_templates(command: &TemplatesCommand) -> Result<()> {
    match command {
        TemplatesCommand::List(dir) => {
            let repo = open_repository(&dir.template_dir)?;
            let mut table = Table::new();
            table.set_header(vec![
                header_cell("ID"),
                header_cell("Name"),
                header_cell("Mappings"),
                header_cell("Saved"),
            ]);
            apply_table_style(&mut table);
            align_column(&mut table, 2, CellAlignment::Right);
            for meta in repo.list()? {
                table.add_row(vec![
                    Cell::new(&meta.id),
                    Cell::new(&meta.name),
                    Cell::new(meta.mapping_count),
                    Cell::new(meta.saved_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{table}");
        }
        TemplatesCommand::Show { id, dir } => {
            let repo = open_repository(&dir.template_dir)?;
            let stored = repo
                .load(id)?
                .ok_or_else(|| anyhow!("template not found: {id}"))?;
            println!("{} ({})", stored.template.name, stored.template.id);
            if !stored.template.description.is_empty() {
                println!("{}", stored.template.description);
            }
            let mut table = Table::new();
            table.set_header(vec![header_cell("Column"), header_cell("Field")]);
            apply_table_style(&mut table);
            for entry in &stored.template.mappings {
                table.add_row(vec![
                    Cell::new(&entry.source_column),
                    Cell::new(entry.target.as_str()),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

pub fn run_wizard(args: &RunArgs) -> Result<RunOutcome> {
    let profile = resolve_profile(args.profile.profile.key(), args.profile.schema_file.as_deref())?;
    let run_span = info_span!("run", profile = %profile.key, file = %args.file.display());
    let _run_guard = run_span.enter();
    let repo = open_repository(&args.templates.template_dir)?;
    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .context("start async runtime")?;

    // Step 1: source upload
    let mut session = WizardSession::new(profile);
    let file = FileRef::from_path(&args.file).context("read source file")?;
    session
        .accept_file(&intake_for(&args.profile)?, file)
        .context("accept source file")?;
    if let Some(name) = &args.name {
        session.set_name(name);
    }
    if let Some(batch_id) = &args.batch_id {
        session.set_batch_id(batch_id);
    }
    if let Some(batch) = &args.existing_batch {
        session.select_existing_batch(batch)?;
    }
    for path in &args.documents {
        let document = FileRef::from_path(path)
            .with_context(|| format!("read document {}", path.display()))?;
        session.add_document(document);
    }
    if !advance(&mut session)? {
        return Ok(RunOutcome::Blocked);
    }

    // Step 2: column mapping
    if args.auto {
        let provider = FuzzySuggestionProvider::default();
        let outcome = suggest_with_spinner(
            &runtime,
            &mut session,
            &provider,
            Duration::from_secs(args.suggest_timeout),
        );
        match outcome {
            SuggestOutcome::Applied { mapped } => {
                println!("Auto-mapped {mapped} of {} columns", session.mappings().len());
            }
            SuggestOutcome::Failed(error) => {
                eprintln!("warning: auto-mapping failed ({error}); continuing with manual mapping");
            }
            SuggestOutcome::Cancelled => {
                eprintln!("warning: auto-mapping timed out; continuing with manual mapping");
            }
            SuggestOutcome::NotStarted | SuggestOutcome::Stale => {}
        }
    }
    if let Some(id) = &args.template {
        let applied = session
            .apply_template(&repo, id)
            .with_context(|| format!("apply template {id}"))?;
        println!("Template {id} mapped {applied} columns");
    }
    for raw in &args.mappings {
        let (column, target) = parse_mapping_arg(raw)?;
        session.set_mapping(&column, target)?;
    }
    if !advance(&mut session)? {
        return Ok(RunOutcome::Blocked);
    }

    // Step 3: review and submit
    if let Some(name) = &args.save_template {
        session.set_save_as_template(true);
        session.set_template_name(name);
        if let Some(description) = &args.template_description {
            session.set_template_description(description);
        }
    }
    print_review(&session.review());
    let blockers = session.submit_blockers();
    if !blockers.is_empty() {
        print_blockers(&blockers);
        return Ok(RunOutcome::Blocked);
    }
    if args.dry_run {
        info!("dry run; nothing submitted");
        return Ok(RunOutcome::DryRun);
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let submitter = JsonFileSubmitter::new(output_dir);
    let receipt = runtime
        .block_on(session.submit(&submitter))
        .map_err(|failure| anyhow!(failure.error))
        .context("submit upload")?;
    if let Some(template) = &receipt.package.new_template {
        let path = repo.save(template).context("save mapping template")?;
        println!("Saved template {} to {}", template.id, path.display());
    }
    Ok(RunOutcome::Submitted {
        reference: receipt.reference,
    })
}

/// Advance one step, printing blockers instead of failing when the guard
/// does not hold.
fn advance(session: &mut WizardSession) -> Result<bool> {
    match session.advance() {
        Ok(step) => {
            debug!(%step, "advanced");
            Ok(true)
        }
        Err(WizardError::Blocked(blockers)) => {
            print_blockers(&blockers);
            Ok(false)
        }
        Err(error) => Err(error.into()),
    }
}

fn suggest_with_spinner<P: SuggestionProvider>(
    runtime: &Runtime,
    session: &mut WizardSession,
    provider: &P,
    timeout: Duration,
) -> SuggestOutcome {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Analyzing columns...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let cancel = CancellationToken::new();
    let outcome = runtime.block_on(async {
        let deadline = cancel.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            deadline.cancel();
        });
        let outcome = auto_suggest(session, provider, &cancel).await;
        timer.abort();
        outcome
    });
    spinner.finish_and_clear();
    outcome
}

fn intake_for(args: &ProfileArgs) -> Result<CsvIntake> {
    let delimiter = u8::try_from(args.delimiter)
        .map_err(|_| anyhow!("delimiter must be a single-byte character"))?;
    Ok(CsvIntake::default().with_delimiter(delimiter))
}

fn intake(args: &ProfileArgs, file: &FileRef) -> Result<intake_ingest::TabularPreview> {
    intake_for(args)?
        .intake(file)
        .with_context(|| format!("parse {}", file.display_name))
}

fn open_repository(dir: &Path) -> Result<TemplateRepository> {
    TemplateRepository::new(dir)
        .with_context(|| format!("open template directory {}", dir.display()))
}
