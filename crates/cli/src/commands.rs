//! Subcommand implementations.

use crate::{Args, AssembleArgs, ExportArgs, GenerateArgs, SelectArgs, StyleArgs};
use anyhow::{bail, Context, Result};
use deck_ai::{
    create_provider, parse_slides_response, GenerationRequest, ProviderConfig, ProviderKind,
    SlideCount, SlideGenerator,
};
use deck_core::{
    parse_ranges_with_report, Document, MarpAssembler, NewPresentation, StyleDescriptor,
    DEFAULT_TITLE,
};
use deck_render::{ExportFormat, MarpConfig, MarpRenderer, Renderer};
use deck_store::{FileStore, PresentationStore};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Generate slides with an AI provider, assemble them, and store the result.
pub fn generate(args: &Args, generate: &GenerateArgs) -> Result<()> {
    let content = read_input(generate.input.as_deref())?;
    let kind: ProviderKind = generate.provider.parse()?;
    let slide_count: SlideCount = generate.slides.parse()?;

    let api_key = generate
        .api_key
        .clone()
        .or_else(|| std::env::var(kind.api_key_env()).ok())
        .unwrap_or_default();

    let mut config = ProviderConfig::new(kind, api_key);
    if let Some(model) = &generate.model {
        config = config.with_model(model);
    }
    let model = config.model.clone();

    let generator = SlideGenerator::new(create_provider(config)?);
    let mut request = GenerationRequest::new(content.clone()).with_slide_count(slide_count);
    if let Some(guidance) = &generate.guidance {
        request = request.with_guidance(guidance);
    }

    if args.verbose {
        eprintln!("Generating slides with {} ({})", kind, model);
    }
    let slides = generator
        .generate_slides(&request)
        .context("Slide generation failed")?;

    let title = resolve_title(generate.title.as_deref());
    let style = load_style(&generate.style)?;
    let document = assembler(&generate.style).assemble(&slides, &style, &title);
    let markdown = document.to_markdown();

    if args.verbose {
        eprintln!("  Generated {} slides", slides.len());
    }

    if let Some(output) = &generate.output {
        write_output(output, markdown.as_bytes())?;
    }

    if generate.no_store {
        if generate.output.is_none() {
            print!("{}", markdown);
        }
        return Ok(());
    }

    let store = open_store(args)?;
    let record = store.create(NewPresentation {
        title,
        content,
        guidance: generate.guidance.clone(),
        provider: kind.as_str().to_string(),
        model,
        slide_count: slides.len(),
        style,
        markdown,
    })?;

    println!("{}", record.id);
    Ok(())
}

/// Assemble a document from a slides JSON file.
pub fn assemble(assemble: &AssembleArgs) -> Result<()> {
    let json = fs::read_to_string(&assemble.slides)
        .with_context(|| format!("Failed to read {}", assemble.slides.display()))?;
    let slides = parse_slides_response(&json)
        .with_context(|| format!("Invalid slides file {}", assemble.slides.display()))?;

    let style = load_style(&assemble.style)?;
    let title = resolve_title(assemble.title.as_deref());
    let document = assembler(&assemble.style).assemble(&slides, &style, &title);

    emit(assemble.output.as_deref(), document.to_markdown().as_bytes())
}

/// Apply a range expression to a document file.
pub fn select(select: &SelectArgs) -> Result<()> {
    let text = fs::read_to_string(&select.document)
        .with_context(|| format!("Failed to read {}", select.document.display()))?;

    let selected = apply_ranges(&text, &select.slides);
    emit(select.output.as_deref(), selected.as_bytes())
}

/// Render a stored presentation or document file.
pub fn export(args: &Args, export: &ExportArgs) -> Result<()> {
    let format: ExportFormat = export.format.parse()?;

    let (text, name) = match (&export.id, &export.document) {
        (Some(id), _) => {
            let record = open_store(args)?
                .get(&parse_id(id)?)?
                .with_context(|| format!("Presentation not found: {}", id))?;
            (record.markdown, file_stem_for(&record.title))
        }
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("slides")
                .to_string();
            (text, stem)
        }
        (None, None) => bail!("Pass --id or --document"),
    };

    let document = apply_ranges(&text, &export.slides);

    let config = MarpConfig::default()
        .with_command_line(&export.marp_command)?
        .with_timeout(Duration::from_secs(export.render_timeout))
        .with_binary_rendering(export.render_binary)
        .with_local_files(export.allow_local_files);
    let renderer = MarpRenderer::new(config);

    if args.verbose {
        eprintln!("Rendering {} slides to {}", Document::parse(&document).slide_count(), format);
    }
    let bytes = renderer
        .render(&document, format)
        .with_context(|| format!("{} export failed", format))?;

    let output = export
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", name, format.extension())));
    write_output(&output, &bytes)?;

    if args.verbose {
        eprintln!("Written to: {}", output.display());
    }
    Ok(())
}

/// Print stored presentations, newest first.
pub fn list(args: &Args, limit: usize) -> Result<()> {
    let records = open_store(args)?.list(limit)?;
    if records.is_empty() && args.verbose {
        eprintln!("No presentations stored in {}", args.store_dir.display());
    }

    for record in records {
        println!(
            "{}  {}  {:>3} slides  {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.slide_count,
            record.title
        );
    }
    Ok(())
}

/// Print one stored presentation.
pub fn show(args: &Args, id: &str, markdown: bool) -> Result<()> {
    let record = open_store(args)?
        .get(&parse_id(id)?)?
        .with_context(|| format!("Presentation not found: {}", id))?;

    if markdown {
        print!("{}", record.markdown);
        return Ok(());
    }

    println!("Id:        {}", record.id);
    println!("Title:     {}", record.title);
    println!("Created:   {}", record.created_at.to_rfc3339());
    println!("Provider:  {} ({})", record.provider, record.model);
    println!("Slides:    {}", record.slide_count);
    if let Some(guidance) = &record.guidance {
        println!("Guidance:  {}", guidance);
    }
    Ok(())
}

/// Delete one stored presentation.
pub fn delete(args: &Args, id: &str) -> Result<()> {
    if !open_store(args)?.delete(&parse_id(id)?)? {
        bail!("Presentation not found: {}", id);
    }
    if args.verbose {
        eprintln!("Deleted {}", id);
    }
    Ok(())
}

/// Apply a range expression, telling the user about ignored tokens.
fn apply_ranges(text: &str, expression: &str) -> String {
    let parsed = parse_ranges_with_report(expression);
    if !parsed.rejected.is_empty() {
        eprintln!("Ignoring invalid slide ranges: {}", parsed.rejected.join(", "));
    }

    if parsed.selects_all() {
        return text.to_string();
    }

    let document = Document::parse(text);
    let selected = document.select(&parsed.ranges);
    if selected.is_header_only() && !document.is_header_only() {
        eprintln!(
            "Warning: no slides match '{}' (document has {} slides)",
            expression.trim(),
            document.slide_count()
        );
    }
    selected.to_markdown()
}

fn assembler(style: &StyleArgs) -> MarpAssembler {
    MarpAssembler::new().with_theme(&style.theme)
}

fn resolve_title(title: Option<&str>) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn load_style(style: &StyleArgs) -> Result<StyleDescriptor> {
    match &style.style {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid style file {}", path.display()))
        }
        None => Ok(StyleDescriptor::default()),
    }
}

fn open_store(args: &Args) -> Result<FileStore> {
    FileStore::open(&args.store_dir)
        .with_context(|| format!("Failed to open store at {}", args.store_dir.display()))
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("Invalid presentation id: {}", id))
}

/// Read text from a file, or stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Turn a title into a safe file name stem.
fn file_stem_for(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "slides".to_string()
    } else {
        stem.to_string()
    }
}

/// Write to a file, or stdout when no path is given.
fn emit(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => write_output(path, content),
        None => {
            io::stdout().write_all(content).context("Failed to write stdout")?;
            Ok(())
        }
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut file =
        fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "header\n\n---\n\n# One\n\n---\n\n# Two\n\n---\n\n# Three\n";

    #[test]
    fn test_apply_ranges_empty_keeps_document() {
        assert_eq!(apply_ranges(DOC, ""), DOC);
        assert_eq!(apply_ranges(DOC, "nope"), DOC);
    }

    #[test]
    fn test_apply_ranges_filters() {
        assert_eq!(
            apply_ranges(DOC, "3, 1"),
            "header\n\n---\n\n# One\n\n---\n\n# Three\n"
        );
        assert_eq!(apply_ranges(DOC, "9"), "header\n");
    }

    #[test]
    fn test_resolve_title() {
        assert_eq!(resolve_title(None), DEFAULT_TITLE);
        assert_eq!(resolve_title(Some("  ")), DEFAULT_TITLE);
        assert_eq!(resolve_title(Some(" Roadmap ")), "Roadmap");
    }

    #[test]
    fn test_file_stem_for() {
        assert_eq!(file_stem_for("Q3 Review: Results!"), "Q3_Review__Results");
        assert_eq!(file_stem_for("???"), "slides");
    }

    #[test]
    fn test_write_output_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.md");

        write_output(&path, b"content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }
}
