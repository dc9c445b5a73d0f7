//! Generate command - schema and integration-test file generation.

use clap::Args;
use std::path::{Path, PathBuf};
use zodgen_core::config::{NameFilter, TagFilter};
use zodgen_core::ir::JsDocTag;
use zodgen_core::{
    GenerateConfig, generate, parse_declarations, render_integration_file, render_schema_file,
};

/// Generate command arguments
#[derive(Args)]
pub struct GenerateArgs {
    /// TypeScript source file with the type declarations
    pub input: PathBuf,

    /// Output schema file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a type-equivalence integration-test file
    #[arg(long)]
    pub tests_output: Option<PathBuf>,

    /// Only generate these declarations (flattened identifiers; repeatable).
    /// Dependencies are pulled in automatically.
    #[arg(long)]
    pub only: Vec<String>,

    /// Only generate declarations carrying this JSDoc tag
    #[arg(long)]
    pub required_tag: Option<String>,

    /// Propagate JSDoc comments into the generated file
    #[arg(long)]
    pub keep_comments: bool,

    /// Emit the raw generation result (records, assertions, diagnostics) as
    /// JSON instead of rendering files
    #[arg(long)]
    pub json: bool,

    /// Retry bound for chained self-referential cycles
    #[arg(long, default_value_t = zodgen_core::DEFAULT_MAX_RUN)]
    pub max_run: u32,

    /// Import path for the source module in generated files
    /// (defaults to "./<input stem>")
    #[arg(long)]
    pub source_import: Option<String>,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> i32 {
    let source = match std::fs::read_to_string(&args.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.input.display(), e);
            return 1;
        }
    };

    let declarations = match parse_declarations(&source) {
        Ok(declarations) => declarations,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", args.input.display(), e);
            return 1;
        }
    };
    tracing::debug!(count = declarations.len(), "extracted declarations");

    let name_filter: Option<NameFilter> = if args.only.is_empty() {
        None
    } else {
        let only = args.only.clone();
        Some(Box::new(move |id: &str| {
            only.iter().any(|name| name == id)
        }))
    };
    let jsdoc_tag_filter: Option<TagFilter> = args.required_tag.clone().map(|required| {
        Box::new(move |tags: &[JsDocTag]| tags.iter().any(|tag| tag.name == required)) as TagFilter
    });

    let config = GenerateConfig {
        name_filter,
        jsdoc_tag_filter,
        keep_comments: args.keep_comments,
        max_run: args.max_run,
        ..Default::default()
    };

    let result = generate(declarations, &config);
    tracing::debug!(
        records = result.records.len(),
        diagnostics = result.diagnostics.len(),
        "generation finished"
    );

    // Diagnostics are warnings: the rest of the graph still emitted.
    for diagnostic in &result.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                return 1;
            }
        }
        return 0;
    }

    let source_import = args
        .source_import
        .clone()
        .unwrap_or_else(|| module_import(&args.input));
    let schema_file = render_schema_file(&result.records, &source_import);

    if let Some(path) = &args.output {
        if let Err(e) = std::fs::write(path, &schema_file) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            return 1;
        }
        eprintln!("Generated {}", path.display());
    } else {
        print!("{}", schema_file);
    }

    if let Some(path) = &args.tests_output {
        let schema_import = args
            .output
            .as_deref()
            .map(module_import)
            .unwrap_or_else(|| format!("{}.zod", source_import));
        let tests_file = render_integration_file(&result.assertions, &source_import, &schema_import);
        if let Err(e) = std::fs::write(path, &tests_file) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            return 1;
        }
        eprintln!("Generated {}", path.display());
    }

    0
}

/// Derive a relative module import from a file path (`hero.ts` -> `./hero`).
fn module_import(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "source".to_string());
    format!("./{}", stem)
}
