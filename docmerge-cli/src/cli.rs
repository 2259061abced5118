//! CLI argument parsing for docmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input collection, and conversion into a
//! validated [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} files", cli.inputs.len());
//! ```

#![allow(dead_code)]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use docmerge::config::{Config, CoverPage, MergeOptions, OverwriteMode, StrategyKind};
use docmerge::error::{DocMergeError, Result};
use docmerge::utils::{collect_paths_for_patterns, list_docx_in_folder};

/// Combine Word documents into a single document.
///
/// docmerge appends `.docx` files in order, separating them with page breaks
/// while trimming the blank paragraphs that would otherwise produce empty
/// pages. It can number documents, draw separators, and add a cover page and
/// a table of contents.
#[derive(Parser, Debug)]
#[command(name = "docmerge")]
#[command(version)]
#[command(about = "Combine Word documents into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input .docx files to merge (in order)
    ///
    /// Glob patterns are expanded. Files are merged in the order provided.
    ///
    /// Examples:
    ///   docmerge intro.docx body.docx -o book.docx
    ///   docmerge "chapters/*.docx" -o book.docx
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output .docx file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Merge every .docx file in a folder, sorted by file name
    ///
    /// Word lock files (~$name.docx) are ignored. Folder files are appended
    /// after the files given directly.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Scan --dir recursively
    #[arg(short, long, requires = "dir")]
    pub recursive: bool,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' are comments. Use '-' to read from stdin.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Load merge options from a JSON file
    ///
    /// Flags given on the command line override values from the file.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Do not insert page breaks between documents
    #[arg(long)]
    pub no_page_break: bool,

    /// Draw a separator line under each document header
    #[arg(long)]
    pub separator: bool,

    /// Add a "Document N: name" header before each document
    #[arg(long)]
    pub number: bool,

    /// Add a cover page with this title
    #[arg(long, value_name = "TEXT")]
    pub cover_title: Option<String>,

    /// Cover page subtitle (defaults to the generation time)
    #[arg(long, value_name = "TEXT", requires = "cover_title")]
    pub cover_subtitle: Option<String>,

    /// Extra line at the bottom of the cover page
    #[arg(long, value_name = "TEXT", requires = "cover_title")]
    pub cover_info: Option<String>,

    /// Add a table of contents listing every input
    #[arg(long)]
    pub toc: bool,

    /// Stop at the first document that fails to load
    ///
    /// By default unreadable documents are skipped with a warning.
    #[arg(long)]
    pub stop_on_error: bool,

    /// How documents are appended
    ///
    /// - manual: element by element, trimming trailing blanks (default)
    /// - composer: whole documents with a page break run
    #[arg(long, value_name = "STRATEGY")]
    #[arg(value_parser = ["manual", "composer"])]
    pub strategy: Option<String>,

    /// Number of documents loaded concurrently
    ///
    /// Default is number of CPU cores. Use 1 for sequential loading.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Validate and analyze the inputs without writing the output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Overwrite an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print merge statistics (or the dry run analysis) as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Collects the inputs, loads the options file if one was given and
    /// applies the flags on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if an input source cannot be read, the options file
    /// is invalid, or the resulting configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        let inputs = self.collect_inputs()?;
        let mut config = Config::new(inputs, self.output.clone());

        config.options = self.merge_options()?;
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.json = self.json;
        config.jobs = self.jobs;
        config.overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        config.validate().map_err(|e| {
            DocMergeError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Build the merge options from the options file and the flags.
    fn merge_options(&self) -> Result<MergeOptions> {
        let mut options = match &self.options {
            Some(path) => MergeOptions::from_json_file(path)
                .map_err(|e| DocMergeError::invalid_config(format!("{e:#}")))?,
            None => MergeOptions::default(),
        };

        if self.no_page_break {
            options.add_page_break = false;
        }
        if self.separator {
            options.add_separator = true;
        }
        if self.number {
            options.number_documents = true;
        }
        if self.toc {
            options.add_table_of_contents = true;
        }
        if self.stop_on_error {
            options.stop_on_error = true;
        }
        if let Some(strategy) = &self.strategy {
            options.strategy = StrategyKind::from_str(strategy)?;
        }
        if let Some(title) = &self.cover_title {
            options.cover_page = Some(CoverPage {
                title: title.clone(),
                subtitle: self.cover_subtitle.clone(),
                info: self.cover_info.clone(),
            });
        }

        Ok(options)
    }

    /// Collect every input path in merge order.
    ///
    /// Direct arguments come first (glob patterns expanded in place), then
    /// the folder scan, then the input list.
    ///
    /// # Errors
    ///
    /// Returns [`DocMergeError::NoDocuments`] if nothing was collected.
    pub fn collect_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();

        for arg in &self.inputs {
            if is_glob_pattern(arg) {
                let matches = collect_paths_for_patterns([arg])?;
                if matches.is_empty() {
                    log::warn!("Pattern matched no files: {arg}");
                }
                inputs.extend(matches);
            } else {
                inputs.push(PathBuf::from(arg));
            }
        }

        if let Some(dir) = &self.dir {
            let found = list_docx_in_folder(dir, self.recursive)?;
            log::debug!("Found {} document(s) in {}", found.len(), dir.display());
            inputs.extend(found);
        }

        if let Some(list) = &self.input_list {
            inputs.extend(read_input_list(list)?);
        }

        if inputs.is_empty() {
            return Err(DocMergeError::NoDocuments);
        }

        Ok(inputs)
    }
}

fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Read input paths from a file, or from stdin when the path is `-`.
///
/// Empty lines and lines starting with '#' are skipped.
fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source| DocMergeError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    let contents = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).map_err(read_error)?
    } else {
        std::fs::read_to_string(path).map_err(read_error)?
    };

    Ok(parse_input_list(&contents))
}

fn parse_input_list(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}
