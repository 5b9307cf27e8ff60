//! CLI Tooling
//!
//! Command-line interface over a [`Gradebook`] backed by the JSON document
//! store. Every command returns its rendered output; rubric edits are saved
//! only if the edited rubric passes validation.

use crate::aggregate::ScoreSheet;
use crate::config::{ConfigLoader, GradetreeConfig};
use crate::error::{ApiError, TreeError};
use crate::gradebook::{CourseEditor, Gradebook};
use crate::logging::{LogFormat, LogOutput};
use crate::store::JsonFileStore;
use crate::tooling::format::{
    format_report_text, format_score_warnings, format_summary_text, format_tree_text,
    format_validation_text,
};
use crate::tree::NodeUpdate;
use crate::types::{ComponentPath, Direction};
use crate::validation::ScoreWarning;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Gradetree CLI - Weighted grading rubrics and score aggregation
#[derive(Parser)]
#[command(name = "gradetree")]
#[command(about = "Weighted grading rubrics, score aggregation and grade reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Course data directory (overrides storage.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log output
    #[arg(long, global = true, value_enum)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List courses with a stored grading configuration
    Courses,
    /// Print the effective configuration after all layers are merged
    Config,
    /// Show or edit a course's grading configuration
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },
    /// Validate a course's grading configuration
    Validate {
        #[arg(long)]
        course: String,
    },
    /// Record, remove or show a student's scores
    Score {
        #[command(subcommand)]
        command: ScoreCommands,
    },
    /// Score breakdown, total and grade of one student
    Report {
        #[arg(long)]
        course: String,
        #[arg(long)]
        student: String,
    },
    /// Class average, grade distribution and at-risk students
    Summary {
        #[arg(long)]
        course: String,
        /// Restrict to (and include unscored) students; defaults to every scored student
        #[arg(long, value_delimiter = ',')]
        students: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
pub enum TreeCommands {
    /// Print the grading configuration
    Show {
        #[arg(long)]
        course: String,
    },
    /// Add a component under a parent (top level when --parent is omitted)
    Add {
        #[arg(long)]
        course: String,
        /// Full key of the parent component
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        label: String,
        /// Weight; defaults to grading.default_weight
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Remove a component and everything beneath it
    Remove {
        #[arg(long)]
        course: String,
        /// Full key of the component, e.g. final.project
        #[arg(long)]
        path: String,
    },
    /// Change a component's label and/or weight
    Update {
        #[arg(long)]
        course: String,
        #[arg(long)]
        path: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Swap a component with its previous or next sibling
    Move {
        #[arg(long)]
        course: String,
        #[arg(long)]
        parent: Option<String>,
        /// Zero-based position among its siblings
        #[arg(long)]
        index: usize,
        #[arg(long)]
        direction: Direction,
    },
}

#[derive(Subcommand)]
pub enum ScoreCommands {
    /// Record scores as KEY=VALUE pairs (keys are full keys such as final.project)
    Set {
        #[arg(long)]
        course: String,
        #[arg(long)]
        student: String,
        #[arg(long = "score", value_parser = parse_score_pair, required = true)]
        scores: Vec<(String, f64)>,
    },
    /// Remove one recorded score
    Unset {
        #[arg(long)]
        course: String,
        #[arg(long)]
        student: String,
        #[arg(long)]
        key: String,
    },
    /// Print a student's raw scores
    Show {
        #[arg(long)]
        course: String,
        #[arg(long)]
        student: String,
    },
}

fn parse_score_pair(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid score '{}': expected KEY=VALUE", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid score value in '{}': {}", s, e))?;
    if !value.is_finite() {
        return Err(format!("Score must be finite: '{}'", s));
    }
    Ok((key.trim().to_string(), value))
}

fn parent_path(parent: &Option<String>) -> ComponentPath {
    parent
        .as_deref()
        .map(ComponentPath::from_full_key)
        .unwrap_or_else(ComponentPath::root)
}

fn split_component_path(full_key: &str) -> Result<(ComponentPath, String), ApiError> {
    let path = ComponentPath::from_full_key(full_key);
    let (parent, key) = path
        .split_last()
        .ok_or_else(|| TreeError::invalid_path(full_key))?;
    Ok((parent, key.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// CLI context holding the loaded configuration and the gradebook
pub struct CliContext {
    gradebook: Gradebook<JsonFileStore>,
    config: GradetreeConfig,
    format: OutputFormat,
}

impl CliContext {
    /// Create a new CLI context, loading configuration from the usual sources.
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Self::with_config(data_dir, config)
    }

    /// Create a context over an already-loaded configuration.
    pub fn with_config(
        data_dir: Option<PathBuf>,
        config: GradetreeConfig,
    ) -> Result<Self, ApiError> {
        let data_dir = config.storage.resolve_data_dir(data_dir)?;
        let store = JsonFileStore::new(data_dir);
        Ok(Self {
            gradebook: Gradebook::new(store, config.grading.clone()),
            config,
            format: OutputFormat::Text,
        })
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn config(&self) -> &GradetreeConfig {
        &self.config
    }

    pub fn gradebook(&self) -> &Gradebook<JsonFileStore> {
        &self.gradebook
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Courses => {
                let courses = self.gradebook.list_courses()?;
                match self.format {
                    OutputFormat::Json => to_json(&json!({ "courses": courses })),
                    OutputFormat::Text if courses.is_empty() => {
                        Ok("No courses configured.".to_string())
                    }
                    OutputFormat::Text => Ok(courses.join("\n")),
                }
            }
            Commands::Config => match self.format {
                OutputFormat::Json => to_json(&self.config),
                OutputFormat::Text => toml::to_string_pretty(&self.config).map_err(|e| {
                    ApiError::ConfigError(format!("Failed to serialize configuration: {}", e))
                }),
            },
            Commands::Tree { command } => self.execute_tree(command),
            Commands::Validate { course } => {
                let editor = self.gradebook.open_course(course)?;
                let report = self.gradebook.validate_course(&editor);
                match self.format {
                    OutputFormat::Json => to_json(&json!({
                        "course": course,
                        "valid": report.is_valid(),
                        "issues": report.issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
                        "warnings": report.warnings,
                    })),
                    OutputFormat::Text => Ok(format_validation_text(&report)),
                }
            }
            Commands::Score { command } => self.execute_score(command),
            Commands::Report { course, student } => {
                let report = self.gradebook.student_report(course, student)?;
                match self.format {
                    OutputFormat::Json => to_json(&report),
                    OutputFormat::Text => Ok(format_report_text(&report)),
                }
            }
            Commands::Summary { course, students } => {
                let summary = self
                    .gradebook
                    .class_summary(course, students.as_deref())?;
                match self.format {
                    OutputFormat::Json => to_json(&summary),
                    OutputFormat::Text => Ok(format_summary_text(course, &summary)),
                }
            }
        }
    }

    fn render_tree(&self, editor: &CourseEditor) -> Result<String, ApiError> {
        match self.format {
            OutputFormat::Json => to_json(&editor.to_record()),
            OutputFormat::Text => Ok(format_tree_text(editor.course(), editor.tree())),
        }
    }

    fn save_and_render(&self, editor: &CourseEditor, message: String) -> Result<String, ApiError> {
        let report = self.gradebook.save_course(editor)?;
        info!(course = %editor.course(), "{}", message);
        match self.format {
            OutputFormat::Json => self.render_tree(editor),
            OutputFormat::Text => {
                let mut out = message;
                for warning in &report.warnings {
                    out.push_str(&format!("\n  warning: {}", warning));
                }
                Ok(out)
            }
        }
    }

    fn execute_tree(&self, command: &TreeCommands) -> Result<String, ApiError> {
        match command {
            TreeCommands::Show { course } => {
                let editor = self.gradebook.open_course(course)?;
                self.render_tree(&editor)
            }
            TreeCommands::Add {
                course,
                parent,
                label,
                weight,
            } => {
                let mut editor = self.gradebook.open_course(course)?;
                let parent = parent_path(parent);
                let key = editor.add_labeled_component(&parent, label.clone(), *weight)?;
                self.save_and_render(&editor, format!("Added {}", parent.child(key).full_key()))
            }
            TreeCommands::Remove { course, path } => {
                let mut editor = self.gradebook.open_course(course)?;
                let (parent, key) = split_component_path(path)?;
                editor.remove_component(&parent, &key)?;
                self.save_and_render(&editor, format!("Removed {}", path))
            }
            TreeCommands::Update {
                course,
                path,
                label,
                weight,
            } => {
                let mut editor = self.gradebook.open_course(course)?;
                let update = NodeUpdate {
                    label: label.clone(),
                    weight: *weight,
                };
                editor.update_component(&ComponentPath::from_full_key(path), update)?;
                self.save_and_render(&editor, format!("Updated {}", path))
            }
            TreeCommands::Move {
                course,
                parent,
                index,
                direction,
            } => {
                let mut editor = self.gradebook.open_course(course)?;
                let parent = parent_path(parent);
                if !editor.move_component(&parent, *index, *direction)? {
                    return Ok(format!("Nothing to move at position {} under {}", index, parent));
                }
                self.save_and_render(&editor, format!("Moved position {} under {}", index, parent))
            }
        }
    }

    fn execute_score(&self, command: &ScoreCommands) -> Result<String, ApiError> {
        match command {
            ScoreCommands::Set {
                course,
                student,
                scores,
            } => {
                let sheet: ScoreSheet = scores.iter().cloned().collect();
                let warnings = self.gradebook.record_scores(course, student, &sheet)?;
                self.render_recorded(student, sheet.len(), &warnings)
            }
            ScoreCommands::Unset {
                course,
                student,
                key,
            } => {
                let previous = self.gradebook.clear_score(course, student, key)?;
                match (self.format, previous) {
                    (OutputFormat::Json, previous) => {
                        to_json(&json!({ "student": student, "key": key, "previous": previous }))
                    }
                    (OutputFormat::Text, Some(value)) => {
                        Ok(format!("Removed {} ({}) for {}", key, value, student))
                    }
                    (OutputFormat::Text, None) => {
                        Ok(format!("No score recorded for {} ({})", student, key))
                    }
                }
            }
            ScoreCommands::Show { course, student } => {
                let scores = self.gradebook.student_scores(course, student)?;
                match self.format {
                    OutputFormat::Json => to_json(&scores),
                    OutputFormat::Text if scores.is_empty() => {
                        Ok(format!("No scores recorded for {}", student))
                    }
                    OutputFormat::Text => Ok(scores
                        .iter()
                        .map(|(key, value)| format!("{} = {}", key, value))
                        .collect::<Vec<_>>()
                        .join("\n")),
                }
            }
        }
    }

    fn render_recorded(
        &self,
        student: &str,
        count: usize,
        warnings: &[ScoreWarning],
    ) -> Result<String, ApiError> {
        match self.format {
            OutputFormat::Json => to_json(&json!({
                "student": student,
                "recorded": count,
                "warnings": warnings,
            })),
            OutputFormat::Text => {
                let mut out = format!("Recorded {} score(s) for {}", count, student);
                if !warnings.is_empty() {
                    out.push('\n');
                    out.push_str(&format_score_warnings(warnings));
                }
                Ok(out)
            }
        }
    }
}
