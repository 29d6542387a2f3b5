use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one conformance check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// The file conforms
    Ok,
    /// Readable by CF tools, but not what this crate would write
    Warning(String),
    /// The file violates the conventions
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn message(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// A named check and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCheck {
    /// What was checked, e.g. `Conventions names CF`
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }

    /// `ok` when `passed`, otherwise `failed` with the message
    pub(crate) fn require(name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        if passed {
            Self::ok(name)
        } else {
            Self::failed(name, message)
        }
    }
}

/// Every check run against one file, in order
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Check results
    pub checks: Vec<ValidationCheck>,
    /// Path (or label) of the validated dataset
    pub file_path: String,
}

impl ValidationReport {
    /// Start an empty report
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Record a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// First check with this name
    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Ok))
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    /// Number of failed checks
    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| predicate(&c.status)).count()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Render the report with terminal colors when the `colorized_output`
    /// feature is enabled, plain text otherwise
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("CF-DSG Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("========================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("File").bold(), self.file_path));

            for check in &self.checks {
                let symbol = match &check.status {
                    CheckStatus::Ok => Emoji(check.status.symbol(), "[OK]"),
                    CheckStatus::Warning(_) => Emoji(check.status.symbol(), "[WARN]"),
                    CheckStatus::Failed(_) => Emoji(check.status.symbol(), "[FAIL]"),
                };
                let name = match &check.status {
                    CheckStatus::Ok => style(check.name.as_str()).green(),
                    CheckStatus::Warning(_) => style(check.name.as_str()).yellow(),
                    CheckStatus::Failed(_) => style(check.name.as_str()).red(),
                };
                output.push_str(&format!("[{}] {}", symbol, name));
                match &check.status {
                    CheckStatus::Ok => output.push('\n'),
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("WARNING").yellow().bold(), msg));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("FAILED").red().bold(), msg));
                    }
                }
            }

            output.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            let verdict = if self.has_failures() {
                style(self.verdict()).red().bold()
            } else if self.has_warnings() {
                style(self.verdict()).yellow().bold()
            } else {
                style(self.verdict()).green().bold()
            };
            output.push_str(&format!("{}\n", verdict));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CF-DSG Validation Report")?;
        writeln!(f, "========================")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;

        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.status.message() {
                None => writeln!(f)?,
                Some((label, msg)) => writeln!(f, " - {}: {}", label, msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.verdict())
    }
}
