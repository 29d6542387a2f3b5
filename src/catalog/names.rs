use std::collections::{HashMap, HashSet};

/// Turn arbitrary user text into a legal output name.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit is prefixed
/// with `_`, and an empty result becomes `var`.
pub fn sanitize_name(raw: &str) -> String {
    let mut name: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        name.push_str("var");
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Registry of output names already handed out for one conversion job.
///
/// Collisions are resolved with a running counter per base name
/// (`temp`, `temp_1`, `temp_2`, ...), skipping any suffixed name that is
/// already taken. Claiming is deterministic: the same sequence of requests
/// always yields the same names.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    counts: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `raw` and claim a unique name derived from it
    pub fn claim(&mut self, raw: &str) -> String {
        let base = sanitize_name(raw);
        if self.taken.insert(base.clone()) {
            self.counts.entry(base.clone()).or_insert(0);
            return base;
        }
        let counter = self.counts.entry(base.clone()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}_{}", base, counter);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Whether a name has been claimed
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Number of claimed names
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether nothing has been claimed
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
