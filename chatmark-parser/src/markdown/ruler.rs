//! Ordered, named rule chains
//!
//! Every pipeline stage keeps its rules in a [`Ruler`]. A rule is a plain function pointer
//! registered under a name, so plugins can place their own rules relative to existing ones:
//!
//! ```rust,ignore
//! md.block.ruler.before("reference", "abbr_def", abbr_def, &["paragraph", "reference"])?;
//! md.core.ruler.after("linkify", "abbr_replace", abbr_replace, &[])?;
//! ```
//!
//! Besides the main chain, each rule may join named alternative chains. Block rules use
//! these to ask "would any rule in chain X start here?", e.g. the paragraph rule probes the
//! `paragraph` chain to find out where a paragraph is interrupted.

use std::collections::HashMap;
use std::fmt;

/// Error raised while registering or toggling rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulerError {
    /// No rule with this name exists
    UnknownRule(String),
    /// A rule with this name is already registered
    DuplicateRule(String),
}

impl fmt::Display for RulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulerError::UnknownRule(name) => write!(f, "Unknown rule: {}", name),
            RulerError::DuplicateRule(name) => write!(f, "Rule already registered: {}", name),
        }
    }
}

impl std::error::Error for RulerError {}

struct Rule<T> {
    name: String,
    enabled: bool,
    func: T,
    alt: Vec<String>,
}

impl<T> Rule<T> {
    fn new(name: &str, func: T, alt: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            func,
            alt: alt.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Named rules of one function type, with cached chains.
pub struct Ruler<T> {
    rules: Vec<Rule<T>>,
    /// Chain name → enabled rules in order. The main chain is keyed by `""`.
    chains: HashMap<String, Vec<T>>,
}

impl<T: Copy> Ruler<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            chains: HashMap::new(),
        }
    }

    /// Append a rule to the end of the main chain.
    pub fn push(&mut self, name: &str, func: T, alt: &[&str]) -> Result<(), RulerError> {
        self.ensure_new(name)?;
        self.rules.push(Rule::new(name, func, alt));
        self.compile();
        Ok(())
    }

    /// Insert a rule right before `anchor`.
    pub fn before(
        &mut self,
        anchor: &str,
        name: &str,
        func: T,
        alt: &[&str],
    ) -> Result<(), RulerError> {
        let index = self.find(anchor)?;
        self.ensure_new(name)?;
        self.rules.insert(index, Rule::new(name, func, alt));
        self.compile();
        Ok(())
    }

    /// Insert a rule right after `anchor`.
    pub fn after(
        &mut self,
        anchor: &str,
        name: &str,
        func: T,
        alt: &[&str],
    ) -> Result<(), RulerError> {
        let index = self.find(anchor)?;
        self.ensure_new(name)?;
        self.rules.insert(index + 1, Rule::new(name, func, alt));
        self.compile();
        Ok(())
    }

    /// Replace the function of an existing rule, keeping its position.
    pub fn at(&mut self, name: &str, func: T, alt: &[&str]) -> Result<(), RulerError> {
        let index = self.find(name)?;
        self.rules[index] = Rule::new(name, func, alt);
        self.compile();
        Ok(())
    }

    pub fn enable(&mut self, names: &[&str]) -> Result<(), RulerError> {
        self.set_enabled(names, true)
    }

    pub fn disable(&mut self, names: &[&str]) -> Result<(), RulerError> {
        self.set_enabled(names, false)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.name == name && rule.enabled)
    }

    /// Enabled rules of the main chain (`""`) or of an alternative chain.
    pub fn rules_for(&self, chain: &str) -> &[T] {
        self.chains.get(chain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all rules in order, enabled or not.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// All names are resolved before any flag changes, so an unknown name leaves the ruler as it was.
    fn set_enabled(&mut self, names: &[&str], enabled: bool) -> Result<(), RulerError> {
        let indices = names
            .iter()
            .map(|name| self.find(name))
            .collect::<Result<Vec<_>, _>>()?;
        for index in indices {
            self.rules[index].enabled = enabled;
        }
        self.compile();
        Ok(())
    }

    fn find(&self, name: &str) -> Result<usize, RulerError> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .ok_or_else(|| RulerError::UnknownRule(name.to_string()))
    }

    fn ensure_new(&self, name: &str) -> Result<(), RulerError> {
        match self.find(name) {
            Ok(_) => Err(RulerError::DuplicateRule(name.to_string())),
            Err(_) => Ok(()),
        }
    }

    fn compile(&mut self) {
        let mut chains: HashMap<String, Vec<T>> = HashMap::new();
        chains.insert(String::new(), Vec::new());
        for rule in &self.rules {
            for alt in &rule.alt {
                chains.entry(alt.clone()).or_default();
            }
        }
        for rule in self.rules.iter().filter(|rule| rule.enabled) {
            chains.entry(String::new()).or_default().push(rule.func);
            for alt in &rule.alt {
                chains.entry(alt.clone()).or_default().push(rule.func);
            }
        }
        self.chains = chains;
    }
}

impl<T: Copy> Default for Ruler<T> {
    fn default() -> Self {
        Self::new()
    }
}
