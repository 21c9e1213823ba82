//! Wildcard matching for action names and index names.
//!
//! # Purpose
//! Provides the single glob primitive used for both action patterns and index
//! patterns, plus [`PatternSet`], the resolved form of a named privilege.
//!
//! # Key invariants
//! - `*` matches any sequence of bytes, including `.`, `-` and `/`.
//! - Every other byte matches itself; matching is case-sensitive.
//! - Hidden (`.`-prefixed) names get no special treatment.
//!
//! # Common pitfalls
//! - Coverage between two patterns is decided by treating the requested
//!   pattern's `*` as a literal. This is exact for patterns whose only
//!   wildcard is trailing, which is all the catalog defines.

/// Match `value` against a glob `pattern` where `*` matches any run of bytes.
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    let (mut p_idx, mut v_idx) = (0usize, 0usize);
    let (mut star_idx, mut match_idx) = (None, 0usize);
    let pattern_bytes = pattern.as_bytes();
    let value_bytes = value.as_bytes();

    while v_idx < value_bytes.len() {
        if p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == b'*' {
            star_idx = Some(p_idx);
            match_idx = v_idx;
            p_idx += 1;
            continue;
        }

        if p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == value_bytes[v_idx] {
            p_idx += 1;
            v_idx += 1;
            continue;
        }

        if let Some(star) = star_idx {
            p_idx = star + 1;
            match_idx += 1;
            v_idx = match_idx;
            continue;
        }

        return false;
    }

    while p_idx < pattern_bytes.len() && pattern_bytes[p_idx] == b'*' {
        p_idx += 1;
    }

    p_idx == pattern_bytes.len()
}

/// True when any of `patterns` matches `value`.
pub fn any_match<S: AsRef<str>>(patterns: &[S], value: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| wildcard_match(pattern.as_ref(), value))
}

// Two patterns overlap when either one can generate the other.
fn overlaps(left: &str, right: &str) -> bool {
    wildcard_match(left, right) || wildcard_match(right, left)
}

/// One include/exclude pair of action patterns.
///
/// A value matches the term when it matches an include pattern and no exclude
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternTerm {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PatternTerm {
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(exclude.into_iter().map(Into::into));
        self
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn matches(&self, value: &str) -> bool {
        any_match(&self.include, value) && !any_match(&self.exclude, value)
    }

    /// Whether every value the `wanted` pattern can match is also matched by
    /// `self`. `wanted_excludes` are the requesting term's own exclusions.
    fn covers_pattern(&self, wanted: &str, wanted_excludes: &[String]) -> bool {
        any_match(&self.include, wanted)
            && !self.exclude.iter().any(|blocked| {
                overlaps(blocked, wanted) && !any_match(wanted_excludes, blocked)
            })
    }
}

/// Union of pattern terms; the resolved form of one or more privileges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternSet {
    terms: Vec<PatternTerm>,
}

impl PatternSet {
    pub fn new(terms: Vec<PatternTerm>) -> Self {
        let mut set = Self::default();
        for term in terms {
            set.push(term);
        }
        set
    }

    /// A set holding a single literal action or action pattern.
    pub fn single(pattern: impl Into<String>) -> Self {
        Self::new(vec![PatternTerm::new([pattern.into()])])
    }

    pub fn push(&mut self, term: PatternTerm) {
        if term.include.is_empty() || self.terms.contains(&term) {
            return;
        }
        self.terms.push(term);
    }

    pub fn union(&mut self, other: &PatternSet) {
        for term in &other.terms {
            self.push(term.clone());
        }
    }

    pub fn terms(&self) -> &[PatternTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, value: &str) -> bool {
        self.terms.iter().any(|term| term.matches(value))
    }

    /// Whether granting `self` also grants everything in `requested`.
    ///
    /// Each requested pattern may be covered by a different granted term.
    /// An empty request is never considered covered, so `none` grants nothing.
    pub fn covers(&self, requested: &PatternSet) -> bool {
        !requested.is_empty()
            && requested.terms.iter().all(|term| {
                term.include.iter().all(|wanted| {
                    self.terms
                        .iter()
                        .any(|granted| granted.covers_pattern(wanted, &term.exclude))
                })
            })
    }
}
