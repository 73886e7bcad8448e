//! Ordered intent templates.
//!
//! Normalized text is tested against each template in turn and the first
//! one that applies decides the intent. Reordering templates changes
//! behaviour: `what is that x` is captured by `what is` before its own
//! template is ever reached, and the catch-all must stay last.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::singularize;

/// Structured action derived from free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open a website. `url` is either the literal input or a synthesized `.com` address.
    OpenSite { site: String, url: String },
    /// Encyclopedic lookup trimmed to `line_limit` sentences.
    LimitedLookup { topic: String, line_limit: usize },
    /// Lookup through the full provider chain.
    GenericLookup { topic: String },
}

impl Intent {
    pub fn action(&self) -> IntentAction {
        match self {
            Intent::OpenSite { .. } => IntentAction::OpenSite,
            Intent::LimitedLookup { .. } => IntentAction::LimitedLookup,
            Intent::GenericLookup { .. } => IntentAction::GenericLookup,
        }
    }
}

/// The action a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentAction {
    OpenSite,
    LimitedLookup,
    GenericLookup,
}

#[derive(Clone)]
enum Matcher {
    /// Literal `open ` prefix.
    OpenSite,
    /// Captures (count, topic).
    Quantified(Regex),
    /// Captures (topic).
    Question(Regex),
    /// Optional leading verb, then everything else as topic.
    CatchAll(Regex),
}

/// One entry of the ordered template list.
#[derive(Clone)]
pub struct IntentTemplate {
    name: &'static str,
    matcher: Matcher,
}

impl IntentTemplate {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn action(&self) -> IntentAction {
        match self.matcher {
            Matcher::OpenSite => IntentAction::OpenSite,
            Matcher::Quantified(_) => IntentAction::LimitedLookup,
            Matcher::Question(_) | Matcher::CatchAll(_) => IntentAction::GenericLookup,
        }
    }

    /// Try this template against normalized text.
    pub fn apply(&self, text: &str) -> Option<Intent> {
        match &self.matcher {
            Matcher::OpenSite => {
                let site = text.strip_prefix("open ")?.trim();
                if site.is_empty() {
                    return None;
                }
                Some(Intent::OpenSite {
                    site: site.to_string(),
                    url: site_url(site),
                })
            }
            Matcher::Quantified(re) => {
                let caps = re.captures(text)?;
                // Only digits are captured, so the parse can fail solely on overflow.
                let line_limit = caps[1].parse::<usize>().unwrap_or(usize::MAX);
                Some(Intent::LimitedLookup {
                    topic: singularize(caps[2].trim()),
                    line_limit,
                })
            }
            Matcher::Question(re) | Matcher::CatchAll(re) => {
                let caps = re.captures(text)?;
                let topic = caps.get(1)?.as_str().trim();
                if topic.is_empty() {
                    return None;
                }
                Some(Intent::GenericLookup {
                    topic: topic.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for IntentTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentTemplate")
            .field("name", &self.name)
            .field("action", &self.action())
            .finish()
    }
}

/// Literal URL when the text mentions `http`, otherwise `https://<site>.com`
/// with spaces removed.
pub fn site_url(site: &str) -> String {
    if site.contains("http") {
        site.to_string()
    } else {
        format!("https://{}.com", site.replace(' ', ""))
    }
}

const QUANTIFIED: &[(&str, &str)] = &[
    ("give_me_n_lines", r"^give me (\d+) number of lines (.+)"),
    ("write_n", r"^write (\d+) number of (.+)"),
];

const QUESTIONS: &[(&str, &str)] = &[
    ("who_is", r"^who is (.+)"),
    ("what_is", r"^what is (.+)"),
    ("what_is_that", r"^what is that (.+)"),
    ("explain_the", r"^explain the (.+)"),
    ("why_are", r"^why are (.+)"),
    ("can_you_tell", r"^can you tell (.+)"),
    ("explain_these", r"^explain these (.+)"),
    ("tell_me_the", r"^tell me the (.+)"),
    ("explain_details", r"^explain details (.+)"),
    ("define", r"^define (.+)"),
    ("what_do_you_know_about", r"^what do you know about (.+)"),
    ("give_me_info_about", r"^give me info about (.+)"),
];

const CATCH_ALL: &str =
    r"(?:explain|tell me|give me|write|details|definition|meaning of)?\s*(.+)";

static BUILTIN_TEMPLATES: LazyLock<Vec<IntentTemplate>> = LazyLock::new(|| {
    let compile = |pat: &str| Regex::new(pat).expect("Invalid intent regex");

    let mut templates = vec![IntentTemplate {
        name: "open_site",
        matcher: Matcher::OpenSite,
    }];
    templates.extend(QUANTIFIED.iter().map(|&(name, pat)| IntentTemplate {
        name,
        matcher: Matcher::Quantified(compile(pat)),
    }));
    templates.extend(QUESTIONS.iter().map(|&(name, pat)| IntentTemplate {
        name,
        matcher: Matcher::Question(compile(pat)),
    }));
    templates.push(IntentTemplate {
        name: "catch_all",
        matcher: Matcher::CatchAll(compile(CATCH_ALL)),
    });
    templates
});

/// First-match-wins evaluation over an ordered template list.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    templates: Vec<IntentTemplate>,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    /// Matcher over the built-in template order.
    pub fn new() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.clone(),
        }
    }

    /// Matcher over an explicit template order.
    pub fn with_templates(templates: Vec<IntentTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[IntentTemplate] {
        &self.templates
    }

    /// Return the intent of the first applicable template, or `None` when
    /// nothing applies (empty input).
    pub fn match_intent(&self, normalized: &str) -> Option<Intent> {
        self.match_with_template(normalized).map(|(_, intent)| intent)
    }

    /// Like [`match_intent`](Self::match_intent) but also names the template.
    pub fn match_with_template(&self, normalized: &str) -> Option<(&'static str, Intent)> {
        self.templates.iter().find_map(|template| {
            template
                .apply(normalized)
                .map(|intent| (template.name, intent))
        })
    }
}
