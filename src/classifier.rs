//! Keyword-driven assistant replies
//!
//! A fixed, ordered rule table maps the user's text (and the content of the
//! active file) to a canned reply. The first matching rule wins. There is no
//! model behind this; the replies are scripted.

mod templates;

#[cfg(test)]
mod proptests;

use crate::workspace::FileRecord;
use serde::Serialize;

/// Which rule produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Greeting,
    CreateFile,
    Debug,
    Explain,
    Optimize,
    React,
    Api,
    Fallback,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::Greeting => "greeting",
            Rule::CreateFile => "create_file",
            Rule::Debug => "debug",
            Rule::Explain => "explain",
            Rule::Optimize => "optimize",
            Rule::React => "react",
            Rule::Api => "api",
            Rule::Fallback => "fallback",
        }
    }
}

/// Reply text plus a file to open, if the user asked for one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierResult {
    pub rule: Rule,
    pub reply: String,
    pub new_file: Option<FileRecord>,
}

impl ClassifierResult {
    fn reply(rule: Rule, text: impl Into<String>) -> Self {
        Self {
            rule,
            reply: text.into(),
            new_file: None,
        }
    }
}

/// Pick the canned reply for `user_text`.
///
/// Total over all inputs and free of side effects: the same text and file
/// content always give the same result.
///
/// Keywords are plain substring tests on the lowercased text with two
/// exceptions: "hi" must be a whole word (so "this" is not a greeting), and
/// "class" counts as a file noun for the create rule.
pub fn classify(user_text: &str, active_content: &str) -> ClassifierResult {
    let text = user_text.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    if has("hello") || has_word(&text, "hi") {
        return ClassifierResult::reply(Rule::Greeting, templates::GREETING);
    }

    if has("create") && (has("file") || has("component") || has("class")) {
        let file = new_file_template(&text);
        return ClassifierResult {
            rule: Rule::CreateFile,
            reply: templates::created_file(&file.name),
            new_file: Some(file),
        };
    }

    if has("bug") || has("error") || has("fix") {
        return ClassifierResult::reply(Rule::Debug, templates::DEBUG_CHECKLIST);
    }

    if has("explain") {
        let reply = if active_content.contains("fibonacci") {
            templates::FIBONACCI_EXPLANATION
        } else {
            templates::EXPLAIN_PROMPT
        };
        return ClassifierResult::reply(Rule::Explain, reply);
    }

    if has("optimize") || has("improve") {
        return ClassifierResult::reply(Rule::Optimize, templates::OPTIMIZATION_TIPS);
    }

    if has("react") || has("component") {
        return ClassifierResult::reply(Rule::React, templates::REACT_CAPABILITIES);
    }

    if has("api") || has("fetch") {
        return ClassifierResult::reply(Rule::Api, templates::API_GUIDANCE);
    }

    ClassifierResult::reply(Rule::Fallback, templates::FALLBACK)
}

/// Secondary checks for the create rule, in priority order
fn new_file_template(text: &str) -> FileRecord {
    if text.contains("react") {
        FileRecord::new("Component.tsx", "typescript", templates::REACT_COMPONENT)
    } else if text.contains("python") {
        FileRecord::new("script.py", "python", templates::PYTHON_SCRIPT)
    } else if text.contains("java") {
        FileRecord::new("Main.java", "java", templates::JAVA_MAIN)
    } else {
        FileRecord::new("newfile.js", "javascript", templates::JAVASCRIPT_MAIN)
    }
}

/// `word` appears delimited by non-alphanumeric characters.
///
/// Used for "hi", which as a bare substring would match "this" or "which".
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
