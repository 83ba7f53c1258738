//! Doc-comment adapter.
//!
//! Splits a `/** ... */` comment into a summary and tagged sections. Only
//! the tags the type system consumes are modeled: `@param`, `@return`, and
//! `@var`, each carrying a type string and (where applicable) a variable
//! name. Everything else stays part of the prose.

use smol_str::SmolStr;

/// One `@tag` line of a doc comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without the `@`, e.g. `param`.
    pub name: SmolStr,
    /// `$`-less variable name, for `@param int $x` style tags.
    pub var_name: Option<SmolStr>,
    /// The raw type string, e.g. `int|string` or `\Acme\Item[]`.
    pub type_string: Option<SmolStr>,
}

/// A parsed doc comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Prose before the first tag, delimiters and leading `*` stripped.
    pub summary: Option<String>,
    tags: Vec<DocTag>,
}

impl DocBlock {
    /// Parse raw comment text. Total: any input yields a (possibly empty)
    /// block.
    pub fn parse(text: &str) -> DocBlock {
        let body = text
            .trim()
            .trim_start_matches("/**")
            .trim_start_matches("/*")
            .trim_end_matches("*/");

        let mut summary_lines: Vec<&str> = Vec::new();
        let mut tags = Vec::new();
        let mut in_summary = true;

        for line in body.lines() {
            let line = line.trim().trim_start_matches('*').trim();
            if let Some(tag_text) = line.strip_prefix('@') {
                in_summary = false;
                if let Some(tag) = Self::parse_tag(tag_text) {
                    tags.push(tag);
                }
            } else if in_summary {
                if line.is_empty() && !summary_lines.is_empty() {
                    // First blank line ends the summary paragraph.
                    in_summary = false;
                } else if !line.is_empty() {
                    summary_lines.push(line);
                }
            }
        }

        let summary = if summary_lines.is_empty() {
            None
        } else {
            Some(summary_lines.join("\n"))
        };
        DocBlock { summary, tags }
    }

    fn parse_tag(text: &str) -> Option<DocTag> {
        let mut words = text.split_whitespace();
        let name = SmolStr::new(words.next()?);

        let mut var_name = None;
        let mut type_string = None;
        for word in words {
            if let Some(var) = word.strip_prefix('$') {
                if var_name.is_none() {
                    var_name = Some(SmolStr::new(var));
                    continue;
                }
            }
            if type_string.is_none() && var_name.is_none() {
                type_string = Some(SmolStr::new(word));
                continue;
            }
            // Past the type and variable slots everything is description.
            if type_string.is_some() || var_name.is_some() {
                break;
            }
        }

        Some(DocTag {
            name,
            var_name,
            type_string,
        })
    }

    /// All tags with the given name, in source order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> {
        self.tags.iter().filter(move |t| t.name == name)
    }

    /// The `@param` tag for a specific variable name.
    pub fn param(&self, var_name: &str) -> Option<&DocTag> {
        self.tags_named("param")
            .find(|t| t.var_name.as_deref() == Some(var_name))
    }

    /// The first `@return` tag.
    pub fn return_tag(&self) -> Option<&DocTag> {
        self.tags_named("return").next()
    }

    /// The first `@var` tag.
    pub fn var_tag(&self) -> Option<&DocTag> {
        self.tags_named("var").next()
    }
}
