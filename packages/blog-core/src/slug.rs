//! Slug derivation and title→slug synchronization.
//!
//! These functions contain NO side effects - they take inputs and return
//! outputs without touching the network or any store, making them easy to
//! test and reason about.

/// Derive a URL-safe slug from arbitrary text.
///
/// Two passes over the trimmed, lowercased input:
/// 1. every run of characters that is neither an ASCII letter/digit nor
///    whitespace collapses to a single `-`;
/// 2. every remaining run of whitespace collapses to a single `-`.
///
/// A mixed run of symbols and whitespace would leave adjacent dashes after
/// the two passes, so dash runs are merged at the end. That keeps the
/// function idempotent: deriving an already derived slug returns it
/// unchanged. Empty input yields the empty string.
pub fn derive_slug(input: &str) -> String {
    let lowered = input.trim().to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_symbol_run = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() || ch.is_whitespace() {
            collapsed.push(ch);
            in_symbol_run = false;
        } else if !in_symbol_run {
            collapsed.push('-');
            in_symbol_run = true;
        }
    }

    let mut slug = String::with_capacity(collapsed.len());
    let mut in_separator_run = false;
    for ch in collapsed.chars() {
        if ch.is_whitespace() || ch == '-' {
            if !in_separator_run {
                slug.push('-');
                in_separator_run = true;
            }
        } else {
            slug.push(ch);
            in_separator_run = false;
        }
    }

    slug
}

/// Keeps a form's slug field in sync with its title field.
///
/// An explicit subscription object owned by the form: title changes
/// re-derive the slug, direct slug edits win until the next title change,
/// and dropping the form drops the sync with it. Both entry points pass
/// through [`derive_slug`].
#[derive(Debug, Clone)]
pub struct SlugSync {
    slug: String,
    edited_directly: bool,
}

impl SlugSync {
    /// Start from an existing slug (editing a stored post) or `""` for a
    /// fresh form.
    pub fn new(initial: &str) -> Self {
        Self {
            slug: initial.to_string(),
            edited_directly: false,
        }
    }

    /// The title field changed; re-derive the slug. A title change always
    /// takes the field back from a prior direct edit (last writer wins).
    pub fn on_title_change(&mut self, title: &str) -> &str {
        self.slug = derive_slug(title);
        self.edited_directly = false;
        &self.slug
    }

    /// The author edited the slug field directly. The edit is normalized
    /// and pins the slug until the next title change.
    pub fn on_slug_edit(&mut self, raw: &str) -> &str {
        self.slug = derive_slug(raw);
        self.edited_directly = true;
        &self.slug
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Whether the current value came from a direct edit rather than the
    /// title.
    pub fn is_edited_directly(&self) -> bool {
        self.edited_directly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(derive_slug("  Hello World  "), "hello-world");
        assert_eq!(derive_slug("SHOUTING"), "shouting");
    }

    #[test]
    fn symbol_runs_collapse_to_single_dash() {
        assert_eq!(derive_slug("My First Post!"), "my-first-post-");
        assert_eq!(derive_slug("C++ & Rust"), "c-rust");
        assert_eq!(derive_slug("a!!!b"), "a-b");
    }

    #[test]
    fn whitespace_runs_collapse_to_single_dash() {
        assert_eq!(derive_slug("a   b"), "a-b");
        assert_eq!(derive_slug("a \t\n b"), "a-b");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("   "), "");
        assert_eq!(derive_slug("!!!"), "-");
    }

    #[test]
    fn output_alphabet_is_lowercase_alnum_and_dash() {
        for input in [
            "My First Post!",
            "Ünïcödé titles?",
            "  spaced   out  ",
            "100% legit",
        ] {
            let slug = derive_slug(input);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected character in {slug:?}"
            );
        }
    }

    #[test]
    fn mixed_symbol_and_space_runs_leave_no_double_dash() {
        assert_eq!(derive_slug("a! b"), "a-b");
        assert_eq!(derive_slug("C++ & Rust"), "c-rust");
        for input in ["My First Post!", "a! b", " - dashed - ", "100% legit"] {
            assert!(!derive_slug(input).contains("--"));
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        for input in ["My First Post!", "a   b", "c++ & rust", "", "déjà vu"] {
            let once = derive_slug(input);
            assert_eq!(derive_slug(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn title_change_updates_slug() {
        let mut sync = SlugSync::new("");
        assert_eq!(sync.on_title_change("My First Post"), "my-first-post");
        assert_eq!(sync.slug(), "my-first-post");
        assert!(!sync.is_edited_directly());
    }

    #[test]
    fn direct_edit_wins_until_next_title_change() {
        let mut sync = SlugSync::new("");
        sync.on_title_change("My First Post");
        sync.on_slug_edit("Custom Slug Here");
        assert_eq!(sync.slug(), "custom-slug-here");
        assert!(sync.is_edited_directly());

        // The next title change takes the field back.
        sync.on_title_change("Renamed Post");
        assert_eq!(sync.slug(), "renamed-post");
        assert!(!sync.is_edited_directly());
    }

    #[test]
    fn direct_edits_are_normalized() {
        let mut sync = SlugSync::new("existing-slug");
        assert_eq!(sync.on_slug_edit("Not A Slug!"), "not-a-slug-");
    }
}
