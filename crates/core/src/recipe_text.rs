//! Decoder for the list strings embedded in recipe records.
//!
//! The recommender exports list-valued columns (image URLs, ingredient
//! parts and quantities, instruction steps) as R vector literals:
//!
//! ```text
//! list  := "character(0)" | "c" ws* "(" ws* items? ws* ")" | items
//! items := item (ws* "," ws* item)*
//! item  := '"' text '"' | bare
//! bare  := any run of characters except ','   ("NA" denotes a missing value)
//! ```
//!
//! A quoted item ends at the first `"` followed by optional whitespace and
//! then `,` or the end of input, so quotes inside instruction text survive.
//! Decoding never fails: empty, blank or unrecognizable input yields an
//! empty list, and an unterminated item takes the rest of the input.

/// Literal R uses for an empty character vector.
const EMPTY_VECTOR: &str = "character(0)";

/// Literal R uses for a missing value.
const MISSING: &str = "NA";

/// Decode a list string into its non-empty items.
///
/// # Example
///
/// ```
/// use handlekurv_core::recipe_text::parse_list;
///
/// let steps = parse_list(r#"c("Preheat oven.", "Bake 20 min.")"#);
/// assert_eq!(steps, vec!["Preheat oven.", "Bake 20 min."]);
/// assert!(parse_list("character(0)").is_empty());
/// ```
#[must_use]
pub fn parse_list(input: &str) -> Vec<String> {
    parse_items(input).into_iter().flatten().collect()
}

/// Decode a list string, keeping missing/empty positions as `None`.
///
/// Use this when two lists must stay aligned (ingredient quantities
/// against ingredient parts).
#[must_use]
pub fn parse_items(input: &str) -> Vec<Option<String>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == EMPTY_VECTOR {
        return Vec::new();
    }

    let mut rest = unwrap_vector(trimmed).trim_start();
    let mut items = Vec::new();
    while !rest.is_empty() {
        let (item, tail) = match rest.strip_prefix('"') {
            Some(quoted) => take_quoted(quoted),
            None => take_bare(rest),
        };
        items.push(item);

        // Anything other than a separator after an item ends the list.
        rest = tail
            .trim_start()
            .strip_prefix(',')
            .map_or("", str::trim_start);
    }
    items
}

/// Strip the `c(` ... `)` wrapper if present.
fn unwrap_vector(s: &str) -> &str {
    let Some(body) = s
        .strip_prefix('c')
        .map(str::trim_start)
        .and_then(|t| t.strip_prefix('('))
    else {
        return s;
    };
    let body = body.trim_end();
    body.strip_suffix(')').unwrap_or(body)
}

/// Take a quoted item (opening quote already consumed).
fn take_quoted(s: &str) -> (Option<String>, &str) {
    let mut search = 0;
    while let Some(offset) = s.get(search..).and_then(|t| t.find('"')) {
        let end = search + offset;
        let tail = s.get(end + 1..).unwrap_or_default();
        let after = tail.trim_start();
        if after.is_empty() || after.starts_with(',') {
            return (non_empty(s.get(..end).unwrap_or_default()), tail);
        }
        search = end + 1;
    }
    (non_empty(s), "")
}

/// Take an unquoted item up to the next separator.
fn take_bare(s: &str) -> (Option<String>, &str) {
    let (token, tail) = s.find(',').map_or((s, ""), |index| s.split_at(index));
    let token = token.trim();
    if token == MISSING {
        (None, tail)
    } else {
        (non_empty(token), tail)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_list() {
        assert_eq!(
            parse_list(r#"c("https://a/1.jpg", "https://a/2.jpg")"#),
            vec!["https://a/1.jpg", "https://a/2.jpg"]
        );
    }

    #[test]
    fn test_compact_separator() {
        assert_eq!(parse_list(r#"c("a","b","c")"#), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wrapper_with_spacing() {
        assert_eq!(parse_list(r#"c ( "a", "b" )"#), vec!["a", "b"]);
    }

    #[test]
    fn test_single_unwrapped_value() {
        assert_eq!(parse_list("https://a/1.jpg"), vec!["https://a/1.jpg"]);
        assert_eq!(parse_list(r#""https://a/1.jpg""#), vec!["https://a/1.jpg"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("   ").is_empty());
        assert!(parse_list("character(0)").is_empty());
        assert!(parse_list("c()").is_empty());
        assert!(parse_list(r#"c("", "  ")"#).is_empty());
    }

    #[test]
    fn test_embedded_quotes_survive() {
        assert_eq!(
            parse_list(r#"c("Cut into 1" cubes.", "Serve.")"#),
            vec![r#"Cut into 1" cubes."#, "Serve."]
        );
    }

    #[test]
    fn test_commas_inside_quotes() {
        assert_eq!(
            parse_list(r#"c("Mix flour, sugar and eggs.", "Bake.")"#),
            vec!["Mix flour, sugar and eggs.", "Bake."]
        );
    }

    #[test]
    fn test_missing_values_keep_alignment() {
        assert_eq!(
            parse_items(r#"c("4", NA, "1/4")"#),
            vec![Some("4".to_string()), None, Some("1/4".to_string())]
        );
        assert_eq!(parse_list(r#"c("4", NA, "1/4")"#), vec!["4", "1/4"]);
    }

    #[test]
    fn test_unterminated_is_best_effort() {
        assert_eq!(parse_list(r#"c("first", "second"#), vec!["first", "second"]);
        assert_eq!(parse_list(r#"c("only"#), vec!["only"]);
    }
}
