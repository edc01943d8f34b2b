//! Quote-aware command line splitting

/// Split a command line into arguments.
///
/// Arguments are separated by spaces outside of quotes. A single or double
/// quote opens a span that ends at the next quote of the same kind; the
/// quote characters themselves are dropped, while the other kind of quote
/// inside a span is kept as content. Empty arguments are never produced.
pub fn split_command_line(cmd_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in cmd_line.chars() {
        match (c, quote) {
            ('"' | '\'', Some(q)) if c == q => quote = None,
            ('"' | '\'', None) => quote = Some(c),
            (' ', None) => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_split() {
        assert_eq!(
            split_command_line("clang  -c foo.c -o foo.o"),
            vec!["clang", "-c", "foo.c", "-o", "foo.o"]
        );
    }

    #[test]
    fn test_double_quotes_group_spaces() {
        assert_eq!(
            split_command_line(r#"gcc -DMSG="hello world" a.c"#),
            vec!["gcc", "-DMSG=hello world", "a.c"]
        );
    }

    #[test]
    fn test_other_quote_is_literal_inside_span() {
        assert_eq!(
            split_command_line(r#"cc '-DQ="x y"' "-DS='z'""#),
            vec!["cc", r#"-DQ="x y""#, "-DS='z'"]
        );
    }

    #[test]
    fn test_empty_quotes_produce_nothing() {
        assert_eq!(split_command_line(r#"cc "" x"#), vec!["cc", "x"]);
        assert!(split_command_line("   ").is_empty());
        assert!(split_command_line("").is_empty());
    }

    #[test]
    fn test_unterminated_quote_keeps_tail() {
        assert_eq!(split_command_line("cc 'a b"), vec!["cc", "a b"]);
    }

    #[test]
    fn test_tabs_are_not_separators() {
        assert_eq!(split_command_line("a\tb c"), vec!["a\tb", "c"]);
    }
}
