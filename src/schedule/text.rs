/// Canonical form of cell/caption text.
///
/// Newlines and tabs are deleted outright, not turned into spaces, so words
/// separated only by a line break in the markup end up fused.
pub fn clean(s: &str) -> String {
    s.replace(['\n', '\t'], "")
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basics() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("foo"), "foo");
        assert_eq!(clean("  foo  "), "foo");
        assert_eq!(clean("foo&nbsp;bar"), "foo bar");
        assert_eq!(clean("foo\u{a0}bar"), "foo bar");
        assert_eq!(clean("foo\n"), "foo");
        assert_eq!(clean("\tfoo"), "foo");
    }

    #[test]
    fn line_breaks_fuse_words() {
        assert_eq!(clean("Preschool\nswim"), "Preschoolswim");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "",
            "&nbsp;foo",
            "\u{a0}10 - 11am\u{a0}",
            "&nb\nsp;x",
            " \t Noon - 2pm \n",
            "a  &nbsp; b",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once, "input {:?}", input);
        }
    }
}
